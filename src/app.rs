//! The fixed-timestep loop tying input, simulation, sound and drawing together.

use crate::audio::{Audio, Cue};
use crate::canvas::PixelBuf;
use crate::config::Config;
use crate::error::Result;
use crate::game::{Game, GameEvent};
use crate::input::{Command, map_event};
use crate::scene::{self, SKY_TOP};
use crate::term::{self, TerminalSession};
use crossterm::event;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::Started | GameEvent::Flapped => Some(Cue::Flap),
        GameEvent::Scored(_) => Some(Cue::Score),
        GameEvent::Crashed { .. } => Some(Cue::Crash),
        GameEvent::Landed | GameEvent::Restarted | GameEvent::PipeSpawned => None,
    }
}

fn on_event(event: &GameEvent, audio: Option<&Audio>) {
    match event {
        GameEvent::Started => info!("run started"),
        GameEvent::Scored(score) => debug!(score, "scored"),
        GameEvent::Crashed { score, best } => info!(score, best, "crashed"),
        GameEvent::Restarted => info!("restarted"),
        GameEvent::Flapped | GameEvent::Landed | GameEvent::PipeSpawned => {}
    }
    if let (Some(audio), Some(cue)) = (audio, cue_for(event)) {
        audio.play(cue);
    }
}

/// Applies one command. `Break` means the player asked to quit.
pub fn apply(game: &mut Game, buf: &mut PixelBuf, cmd: Command, audio: Option<&Audio>) -> ControlFlow<()> {
    match cmd {
        Command::Quit => return ControlFlow::Break(()),
        Command::Flap => {
            if let Some(e) = game.flap() {
                on_event(&e, audio);
            }
        }
        Command::Resize(w, h) => {
            debug!(width = w, height = h, "resized");
            buf.resize(w, h, SKY_TOP);
            game.resize(w, h);
        }
        Command::TuneGravity(d) => {
            game.tune_gravity(d);
            debug!(gravity = game.physics().gravity, "tuned");
        }
        Command::TuneLift(d) => {
            game.tune_lift(d);
            debug!(lift = game.physics().lift, "tuned");
        }
        Command::TuneSpeed(d) => {
            game.tune_speed(d);
            debug!(speed = game.physics().obstacle_speed, "tuned");
        }
    }
    ControlFlow::Continue(())
}

/// One tick of simulation plus the sounds and log lines it triggers.
pub fn tick(game: &mut Game, audio: Option<&Audio>) -> Vec<GameEvent> {
    let events = game.update();
    for e in &events {
        on_event(e, audio);
    }
    events
}

/// Runs until the player quits. Returns the best score of the session.
pub fn run(config: &Config, audio: Option<Audio>) -> Result<u32> {
    let mut session = TerminalSession::enter()?;

    let (pw, ph) = term::pixel_size()?;
    let mut buf = PixelBuf::new(pw, ph, SKY_TOP);
    let mut game = Game::new(pw, ph, config);

    let frame_dur = Duration::from_millis(config.tick_ms);
    info!(width = pw, height = ph, tick_ms = config.tick_ms, sound = audio.is_some(), "game loop started");

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let Some(cmd) = map_event(&event::read()?) else {
                continue;
            };
            if apply(&mut game, &mut buf, cmd, audio.as_ref()).is_break() {
                info!(best = game.best(), "quit");
                return Ok(game.best());
            }
        }

        // Update
        tick(&mut game, audio.as_ref());

        // Render
        scene::draw(&game, &mut buf);
        buf.render(session.out())?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::State;

    fn setup() -> (Game, PixelBuf) {
        let mut config = Config::default();
        config.rules.seed = Some(11);
        (Game::new(80, 48, &config), PixelBuf::new(80, 48, SKY_TOP))
    }

    #[test]
    fn quit_breaks() {
        let (mut game, mut buf) = setup();
        assert!(apply(&mut game, &mut buf, Command::Quit, None).is_break());
    }

    #[test]
    fn flap_starts_the_run() {
        let (mut game, mut buf) = setup();
        assert!(apply(&mut game, &mut buf, Command::Flap, None).is_continue());
        assert_eq!(game.state(), State::Playing);
    }

    #[test]
    fn resize_reaches_both_game_and_canvas() {
        let (mut game, mut buf) = setup();
        let _ = apply(&mut game, &mut buf, Command::Resize(120, 60), None);
        assert_eq!(game.size(), (120, 60));
        assert_eq!((buf.width(), buf.height()), (120, 60));
    }

    #[test]
    fn tuning_shows_hud() {
        let (mut game, mut buf) = setup();
        let _ = apply(&mut game, &mut buf, Command::TuneSpeed(0.25), None);
        assert!(game.show_hud());
        assert_eq!(game.physics().obstacle_speed, 2.25);
    }

    #[test]
    fn sounds_follow_events() {
        assert_eq!(cue_for(&GameEvent::Flapped), Some(Cue::Flap));
        assert_eq!(cue_for(&GameEvent::Scored(3)), Some(Cue::Score));
        assert_eq!(cue_for(&GameEvent::Crashed { score: 1, best: 2 }), Some(Cue::Crash));
        assert_eq!(cue_for(&GameEvent::PipeSpawned), None);
    }

    #[test]
    fn tick_without_audio_still_advances() {
        let (mut game, _) = setup();
        game.flap();
        let frame = game.frame();
        tick(&mut game, None);
        assert_eq!(game.frame(), frame + 1);
    }
}
