//! Integration test: full runs of the simulation through the public API.

use flapper::{Config, Game, GameEvent, State};
use proptest::prelude::*;

fn config(seed: u64) -> Config {
    let mut config = Config::default();
    config.rules.seed = Some(seed);
    config
}

/// Reference-sized playfield: pixel values equal the physics defaults.
fn reference_game(seed: u64) -> Game {
    Game::new(800, 600, &config(seed))
}

/// Flaps whenever the bird sinks below a point in the lower half of the next
/// gap.
fn autopilot(game: &mut Game) {
    let l = game.layout().clone();
    let next = game
        .pipes()
        .iter()
        .find(|p| p.x + l.pipe_w >= l.bird_x - l.half_w);
    let Some(pipe) = next else { return };
    let target = pipe.gap_top + l.gap * 0.6;
    if game.bird_y() > target && game.bird_vy() >= 0.0 {
        game.flap();
    }
}

fn run_until_crash(game: &mut Game, max_ticks: usize) -> Option<GameEvent> {
    for _ in 0..max_ticks {
        for e in game.update() {
            if matches!(e, GameEvent::Crashed { .. }) {
                return Some(e);
            }
        }
    }
    None
}

// =============================================================================
// Game over
// =============================================================================

#[test]
fn test_idle_bird_rests_on_floor_until_a_pipe_hits_it() {
    let mut game = reference_game(5);
    game.flap();

    let crash = run_until_crash(&mut game, 1000);
    assert_eq!(crash, Some(GameEvent::Crashed { score: 0, best: 0 }));
    assert_eq!(game.state(), State::Dying);
}

#[test]
fn test_fatal_ground_ends_the_run_on_landing() {
    let mut config = config(5);
    config.rules.ground_is_fatal = true;
    let mut game = Game::new(800, 600, &config);
    game.flap();

    // One flap from the rest height peaks around y=175; the floor is at 538.
    assert!(run_until_crash(&mut game, 100).is_some());
}

#[test]
fn test_dead_game_restarts_on_flap_keeping_best() {
    let mut game = reference_game(9);
    game.flap();
    for _ in 0..3000 {
        autopilot(&mut game);
        game.update();
        if game.score() >= 2 {
            break;
        }
    }
    let scored = game.score();
    assert!(scored >= 2);

    // Stop flapping and let the floor-bound bird hit the next pipe.
    assert!(run_until_crash(&mut game, 1000).is_some());
    assert_eq!(game.best(), scored);

    while game.state() != State::Dead {
        game.update();
    }
    while !game.can_restart() {
        assert_eq!(game.flap(), None);
        game.update();
    }
    assert_eq!(game.flap(), Some(GameEvent::Restarted));
    assert_eq!(game.state(), State::Ready);
    assert_eq!(game.score(), 0);
    assert_eq!(game.best(), scored);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_autopilot_threads_several_pipes() {
    for seed in 0..5 {
        let mut game = reference_game(seed);
        game.flap();
        let mut scores = Vec::new();
        for _ in 0..2000 {
            autopilot(&mut game);
            for e in game.update() {
                if let GameEvent::Scored(s) = e {
                    scores.push(s);
                }
            }
        }
        assert_eq!(game.state(), State::Playing, "seed {seed}");
        assert!(game.score() >= 5, "seed {seed} scored {}", game.score());
        let expected: Vec<u32> = (1..=game.score()).collect();
        assert_eq!(scores, expected);
    }
}

#[test]
fn test_pipe_stream_never_runs_dry() {
    let mut game = reference_game(1);
    game.flap();
    for _ in 0..2000 {
        autopilot(&mut game);
        game.update();
        assert!(!game.pipes().is_empty());
        let last = game.pipes().last().unwrap();
        assert!(last.x >= 800.0 - 300.0 - 2.0);
    }
}

// =============================================================================
// Responsive sizing
// =============================================================================

#[test]
fn test_resize_mid_run_restarts_at_new_scale() {
    let mut game = reference_game(2);
    game.flap();
    for _ in 0..100 {
        autopilot(&mut game);
        game.update();
    }
    game.resize(200, 120);

    assert_eq!(game.state(), State::Ready);
    assert_eq!(game.size(), (200, 120));
    let l = game.layout();
    assert!((l.scale - 0.2).abs() < 1e-9);
    assert!(game.pipes().iter().all(|p| p.x >= 200.0));
    assert!(game.bird_y() >= l.ceiling() && game.bird_y() <= l.floor());
}

#[test]
fn test_same_seed_and_inputs_replay_identically() {
    let trace = |seed| {
        let mut game = reference_game(seed);
        game.flap();
        let mut out = Vec::new();
        for i in 0..800 {
            if i % 23 == 0 {
                game.flap();
            }
            game.update();
            out.push((game.bird_y().to_bits(), game.score(), game.pipes().len()));
        }
        out
    };
    assert_eq!(trace(77), trace(77));
}

// =============================================================================
// Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_bird_stays_on_screen_while_alive(
        seed in any::<u64>(),
        w in 20usize..400,
        h in 20usize..300,
        flaps in proptest::collection::vec(any::<bool>(), 1..400),
    ) {
        let mut game = Game::new(w, h, &config(seed));
        for flap in flaps {
            if flap {
                game.flap();
            }
            game.update();
            if matches!(game.state(), State::Ready | State::Playing) {
                let l = game.layout();
                prop_assert!(game.bird_y() >= l.ceiling());
                prop_assert!(game.bird_y() <= l.floor());
            }
        }
    }

    #[test]
    fn prop_gaps_stay_inside_the_sky(seed in any::<u64>(), w in 20usize..400, h in 20usize..300) {
        let mut game = Game::new(w, h, &config(seed));
        game.flap();
        for _ in 0..300 {
            autopilot(&mut game);
            game.update();
            let l = game.layout();
            for p in game.pipes() {
                prop_assert!(p.gap_top >= 0.0);
                prop_assert!(p.gap_top + l.gap <= l.sky_h);
            }
        }
    }

    #[test]
    fn prop_score_only_climbs_one_at_a_time(
        seed in any::<u64>(),
        flaps in proptest::collection::vec(any::<bool>(), 1..600),
    ) {
        let mut game = reference_game(seed);
        let mut last = 0;
        for flap in flaps {
            if flap {
                game.flap();
            }
            for e in game.update() {
                if let GameEvent::Scored(s) = e {
                    prop_assert_eq!(s, last + 1);
                    last = s;
                }
                if let GameEvent::Crashed { score, best } = e {
                    prop_assert!(best >= score);
                }
            }
            if game.state() == State::Ready {
                last = 0;
            }
        }
    }
}
