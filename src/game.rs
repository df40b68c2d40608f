//! The simulation: bird, pipes, score and the state machine between them.
//!
//! Everything here is in pixel units of the current viewport. Nothing in this
//! module touches the terminal, so the whole thing runs headless in tests.

use crate::config::{Config, GameRules, Physics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_GROUND_H: f64 = 6.0;
const MIN_PIPE_W: f64 = 5.0;
const MIN_GAP: f64 = 11.0;
const MIN_HALF_W: f64 = 2.0;
const MIN_HALF_H: f64 = 1.5;

pub const GRAVITY_FLOOR: f64 = 0.05;
pub const LIFT_CEILING: f64 = -0.5;
pub const SPEED_FLOOR: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    /// Top edge of the gap. The gap spans `gap_top..gap_top + layout.gap`.
    pub gap_top: f64,
    pub scored: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ready,
    Playing,
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored(u32),
    Crashed { score: u32, best: u32 },
    Landed,
    Restarted,
    PipeSpawned,
}

/// [`Physics`] scaled to a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub scale: f64,
    pub sky_h: f64,
    pub ground_h: usize,
    pub pipe_w: f64,
    pub gap: f64,
    pub gap_band: f64,
    pub spacing: f64,
    pub bird_x: f64,
    pub half_w: f64,
    pub half_h: f64,
    pub gravity: f64,
    pub lift: f64,
    pub speed: f64,
}

impl Layout {
    pub fn new(width: usize, height: usize, p: &Physics) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let scale = height as f64 / p.reference_height;

        let ground_h = ((p.ground_height * scale).max(MIN_GROUND_H) as usize).min(height / 3);
        let sky_h = (height - ground_h) as f64;
        let gap = (p.gap_size * scale).max(MIN_GAP).min(sky_h);
        let gap_band = (p.gap_band * scale).clamp(gap, sky_h);

        Layout {
            scale,
            sky_h,
            ground_h,
            pipe_w: (p.pipe_width * scale).max(MIN_PIPE_W),
            gap,
            gap_band,
            spacing: p.pipe_spacing * scale,
            bird_x: (p.bird_x * scale).max(MIN_HALF_W * 2.0).min(width as f64 / 2.0),
            half_w: (p.bird_width * scale / 2.0).max(MIN_HALF_W),
            half_h: (p.bird_height * scale / 2.0).max(MIN_HALF_H).min(gap / 2.0),
            gravity: p.gravity * scale,
            lift: p.lift * scale,
            speed: p.obstacle_speed * scale,
        }
    }

    /// Lowest y the bird's centre may reach.
    pub fn floor(&self) -> f64 {
        self.sky_h - self.half_h
    }

    pub fn ceiling(&self) -> f64 {
        self.half_h
    }
}

pub struct Game {
    width: usize,
    height: usize,
    physics: Physics,
    rules: GameRules,
    layout: Layout,
    bird_y: f64,
    bird_vy: f64,
    pipes: Vec<Pipe>,
    score: u32,
    best: u32,
    state: State,
    frame: u64,
    ground_x: f64,
    dead_timer: u32,
    show_hud: bool,
    rng: StdRng,
}

impl Game {
    /// Seeds from `config.rules.seed`, or from entropy when unset.
    pub fn new(width: usize, height: usize, config: &Config) -> Self {
        let seed = config.rules.seed.unwrap_or_else(rand::random);
        Self::with_rng(
            width,
            height,
            config.physics.clone(),
            config.rules.clone(),
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(width: usize, height: usize, physics: Physics, rules: GameRules, rng: StdRng) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut g = Game {
            width,
            height,
            layout: Layout::new(width, height, &physics),
            physics,
            rules,
            bird_y: 0.0,
            bird_vy: 0.0,
            pipes: Vec::new(),
            score: 0,
            best: 0,
            state: State::Ready,
            frame: 0,
            ground_x: 0.0,
            dead_timer: 0,
            show_hud: false,
            rng,
        };
        g.reset();
        g
    }

    /// Back to `Ready` with a fresh set of pipes. Best score, tuned physics
    /// and the RNG stream carry over.
    fn reset(&mut self) {
        self.layout = Layout::new(self.width, self.height, &self.physics);
        self.bird_y = self.rest_y();
        self.bird_vy = 0.0;
        self.score = 0;
        self.state = State::Ready;
        self.frame = 0;
        self.ground_x = 0.0;
        self.dead_timer = 0;

        self.pipes.clear();
        for i in 0..self.rules.initial_pipes {
            let gap_top = self.random_gap_top();
            self.pipes.push(Pipe {
                x: self.width as f64 + i as f64 * self.layout.spacing,
                gap_top,
                scored: false,
            });
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.reset();
    }

    fn rest_y(&self) -> f64 {
        (self.layout.sky_h * 0.4).clamp(self.layout.ceiling(), self.layout.floor())
    }

    fn random_gap_top(&mut self) -> f64 {
        let range = self.layout.gap_band - self.layout.gap;
        if !(range > 0.0) {
            0.0
        } else {
            self.rng.gen_range(0.0..range).floor()
        }
    }

    pub fn flap(&mut self) -> Option<GameEvent> {
        match self.state {
            State::Ready => {
                self.state = State::Playing;
                self.bird_vy = self.layout.lift;
                Some(GameEvent::Started)
            }
            State::Playing => {
                self.bird_vy = self.layout.lift;
                Some(GameEvent::Flapped)
            }
            State::Dead if self.dead_timer >= self.rules.restart_delay_ticks => {
                self.reset();
                Some(GameEvent::Restarted)
            }
            State::Dead | State::Dying => None,
        }
    }

    /// Advances one fixed tick.
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.frame += 1;

        match self.state {
            State::Ready => {
                let bob = (self.frame as f64 * 0.08).sin() * 3.0 * self.layout.scale;
                self.bird_y = (self.rest_y() + bob).clamp(self.layout.ceiling(), self.layout.floor());
                self.ground_x += self.layout.speed * 0.25;
            }
            State::Playing => {
                self.bird_vy += self.layout.gravity;
                self.bird_y += self.bird_vy;

                let mut grounded = false;
                if self.bird_y < self.layout.ceiling() {
                    self.bird_y = self.layout.ceiling();
                    self.bird_vy = 0.0;
                } else if self.bird_y >= self.layout.floor() {
                    self.bird_y = self.layout.floor();
                    self.bird_vy = 0.0;
                    grounded = true;
                }
                self.ground_x += self.layout.speed;

                for p in &mut self.pipes {
                    p.x -= self.layout.speed;
                    if !p.scored && p.x + self.layout.pipe_w < self.layout.bird_x {
                        p.scored = true;
                        self.score += 1;
                        events.push(GameEvent::Scored(self.score));
                    }
                }
                let pipe_w = self.layout.pipe_w;
                let cap = self.cap_extra() as f64;
                self.pipes.retain(|p| p.x + pipe_w + cap > 0.0);

                let should_spawn = match self.pipes.last() {
                    None => true,
                    Some(last) => last.x < self.width as f64 - self.layout.spacing,
                };
                if should_spawn {
                    let gap_top = self.random_gap_top();
                    self.pipes.push(Pipe {
                        x: self.width as f64,
                        gap_top,
                        scored: false,
                    });
                    events.push(GameEvent::PipeSpawned);
                }

                if self.check_collision() || (grounded && self.rules.ground_is_fatal) {
                    events.push(self.crash());
                }
            }
            State::Dying => {
                self.bird_vy += self.layout.gravity;
                self.bird_y += self.bird_vy;
                if self.bird_y >= self.layout.floor() {
                    self.bird_y = self.layout.floor();
                    self.bird_vy = 0.0;
                    self.state = State::Dead;
                    self.dead_timer = 0;
                    events.push(GameEvent::Landed);
                }
            }
            State::Dead => {
                self.dead_timer = self.dead_timer.saturating_add(1);
            }
        }
        events
    }

    fn crash(&mut self) -> GameEvent {
        self.state = State::Dying;
        self.bird_vy = self.layout.lift * 0.6;
        if self.score > self.best {
            self.best = self.score;
        }
        GameEvent::Crashed {
            score: self.score,
            best: self.best,
        }
    }

    /// Axis-aligned box test of the bird against every pipe's two halves.
    pub fn check_collision(&self) -> bool {
        let bx = self.layout.bird_x;
        let by = self.bird_y;
        let hw = self.layout.half_w;
        let hh = self.layout.half_h;

        self.pipes.iter().any(|p| {
            let overlaps_x = bx + hw > p.x && bx - hw < p.x + self.layout.pipe_w;
            let gap_bot = p.gap_top + self.layout.gap;
            overlaps_x && (by - hh < p.gap_top || by + hh > gap_bot)
        })
    }

    /// How far a pipe cap sticks out on each side.
    pub fn cap_extra(&self) -> i32 {
        (2.0 * self.layout.scale).max(1.0) as i32
    }

    pub fn tune_gravity(&mut self, delta: f64) {
        self.show_hud = true;
        self.physics.gravity = (self.physics.gravity + delta).max(GRAVITY_FLOOR);
        self.relayout();
    }

    /// Positive `delta` flaps harder.
    pub fn tune_lift(&mut self, delta: f64) {
        self.show_hud = true;
        self.physics.lift = (self.physics.lift - delta).min(LIFT_CEILING);
        self.relayout();
    }

    pub fn tune_speed(&mut self, delta: f64) {
        self.show_hud = true;
        self.physics.obstacle_speed = (self.physics.obstacle_speed + delta).max(SPEED_FLOOR);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = Layout::new(self.width, self.height, &self.physics);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn bird_y(&self) -> f64 {
        self.bird_y
    }

    pub fn bird_vy(&self) -> f64 {
        self.bird_vy
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn ground_x(&self) -> f64 {
        self.ground_x
    }

    pub fn show_hud(&self) -> bool {
        self.show_hud
    }

    pub fn can_restart(&self) -> bool {
        self.state == State::Dead && self.dead_timer >= self.rules.restart_delay_ticks
    }
}
