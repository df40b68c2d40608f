//! Maps terminal events onto game commands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

pub const GRAVITY_STEP: f64 = 0.05;
pub const LIFT_STEP: f64 = 0.5;
pub const SPEED_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Flap,
    Quit,
    /// New viewport size in pixels.
    Resize(usize, usize),
    TuneGravity(f64),
    TuneLift(f64),
    TuneSpeed(f64),
}

pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Command::Flap),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Command::Resize(*cols as usize, *rows as usize * 2)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Command::Flap),
        // Tuning: a/z = gravity, s/x = lift, d/c = speed
        KeyCode::Char('a') => Some(Command::TuneGravity(GRAVITY_STEP)),
        KeyCode::Char('z') => Some(Command::TuneGravity(-GRAVITY_STEP)),
        KeyCode::Char('s') => Some(Command::TuneLift(LIFT_STEP)),
        KeyCode::Char('x') => Some(Command::TuneLift(-LIFT_STEP)),
        KeyCode::Char('d') => Some(Command::TuneSpeed(SPEED_STEP)),
        KeyCode::Char('c') => Some(Command::TuneSpeed(-SPEED_STEP)),
        _ => None,
    }
}
