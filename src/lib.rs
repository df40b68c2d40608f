//! A tap-to-flap side scroller drawn with half-block pixels in the terminal.
//!
//! [`game`] is the headless simulation; [`scene`] and [`canvas`] turn it into
//! pixels; [`app`] runs the fixed-timestep loop against a real terminal.

pub mod app;
pub mod audio;
pub mod canvas;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod scene;
pub mod term;

pub use config::Config;
pub use error::{Error, Result};
pub use game::{Game, GameEvent, State};
