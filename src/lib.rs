//! Flappy Lab - Flappy Bird on a fixed timestep, drawn in the terminal
//!
//! - `sim`: deterministic simulation (bird, pipes, step, session controller)
//! - `config`: game constants and the shared configuration
//! - `driver`: the two periodic timers and the command queue
//! - `render`: half-block pixel renderer
//! - `audio`: synthesized sound effects

pub mod audio;
pub mod config;
pub mod driver;
pub mod render;
pub mod sim;

pub use config::Config;
pub use driver::{Command, Driver, Event};
pub use sim::{Game, Snapshot};
