//! Simulation core
//!
//! Integer-only and free of I/O. Every function here is total: crashing into
//! a pipe or the ground is session state, not an error.

pub mod bird;
pub mod pipe;
pub mod rect;
pub mod session;
pub mod step;

pub use bird::Bird;
pub use pipe::{Pipe, Pipes, Role};
pub use rect::Rect;
pub use session::{Game, Phase, PressOutcome, Session, Snapshot, TickOutcome};
pub use step::{SCORE_PER_PIPE, step};
