//! Game constants and the shared configuration built from them.

use std::time::Duration;

/// Literal game constants. Everything in `sim` reads these through [`Config`].
pub mod consts {
    /// Visible area
    pub const WIDTH: i32 = 360;
    pub const HEIGHT: i32 = 640;

    pub const BIRD_WIDTH: i32 = 34;
    pub const BIRD_HEIGHT: i32 = 24;

    pub const PIPE_WIDTH: i32 = 64;
    pub const PIPE_HEIGHT: i32 = 512;

    /// Per-tick velocity change, pixels/tick²
    pub const GRAVITY: i32 = 1;
    /// Velocity a jump sets (negative is up)
    pub const JUMP_VELOCITY: i32 = -9;
    /// Horizontal pipe velocity, pixels/tick
    pub const PIPE_SPEED: i32 = -4;

    pub const TICKS_PER_SECOND: u32 = 60;
    pub const SPAWN_PERIOD_MS: u64 = 1500;
}

use consts::*;

/// Shared immutable configuration handed to every entity by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub bird_width: i32,
    pub bird_height: i32,
    pub pipe_width: i32,
    pub pipe_height: i32,
    pub gravity: i32,
    pub jump_velocity: i32,
    pub pipe_speed: i32,
    pub tick_period: Duration,
    pub spawn_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            pipe_speed: PIPE_SPEED,
            tick_period: Duration::from_secs(1) / TICKS_PER_SECOND,
            spawn_period: Duration::from_millis(SPAWN_PERIOD_MS),
        }
    }
}

impl Config {
    /// Vertical opening between the two halves of a pair.
    pub fn gap(&self) -> i32 {
        self.height / 4
    }

    /// Where a fresh bird appears.
    pub fn bird_start(&self) -> (i32, i32) {
        (self.width / 8, self.height / 2)
    }
}
