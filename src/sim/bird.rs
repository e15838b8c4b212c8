use super::Rect;
use crate::config::Config;

/// The player. `x` never changes after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bird {
    pub x: i32,
    pub y: i32,
    pub vy: i32,
}

impl Bird {
    pub fn new(config: &Config) -> Self {
        let (x, y) = config.bird_start();
        Self { x, y, vy: 0 }
    }

    /// Accelerate, integrate, then clamp at the ceiling.
    ///
    /// The clamp leaves `vy` alone, so a bird pinned at `y = 0` keeps its
    /// upward velocity and sits there until gravity wins it back.
    pub fn apply_gravity(&mut self, config: &Config) {
        self.vy += config.gravity;
        self.y += self.vy;
        self.y = self.y.max(0);
    }

    /// Overwrites the velocity; jumps never stack.
    pub fn jump(&mut self, config: &Config) {
        self.vy = config.jump_velocity;
    }

    pub fn has_hit_ground(&self, config: &Config) -> bool {
        self.y > config.height
    }

    pub fn bounds(&self, config: &Config) -> Rect {
        Rect::new(self.x, self.y, config.bird_width, config.bird_height)
    }
}
