//! Pipe halves and the collection that spawns, scrolls and culls them.

use rand::Rng;

use super::{Bird, Rect};
use crate::config::Config;

/// Which half of a pair a pipe is. Only the renderer looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Top,
    Bottom,
}

/// One pipe half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipe {
    pub x: i32,
    pub y: i32,
    pub role: Role,
    /// Set once the bird has cleared this half
    pub passed: bool,
}

impl Pipe {
    pub fn new(role: Role, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            role,
            passed: false,
        }
    }

    pub fn advance(&mut self, config: &Config) {
        self.x += config.pipe_speed;
    }

    pub fn right_edge(&self, config: &Config) -> i32 {
        self.x + config.pipe_width
    }

    pub fn bounds(&self, config: &Config) -> Rect {
        Rect::new(self.x, self.y, config.pipe_width, config.pipe_height)
    }

    pub fn collides_with(&self, bird: &Bird, config: &Config) -> bool {
        self.bounds(config).overlaps(&bird.bounds(config))
    }

    /// Marks the pipe passed the first time `bird_x` is beyond its right
    /// edge. Returns true only on that first time.
    pub fn try_pass(&mut self, bird_x: i32, config: &Config) -> bool {
        if !self.passed && bird_x > self.right_edge(config) {
            self.passed = true;
            return true;
        }
        false
    }

    pub fn is_offscreen(&self, config: &Config) -> bool {
        self.right_edge(config) < 0
    }
}

/// Live pipes in spawn order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipes {
    pipes: Vec<Pipe>,
}

impl Pipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a pair from one random draw in `0..pipe_height / 2`.
    pub fn spawn_pair<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Config) {
        let draw = rng.random_range(0..config.pipe_height / 2);
        let top_y = -config.pipe_height / 4 - draw;
        self.spawn_pair_at(top_y, config);
    }

    /// Spawns a pair at the right edge with the top half at `top_y`.
    pub fn spawn_pair_at(&mut self, top_y: i32, config: &Config) {
        let bottom_y = top_y + config.pipe_height + config.gap();
        self.pipes.push(Pipe::new(Role::Top, config.width, top_y));
        self.pipes.push(Pipe::new(Role::Bottom, config.width, bottom_y));
        log::trace!("spawned pair at top_y={top_y}, {} pipes live", self.pipes.len());
    }

    pub fn advance_all(&mut self, config: &Config) {
        self.advance_each(config, |_| {});
    }

    /// Advances each pipe in order, handing it to `visit` right after it moves.
    pub fn advance_each(&mut self, config: &Config, mut visit: impl FnMut(&mut Pipe)) {
        for pipe in &mut self.pipes {
            pipe.advance(config);
            visit(pipe);
        }
    }

    pub fn cull_offscreen(&mut self, config: &Config) {
        self.pipes.retain(|p| !p.is_offscreen(config));
    }

    /// Inserts an already-placed pipe at the back.
    pub fn push(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }

    pub fn as_slice(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_pair_layout() {
        let config = Config::default();
        let mut pipes = Pipes::new();
        pipes.spawn_pair_at(-200, &config);

        assert_eq!(pipes.len(), 2);
        let spawned = pipes.as_slice();
        assert_eq!(spawned[0], Pipe::new(Role::Top, 360, -200));
        assert_eq!(spawned[1], Pipe::new(Role::Bottom, 360, -200 + 512 + 160));
    }

    #[test]
    fn test_spawn_pair_top_range() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pipes = Pipes::new();
        for _ in 0..500 {
            pipes.spawn_pair(&mut rng, &config);
        }
        for top in pipes.iter().filter(|p| p.role == Role::Top) {
            // -128 - [0, 256)
            assert!((-383..=-128).contains(&top.y), "top_y {} out of range", top.y);
        }
    }

    #[test]
    fn test_cull_boundary() {
        let config = Config::default();
        let mut pipes = Pipes::new();
        pipes.push(Pipe::new(Role::Top, -63, 0));
        pipes.push(Pipe::new(Role::Bottom, -64, 0));
        pipes.push(Pipe::new(Role::Top, -65, 0));
        pipes.push(Pipe::new(Role::Bottom, 10, 0));
        pipes.cull_offscreen(&config);

        let xs: Vec<i32> = pipes.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-63, -64, 10]);
        // -64 + 64 = 0 is not < 0; one more step takes it out
        pipes.advance_all(&config);
        pipes.cull_offscreen(&config);
        let xs: Vec<i32> = pipes.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![6]);
    }

    #[test]
    fn test_pipe_at_minus_64_survives_one_cull() {
        let config = Config::default();
        let mut pipes = Pipes::new();
        pipes.push(Pipe::new(Role::Top, -64, 0));
        pipes.cull_offscreen(&config);
        assert_eq!(pipes.len(), 1);

        let mut pipes = Pipes::new();
        pipes.push(Pipe::new(Role::Top, -65, 0));
        pipes.cull_offscreen(&config);
        assert_eq!(pipes.len(), 0);
        assert!(pipes.is_empty());
    }

    #[test]
    fn test_advance_all_moves_every_pipe() {
        let config = Config::default();
        let mut pipes = Pipes::new();
        pipes.spawn_pair_at(-150, &config);
        pipes.advance_all(&config);
        assert!(pipes.iter().all(|p| p.x == 356));
    }

    #[test]
    fn test_collision_boundary() {
        let config = Config::default();
        let bird = Bird { x: 100, y: 100, vy: 0 };
        assert!(Pipe::new(Role::Top, 100, 100).collides_with(&bird, &config));
        assert!(!Pipe::new(Role::Top, 134, 100).collides_with(&bird, &config));
        // Pipe ending exactly at the bird's top edge
        assert!(!Pipe::new(Role::Top, 100, 100 - 512).collides_with(&bird, &config));
    }

    #[test]
    fn test_try_pass_fires_once() {
        let config = Config::default();
        let mut pipe = Pipe::new(Role::Bottom, -20, 300);
        // right edge 44, bird x 44 is not beyond it
        assert!(!pipe.try_pass(44, &config));
        assert!(pipe.try_pass(45, &config));
        assert!(!pipe.try_pass(45, &config));
        assert!(pipe.passed);
    }

    proptest! {
        #[test]
        fn prop_pair_offset_is_fixed(seed in any::<u64>()) {
            let config = Config::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pipes = Pipes::new();
            pipes.spawn_pair(&mut rng, &config);
            let pair = pipes.as_slice();
            prop_assert_eq!(pair.len(), 2);
            prop_assert_eq!(pair[0].role, Role::Top);
            prop_assert_eq!(pair[1].role, Role::Bottom);
            prop_assert_eq!(pair[1].y - pair[0].y, 672);
            prop_assert_eq!(pair[0].x, pair[1].x);
        }
    }
}
