//! Session state and the controller that owns it

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::step::step;
use super::{Bird, Pipe, Pipes};
use crate::config::Config;

/// Everything a single run mutates. Replaced wholesale on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub bird: Bird,
    pub pipes: Pipes,
    /// Half-point granularity
    pub score: f64,
    pub over: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            bird: Bird::new(config),
            pipes: Pipes::new(),
            score: 0.0,
            over: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Over,
}

/// What a tick did, so the driver knows whether to keep its timers running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Advanced one step, still running
    Advanced,
    /// Advanced one step and the run ended on it
    Crashed,
    /// Already over, nothing happened
    Idle,
}

/// Result of the single action key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Jumped,
    Restarted,
}

/// Point-in-time view for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub bird: (i32, i32),
    pub pipes: &'a [Pipe],
    pub score: u32,
    pub over: bool,
}

/// Owns the current session and routes timer and input callbacks into it.
pub struct Game {
    config: Config,
    rng: Pcg32,
    session: Session,
    runs: u32,
}

impl Game {
    pub fn new(config: Config, seed: u64) -> Self {
        log::info!("new game, seed {seed}");
        let session = Session::new(&config);
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            session,
            runs: 1,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        if self.session.over {
            Phase::Over
        } else {
            Phase::Running
        }
    }

    pub fn on_tick(&mut self) -> TickOutcome {
        if self.session.over {
            return TickOutcome::Idle;
        }
        step(&mut self.session, &self.config);
        if self.session.over {
            log::info!(
                "run {} over with score {}",
                self.runs,
                self.session.score as u32
            );
            TickOutcome::Crashed
        } else {
            TickOutcome::Advanced
        }
    }

    /// Spawns a pair while running; ignored once over.
    pub fn on_spawn_timer(&mut self) {
        if !self.session.over {
            self.session.pipes.spawn_pair(&mut self.rng, &self.config);
        }
    }

    /// Returns true if the bird actually jumped.
    pub fn on_jump_input(&mut self) -> bool {
        if self.session.over {
            return false;
        }
        self.session.bird.jump(&self.config);
        true
    }

    /// Starts a fresh session if the current one is over.
    pub fn on_restart_input(&mut self) -> bool {
        if !self.session.over {
            return false;
        }
        self.session = Session::new(&self.config);
        self.runs += 1;
        log::info!("run {} started", self.runs);
        true
    }

    /// The single action key: restart when over, jump otherwise.
    pub fn press(&mut self) -> PressOutcome {
        if self.on_restart_input() {
            PressOutcome::Restarted
        } else {
            self.on_jump_input();
            PressOutcome::Jumped
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            bird: (self.session.bird.x, self.session.bird.y),
            pipes: self.session.pipes.as_slice(),
            score: self.session.score as u32,
            over: self.session.over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Role;

    fn crash(game: &mut Game) {
        while game.on_tick() != TickOutcome::Crashed {}
    }

    #[test]
    fn test_new_game_is_running() {
        let game = Game::new(Config::default(), 1);
        assert_eq!(game.phase(), Phase::Running);
        let snap = game.snapshot();
        assert_eq!(snap.bird, (45, 320));
        assert!(snap.pipes.is_empty());
        assert_eq!(snap.score, 0);
        assert!(!snap.over);
    }

    #[test]
    fn test_tick_outcomes() {
        let mut game = Game::new(Config::default(), 1);
        assert_eq!(game.on_tick(), TickOutcome::Advanced);
        crash(&mut game);
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.on_tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_jump_ignored_when_over() {
        let mut game = Game::new(Config::default(), 1);
        crash(&mut game);
        let before = game.session().clone();
        assert!(!game.on_jump_input());
        assert_eq!(game.session(), &before);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut game = Game::new(Config::default(), 1);
        game.on_tick();
        let before = game.session().clone();
        assert!(!game.on_restart_input());
        assert_eq!(game.session(), &before);
    }

    #[test]
    fn test_spawn_ignored_when_over() {
        let mut game = Game::new(Config::default(), 1);
        crash(&mut game);
        game.on_spawn_timer();
        assert!(game.session().pipes.is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let config = Config::default();
        let mut game = Game::new(config.clone(), 99);
        for _ in 0..5 {
            game.on_spawn_timer();
        }
        game.session.score = 12.5;
        crash(&mut game);
        assert!(!game.session().pipes.is_empty());

        assert_eq!(game.press(), PressOutcome::Restarted);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.session(), &Session::new(&config));
        assert_eq!(game.snapshot().score, 0);
    }

    #[test]
    fn test_press_jumps_while_running() {
        let mut game = Game::new(Config::default(), 1);
        game.on_tick();
        assert_eq!(game.press(), PressOutcome::Jumped);
        assert_eq!(game.session().bird.vy, -9);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_snapshot_truncates_score_and_keeps_order() {
        let mut game = Game::new(Config::default(), 5);
        game.on_spawn_timer();
        game.session.score = 2.5;
        let snap = game.snapshot();
        assert_eq!(snap.score, 2);
        let roles: Vec<Role> = snap.pipes.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![Role::Top, Role::Bottom]);
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = Game::new(Config::default(), 42);
        let mut b = Game::new(Config::default(), 42);
        for _ in 0..3 {
            a.on_spawn_timer();
            b.on_spawn_timer();
        }
        assert_eq!(a.session().pipes, b.session().pipes);
    }
}
