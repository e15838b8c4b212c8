//! Periodic timers and the command queue that serializes them with input.
//!
//! The tick timer, the spawn timer and key presses all become [`Command`]s in
//! one FIFO, drained on the caller's thread. Each command runs to completion
//! before the next one starts, so the session never sees concurrent mutation.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::sim::{Game, PressOutcome, TickOutcome};

/// Repeating timer. When it falls behind it fires once and reschedules from
/// the current time instead of replaying every missed period.
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    next: Option<Instant>,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// (Re)starts the timer; the first firing is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns true if the timer was due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                let mut next = due + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.next = Some(next);
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tick,
    Spawn,
    Jump,
    Restart,
    /// Restart when over, jump otherwise
    Press,
}

/// Things the front end reacts to: every event means a redraw, some a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One simulation step ran
    Stepped,
    Flapped,
    Crashed,
    Restarted,
}

pub struct Driver {
    game: Game,
    tick: Timer,
    spawn: Timer,
    queue: VecDeque<Command>,
}

impl Driver {
    /// Wraps `game` and starts both timers at `now`.
    pub fn new(game: Game, now: Instant) -> Self {
        let config = game.config();
        let mut driver = Self {
            tick: Timer::new(config.tick_period),
            spawn: Timer::new(config.spawn_period),
            game,
            queue: VecDeque::new(),
        };
        driver.start_timers(now);
        driver
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Queues every timer that is due at `now`, earliest deadline first.
    pub fn poll_timers(&mut self, now: Instant) {
        let mut due: Vec<(Instant, Command)> = Vec::with_capacity(2);
        for (timer, command) in [
            (&mut self.tick, Command::Tick),
            (&mut self.spawn, Command::Spawn),
        ] {
            if let Some(at) = timer.deadline() {
                if timer.fire(now) {
                    due.push((at, command));
                }
            }
        }
        due.sort_by_key(|(at, _)| *at);
        self.queue.extend(due.into_iter().map(|(_, command)| command));
    }

    /// Runs queued commands in order and reports what happened.
    pub fn drain(&mut self, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(command) = self.queue.pop_front() {
            match command {
                Command::Tick => match self.game.on_tick() {
                    TickOutcome::Advanced => events.push(Event::Stepped),
                    TickOutcome::Crashed => {
                        self.stop_timers();
                        events.push(Event::Crashed);
                    }
                    TickOutcome::Idle => self.stop_timers(),
                },
                Command::Spawn => self.game.on_spawn_timer(),
                Command::Jump => {
                    if self.game.on_jump_input() {
                        events.push(Event::Flapped);
                    }
                }
                Command::Restart => {
                    if self.game.on_restart_input() {
                        self.start_timers(now);
                        events.push(Event::Restarted);
                    }
                }
                Command::Press => match self.game.press() {
                    PressOutcome::Jumped => events.push(Event::Flapped),
                    PressOutcome::Restarted => {
                        self.start_timers(now);
                        events.push(Event::Restarted);
                    }
                },
            }
        }
        events
    }

    /// Earliest pending timer deadline, `None` while the game is over.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tick.deadline(), self.spawn.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn start_timers(&mut self, now: Instant) {
        self.tick.start(now);
        self.spawn.start(now);
    }

    fn stop_timers(&mut self) {
        log::debug!("stopping timers");
        self.tick.stop();
        self.spawn.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::Phase;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Steps time forward one tick period at a time until the run ends.
    fn run_until_crash(driver: &mut Driver, mut now: Instant) -> Instant {
        let period = driver.game().config().tick_period;
        loop {
            now += period;
            driver.poll_timers(now);
            if driver.drain(now).contains(&Event::Crashed) {
                return now;
            }
        }
    }

    #[test]
    fn test_timer_coalesces_missed_periods() {
        let t0 = Instant::now();
        let mut timer = Timer::new(ms(10));
        assert!(!timer.fire(t0 + ms(100)));

        timer.start(t0);
        assert!(!timer.fire(t0 + ms(9)));
        assert!(timer.fire(t0 + ms(35)));
        assert_eq!(timer.deadline(), Some(t0 + ms(45)));
        assert!(!timer.fire(t0 + ms(40)));
        assert!(timer.fire(t0 + ms(45)));
        assert_eq!(timer.deadline(), Some(t0 + ms(55)));

        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_tick_fires_after_one_period() {
        let t0 = Instant::now();
        let mut driver = Driver::new(Game::new(Config::default(), 3), t0);

        driver.poll_timers(t0 + ms(10));
        driver.drain(t0 + ms(10));
        assert_eq!(driver.game().session().bird.y, 320);

        driver.poll_timers(t0 + ms(17));
        driver.drain(t0 + ms(17));
        assert_eq!(driver.game().session().bird.y, 321);
    }

    #[test]
    fn test_spawn_fires_on_its_own_period() {
        let t0 = Instant::now();
        let mut driver = Driver::new(Game::new(Config::default(), 3), t0);
        let mut now = t0;
        while now < t0 + ms(1490) {
            now += ms(10);
            driver.poll_timers(now);
            driver.push(Command::Jump);
            driver.drain(now);
            assert!(driver.game().session().pipes.is_empty());
        }

        now = t0 + ms(1500);
        driver.poll_timers(now);
        driver.drain(now);
        let pipes = driver.game().session().pipes.as_slice();
        assert_eq!(pipes.len(), 2);
        // Any tick due at the same time ran first, so the pair has not moved
        assert!(pipes.iter().all(|p| p.x == 360));
    }

    #[test]
    fn test_crash_stops_timers_and_restart_starts_them() {
        let t0 = Instant::now();
        let mut driver = Driver::new(Game::new(Config::default(), 3), t0);
        let now = run_until_crash(&mut driver, t0);

        assert_eq!(driver.game().phase(), Phase::Over);
        assert_eq!(driver.next_deadline(), None);

        driver.push(Command::Jump);
        assert!(driver.drain(now).is_empty());

        let later = now + ms(2000);
        driver.poll_timers(later);
        driver.push(Command::Press);
        assert_eq!(driver.drain(later), vec![Event::Restarted]);
        assert_eq!(driver.game().phase(), Phase::Running);
        assert_eq!(
            driver.next_deadline(),
            Some(later + driver.game().config().tick_period)
        );
    }

    #[test]
    fn test_press_flaps_while_running() {
        let t0 = Instant::now();
        let mut driver = Driver::new(Game::new(Config::default(), 3), t0);
        driver.push(Command::Press);
        driver.push(Command::Restart);
        assert_eq!(driver.drain(t0), vec![Event::Flapped]);
        assert_eq!(driver.game().session().bird.vy, -9);
    }

    #[test]
    fn test_commands_run_in_queue_order() {
        let t0 = Instant::now();
        let mut driver = Driver::new(Game::new(Config::default(), 3), t0);
        // Jump then tick: the tick integrates the jump velocity
        driver.push(Command::Jump);
        driver.push(Command::Tick);
        driver.drain(t0);
        let bird = driver.game().session().bird;
        assert_eq!((bird.y, bird.vy), (312, -8));
    }
}
