use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute, terminal,
};
use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant};

use flappy_lab::audio::{Audio, Sfx};
use flappy_lab::render::{self, PixelBuf};
use flappy_lab::{Command, Config, Driver, Event, Game};

/// How long to block on input while no timer is running.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> io::Result<()> {
    env_logger::init();

    let seed: u64 = rand::random();
    let game = Game::new(Config::default(), seed);
    let audio = Audio::open();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&mut out, game, audio.as_ref());
    if let Err(e) = &result {
        log::error!("terminal error: {e}");
    }
    let restored = restore(&mut out);
    first_error(result, restored)
}

/// Leaves the alternate screen and raw mode, attempting every step.
fn restore(out: &mut Stdout) -> io::Result<()> {
    let screen = execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    );
    let raw = terminal::disable_raw_mode();
    screen.and(raw)
}

/// The game loop's error wins over a failure to restore the terminal.
fn first_error(run: io::Result<()>, restore: io::Result<()>) -> io::Result<()> {
    match (run, restore) {
        (Err(e), Err(restore_err)) => {
            log::error!("terminal restore failed too: {restore_err}");
            Err(e)
        }
        (run, restore) => run.and(restore),
    }
}

fn run(out: &mut Stdout, game: Game, audio: Option<&Audio>) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let mut driver = Driver::new(game, Instant::now());
    let mut dirty = true;

    loop {
        if dirty {
            let game = driver.game();
            render::draw(&mut buf, &game.snapshot(), game.config());
            buf.flush(out)?;
            dirty = false;
        }

        let timeout = driver
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        // Input
        if event::poll(timeout)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        driver.push(Command::Press)
                    }
                    KeyCode::Char('r') => driver.push(Command::Restart),
                    _ => {}
                },
                TermEvent::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                    dirty = true;
                }
                _ => {}
            }
        }

        // Update
        let now = Instant::now();
        driver.poll_timers(now);
        for event in driver.drain(now) {
            dirty = true;
            if let Some(audio) = audio {
                match event {
                    Event::Flapped => audio.play(Sfx::Flap),
                    Event::Crashed => audio.play(Sfx::Death),
                    Event::Stepped | Event::Restarted => {}
                }
            }
        }
    }
}
