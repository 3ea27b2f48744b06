mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rainmaker::config::Config;
use rainmaker::game::{Command, Decision, Game, Status};

use display::TerminalMixer;

#[derive(Debug, Parser)]
#[command(name = "rainmaker", version, about = "Seed clouds, fill ponds, land before the tank runs dry")]
struct Cli {
    /// Seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,

    /// Target FPS (15..120)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(15..=120))]
    fps: u16,

    /// Number of ponds
    #[arg(long)]
    ponds: Option<usize>,

    /// Starting fuel
    #[arg(long)]
    fuel: Option<f64>,

    /// Total pond fill (1.0 = one full pond) needed to win
    #[arg(long)]
    win_capacity: Option<f64>,

    /// Write simulation logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(ponds) = self.ponds {
            config.pond_count = ponds;
        }
        if let Some(fuel) = self.fuel {
            config.starting_fuel = fuel;
        }
        if let Some(win) = self.win_capacity {
            config.win_capacity = win;
        }
        config
    }
}

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Input {
    Command(Command),
    Answer(Decision),
    Quit,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers, status: Status) -> Option<Input> {
    if matches!(status, Status::Concluded(_)) {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Input::Answer(Decision::Restart)),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Input::Answer(Decision::Quit)),
            _ => None,
        };
    }
    let command = match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Some(Input::Quit),
        KeyCode::Left => Command::TurnLeft,
        KeyCode::Right => Command::TurnRight,
        KeyCode::Up => Command::IncreaseSpeed,
        KeyCode::Down => Command::DecreaseSpeed,
        KeyCode::Char(' ') => Command::Seed,
        KeyCode::Char('i') | KeyCode::Char('I') => Command::ToggleIgnition,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('b') | KeyCode::Char('B') => Command::ToggleBounds,
        KeyCode::Char('d') | KeyCode::Char('D') => Command::ToggleDistanceLines,
        _ => return None,
    };
    Some(Input::Command(command))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs frames until the player quits.
///
/// Every key press becomes one discrete command; holding a key relies on
/// the terminal's own key repeat, which matches how the throttle and turn
/// controls step by fixed increments.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rng: &mut StdRng,
    mixer: &mut TerminalMixer,
    rx: &mpsc::Receiver<Event>,
    frame: Duration,
) -> std::io::Result<()> {
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match map_key(code, modifiers, game.status()) {
                Some(Input::Command(command)) => game.apply(command, rng, mixer),
                Some(Input::Answer(answer)) => {
                    game.resolve(|_| answer, rng, mixer);
                }
                Some(Input::Quit) => return Ok(()),
                None => {}
            }
        }

        if game.status() == Status::Quit {
            return Ok(());
        }

        game.tick(started.elapsed(), rng, mixer);
        mixer.tick();

        display::render(out, game, mixer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Sends `log` output to `path`. Without a path nothing is installed, since
/// stderr shares the screen with the raw-mode renderer.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = cli.config();
    config.validate().context("invalid game settings")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut mixer = TerminalMixer::default();
    let mut game = Game::new(config, &mut rng, &mut mixer)?;
    let frame = Duration::from_secs(1) / u32::from(cli.fps);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &mut rng, &mut mixer, &rx, frame);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_flag_is_optional() {
        let cli = Cli::try_parse_from(["rainmaker"]).expect("no flags");
        assert_eq!(cli.log_file, None);

        let cli = Cli::try_parse_from(["rainmaker", "--log-file", "run.log"]).expect("log file flag");
        assert_eq!(cli.log_file.as_deref(), Some(Path::new("run.log")));
    }

    #[test]
    fn flags_override_default_settings() {
        let cli = Cli::try_parse_from(["rainmaker", "--ponds", "5", "--fuel", "900", "--win-capacity", "1.5"])
            .expect("settings flags");
        let config = cli.config();
        assert_eq!(config.pond_count, 5);
        assert_eq!(config.starting_fuel, 900.0);
        assert_eq!(config.win_capacity, 1.5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn fps_outside_range_is_refused() {
        assert!(Cli::try_parse_from(["rainmaker", "--fps", "500"]).is_err());
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let path = Path::new("no-such-dir/rainmaker.log");
        assert!(init_logging(Some(path)).is_err());
    }

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(init_logging(None).is_ok());
    }
}
