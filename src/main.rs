mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use display::TerminalSurface;
use parallax_shooter::clock::FrameClock;
use parallax_shooter::compute::Game;
use parallax_shooter::config::GameConfig;
use parallax_shooter::input::{HoldTracker, InputState, Key};
use parallax_shooter::surface::Surface;

/// A key is considered "held" if its last press/repeat event arrived within
/// this long.  Covers terminals that don't emit key-release events: OS
/// key-repeat runs at 15 Hz or faster, so a held key is refreshed well
/// before the window runs out whatever `--fps` is.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

const HINT_PLAYING: &str = "↑ ↓ / W S : Move   SPACE : Shoot   D : Debug   Q : Quit";
const HINT_OVER: &str = "R : Play Again   Q : Quit";

#[derive(Parser, Debug)]
#[command(name = "parallax_shooter", about = "Side-scrolling shooter for the terminal")]
struct Args {
    /// Seed for enemy spawns; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the debug overlay hidden.
    #[arg(long, default_value_t = false)]
    no_debug: bool,

    /// Target frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write logs to this file (RUST_LOG controls the level).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    // The terminal belongs to the renderer, so logs only ever go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn direction_for(code: &KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
        _ => None,
    }
}

enum Outcome {
    Quit,
    Restart,
}

/// Runs one game until the player quits or asks for a restart.
///
/// Input model: key events are folded into an `InputState` as they are
/// drained from the channel; the simulation only ever sees the snapshot
/// taken once per frame.  Held direction keys are tracked with the time
/// they were last seen so terminals without release events still let go.
fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: &mut StdRng,
    frame_budget: Duration,
) -> std::io::Result<Outcome> {
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(cols, rows, config.width, config.height);
    let mut game = Game::new(config.clone());
    let mut input = InputState::new();
    let mut holds = HoldTracker::new(HOLD_WINDOW);
    let mut clock = FrameClock::new();
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending events (non-blocking) ───────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if let Some(key) = direction_for(&code) {
                            input.press(key);
                            holds.seen(key, Instant::now());
                            continue;
                        }
                        match code {
                            KeyCode::Char(' ') => input.fire(),
                            KeyCode::Char('d') | KeyCode::Char('D')
                                if kind == KeyEventKind::Press =>
                            {
                                input.toggle_debug()
                            }
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(Outcome::Quit);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(Outcome::Quit);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') if game.is_over() => {
                                return Ok(Outcome::Restart);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(key) = direction_for(&code) {
                            input.release(key);
                            holds.forget(key);
                        }
                    }
                },
                Event::Resize(cols, rows) => surface.resize(cols, rows),
                _ => {}
            }
        }

        // Let go of keys whose repeats stopped arriving.
        for key in holds.expire(Instant::now()) {
            input.release(key);
        }

        let snapshot = input.snapshot();
        let dt = clock.tick(started.elapsed().as_secs_f64() * 1000.0);
        game.update(dt, &snapshot, rng);

        surface.clear_rect(game.bounds())?;
        game.draw(&mut surface)?;
        let hint = if game.is_over() { HINT_OVER } else { HINT_PLAYING };
        surface.present(out, hint)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: &mut StdRng,
    frame_budget: Duration,
) -> std::io::Result<()> {
    loop {
        out.execute(terminal::Clear(terminal::ClearType::All))?;
        match play(out, rx, config, rng, frame_budget)? {
            Outcome::Quit => return Ok(()),
            Outcome::Restart => tracing::info!("restarting"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = GameConfig::default().with_debug(!args.no_debug);
    let frame_budget = Duration::from_secs_f64(1.0 / args.fps.clamp(1, 240) as f64);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("failed to enter the alternate screen")?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, &mut rng, frame_budget);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}
