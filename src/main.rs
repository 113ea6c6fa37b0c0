mod display;

use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cosmic_defender::compute::{
    apply_move_delta, fire, new_session, restart_game, start_game, tick,
};
use cosmic_defender::config::GameConfig;
use cosmic_defender::entities::{GameSession, SessionStatus};
use cosmic_defender::input::{HeldInput, KeyTracker};
use cosmic_defender::snapshot::build_snapshot;

use display::Screen;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

/// Cosmic Defender - hold the line against the descending invaders
#[derive(Parser)]
#[command(name = "cosmic_defender")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file overriding any of the tuning tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for enemy placement and explosion sparks
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal (default)
    Play,

    /// Run the simulation with an autopilot and print the final frame as JSON
    Headless {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "3600")]
        ticks: u64,

        /// Fire once every this many ticks
        #[arg(short, long, default_value = "8")]
        fire_every: u64,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => run_terminal(config, &mut rng)?,
        Commands::Headless { ticks, fire_every } => {
            run_headless(config, &mut rng, ticks, fire_every)?
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(File::create(path)?))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// ── Headless autopilot ────────────────────────────────────────────────────────

/// Steer under the enemy closest to the bottom.
fn autopilot(session: &GameSession) -> HeldInput {
    let target = session
        .enemies
        .iter()
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|e| e.x);
    match target {
        Some(x) if x < session.player_x - session.config.player.step => HeldInput::left(),
        Some(x) if x > session.player_x + session.config.player.step => HeldInput::right(),
        _ => HeldInput::none(),
    }
}

fn run_headless(
    config: GameConfig,
    rng: &mut impl Rng,
    ticks: u64,
    fire_every: u64,
) -> Result<(), Box<dyn Error>> {
    let tick_ms = config.tick_interval_ms;
    let fire_every = fire_every.max(1);
    let t0 = Instant::now();
    let mut session = start_game(&new_session(config, t0), t0);

    for n in 1..=ticks {
        let now = t0 + Duration::from_millis(tick_ms * n);
        if n % fire_every == 0 {
            session = fire(&session, now);
        }
        let input = autopilot(&session);
        session = tick(&session, &input, now, rng);
        if !session.is_playing() {
            break;
        }
    }

    info!(score = session.score, ticks = session.tick_count, "headless run finished");
    println!("{}", serde_json::to_string_pretty(&build_snapshot(&session))?);
    Ok(())
}

// ── Terminal front end ────────────────────────────────────────────────────────

fn run_terminal(config: GameConfig, rng: &mut impl Rng) -> Result<(), Box<dyn Error>> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, config, &rx, rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    Ok(())
}

/// Runs until the player quits.
///
/// Input model: direction keys go through a `KeyTracker` and are sampled
/// once at the top of every tick; firing, start and restart act on the event
/// itself, outside the tick cadence.  A mouse drag stands in for a touch
/// drag and releasing the button fires, like lifting a finger.
fn game_loop<W: Write>(
    out: &mut W,
    config: GameConfig,
    rx: &mpsc::Receiver<Event>,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let frame_len = config.tick_interval();
    let mut session = new_session(config, Instant::now());
    let mut keys: KeyTracker<KeyCode> = KeyTracker::default();
    let mut drag_column: Option<u16> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (width, height) = terminal::size()?;
        let screen = Screen { width, height };

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        keys.press(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(' ') if session.is_playing() => {
                                session = fire(&session, Instant::now());
                            }
                            KeyCode::Char(' ') | KeyCode::Enter
                                if session.status == SessionStatus::Idle =>
                            {
                                session = start_game(&session, Instant::now());
                                keys.clear();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                session = restart_game(&session, Instant::now());
                                keys.clear();
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Release => keys.release(&code),
                },
                Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) => drag_column = Some(column),
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some(last) = drag_column {
                            let delta = display::columns_to_percent(
                                column as i32 - last as i32,
                                screen,
                            );
                            session = apply_move_delta(&session, delta);
                        }
                        drag_column = Some(column);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        drag_column = None;
                        session = fire(&session, Instant::now());
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // ── Tick ──────────────────────────────────────────────────────────────
        let held = keys.sample(&LEFT_KEYS, &RIGHT_KEYS, frame);
        session = tick(&session, &held, Instant::now(), rng);

        display::render(out, &build_snapshot(&session), screen)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            std::thread::sleep(frame_len - elapsed);
        }
    }
}
