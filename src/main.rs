use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};

use rect_raiders::{FrameDriver, Game, GameConfig, InputManager};

#[derive(Parser, Debug)]
#[command(name = "rect_raiders")]
#[command(about = "Dodge and shoot falling rectangles in the terminal")]
struct Cli {
    /// TOML file overriding the default game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for enemy placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game
    #[arg(long, default_value = "debug.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    info!("starting with {config:?}");

    let rng = match cli.seed {
        Some(seed) => {
            info!("enemy placement seeded with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    if !supports_keyboard_enhancement {
        warn!(
            "terminal does not report key releases, holding keys for {} frames per press",
            config.timing.key_hold_frames
        );
    }

    let mut terminal = setup_terminal(supports_keyboard_enhancement)?;

    let input_manager = InputManager::new(
        supports_keyboard_enhancement,
        config.timing.key_hold_frames,
        (config.surface.width, config.surface.height),
    );
    let game = Game::new(config, rng);
    let result = FrameDriver::new(game, input_manager).run(&mut terminal);

    let restored = restore_terminal(supports_keyboard_enhancement);
    let cursor = terminal.show_cursor().wrap_err("show cursor");

    info!("exiting");
    result.and(restored).and(cursor)
}

type GameTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal into raw/alternate-screen mode. If any step after raw
/// mode fails, the terminal is put back before the error is returned.
fn setup_terminal(keyboard_enhancement: bool) -> Result<GameTerminal> {
    enable_raw_mode().wrap_err("enable raw mode")?;

    let setup = || -> Result<GameTerminal> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        // Enable keyboard enhancement AFTER entering alternate screen
        if keyboard_enhancement {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }

        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    };

    setup().inspect_err(|_| {
        if let Err(err) = restore_terminal(keyboard_enhancement) {
            warn!("terminal restore after failed setup: {err}");
        }
    })
}

/// Undoes [`setup_terminal`]. Every step runs even if an earlier one fails;
/// the first failure is returned.
fn restore_terminal(keyboard_enhancement: bool) -> Result<()> {
    let mut stdout = stdout();
    let popped = if keyboard_enhancement {
        execute!(stdout, PopKeyboardEnhancementFlags).wrap_err("pop keyboard flags")
    } else {
        Ok(())
    };
    let raw = disable_raw_mode().wrap_err("disable raw mode");
    let screen = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)
        .wrap_err("leave alternate screen");
    popped.and(raw).and(screen)
}

fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).wrap_err_with(|| format!("create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("install logger")
}
