use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use checklist::ui::App;
use checklist::{report, Config, Store};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "checklist", version, about = "Onboarding checklist in the terminal")]
struct Cli {
    /// Directory holding the stored list and the log file
    #[arg(long, env = "CHECKLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Key the task list is stored under
    #[arg(long, env = "CHECKLIST_STORAGE_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive checklist (default)
    Tui,
    /// Print every task grouped by day
    List,
    /// Print how much of the checklist is done
    Progress,
    /// Forget the stored list so the next start uses the built-in one
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::with_overrides(cli.data_dir, cli.key);
    init_logging(&config)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(&config),
        Command::List => {
            let store = Store::initialize(config.repository());
            print!("{}", report::task_listing(store.checklist()));
            Ok(())
        }
        Command::Progress => {
            let store = Store::initialize(config.repository());
            println!("{}", report::progress_line(store.checklist()));
            Ok(())
        }
        Command::Reset => {
            config
                .repository()
                .clear()
                .context("failed to remove stored checklist")?;
            info!(key = %config.storage_key, "stored checklist removed");
            println!("Stored checklist removed.");
            Ok(())
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    // The terminal belongs to the UI, so logs go to a file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(config: &Config) -> Result<()> {
    let store = Store::initialize(config.repository());
    let mut app = App::new(store);

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = event_loop(&mut terminal, &mut app);

    drop(guard);
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }
    result
}

/// Raw mode and the alternate screen for as long as this lives, on every
/// exit path including a failed setup.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        Self::enter_with(
            enable_raw_mode,
            || execute!(io::stdout(), EnterAlternateScreen),
            restore_terminal,
        )
    }

    fn enter_with(
        raw_mode: impl FnOnce() -> io::Result<()>,
        alternate_screen: impl FnOnce() -> io::Result<()>,
        restore: fn(),
    ) -> Result<Self> {
        raw_mode()?;
        let guard = Self { restore };
        alternate_screen()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're typing
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }
    Ok(())
}
