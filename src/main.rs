//! userdesk binary entry point.
//!
//! Parses configuration, initializes logging and the terminal in raw mode,
//! runs the TUI event loop, and restores the terminal state on exit.
//!
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use userdesk::Result;
use userdesk::api::HttpUsersApi;
use userdesk::app::keymap::Keymap;
use userdesk::app::settings::FileSettings;
use userdesk::app::worker::Worker;
use userdesk::app::{self, AppState};
use userdesk::config::Cli;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    userdesk::logging::init(&cli.log_path())?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let api = HttpUsersApi::new(cli.api_url.clone(), cli.timeout())
        .context("build HTTP client")?;
    let mut worker = Worker::new(Arc::new(api), runtime.handle().clone());

    let settings = FileSettings::load(cli.settings_path());
    let keymap = Keymap::load_or_init(&cli.keybinds_path());
    let mut state = AppState::new(Box::new(settings), keymap, cli.page_size, cli.api_url.clone());

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &mut worker);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
