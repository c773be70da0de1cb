//! skyboard: AI weather insights in the terminal
//!
//! ```sh
//! skyboard
//! skyboard --endpoint http://localhost:8080/weather --refresh-interval-ms 30000
//! RUST_LOG=skyboard=debug skyboard --log-file ./skyboard.log
//! ```

use std::io;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use skyboard::api::HttpWeatherSource;
use skyboard::app;
use skyboard::config::Config;
use skyboard::logging;

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = Config::parse();

    let log_path = config.log_path();
    if let Err(e) = logging::init_logging(&log_path) {
        eprintln!("Warning: logging disabled: {e}");
    }
    tracing::info!(
        endpoint = %config.endpoint,
        log_file = %log_path.display(),
        "Starting skyboard"
    );

    let source = HttpWeatherSource::new(config.endpoint.clone());

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app::run(&mut terminal, source, config.refresh_interval()).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Dashboard exited with an error");
    }
    result
}
