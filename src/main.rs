//! SOC Dashboard
//!
//! A security-operations console for the terminal: boot sequence, live
//! threat feed, command line and a secure-comms contact form.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use soc_dashboard::tui::App;
use soc_dashboard::{Dashboard, DashboardConfig};
use std::fs::{self, File};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Input poll timeout; also the longest gap between frames
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "soc-dashboard", version, about = "Security operations console for the terminal")]
struct Cli {
    /// Portfolio content (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the simulated feed and animations
    #[arg(long)]
    seed: Option<u64>,

    /// Go straight to the dashboard
    #[arg(long)]
    skip_boot: bool,

    /// Diagnostic log destination
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("soc-dashboard")
        .join("dashboard.log")
}

/// The terminal belongs to the UI, so diagnostics go to a file
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_tracing(&log_path)?;

    let config = DashboardConfig::load(cli.config.as_deref())?;
    info!(version = soc_dashboard::VERSION, "starting dashboard");

    let mut builder = Dashboard::builder(config).skip_boot(cli.skip_boot);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let mut app = App::new(builder.build());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("dashboard closed");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut last = Instant::now();
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_input(FRAME_BUDGET)?;

        let now = Instant::now();
        app.tick(now - last);
        last = now;
    }
    Ok(())
}
