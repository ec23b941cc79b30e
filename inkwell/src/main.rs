use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tokio::sync::mpsc;

use inkwell::api::{ApiClient, BlogApi};
use inkwell::app::{handlers::handle_key_event, App};
use inkwell::auth::SessionProvider;
use inkwell::config::{ConfigManager, Settings};
use inkwell::logging::{self, LogConfig};
use inkwell::{terminal, ui};

const TICK: Duration = Duration::from_millis(100);

/// Inkwell - read and discuss blog posts from the terminal
#[derive(Parser)]
#[command(name = "inkwell")]
#[command(about = "A keyboard-driven terminal client for the Inkwell blogging platform")]
#[command(version)]
struct Cli {
    /// API origin, e.g. http://localhost:3000
    #[arg(long)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Do not read or write the saved session cookie
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // INKWELL_API_URL may come from a local .env
    let _ = dotenv::dotenv();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    logging::init_logging(&log_config)?;

    let config_manager = match ConfigManager::new() {
        Ok(manager) => Some(manager),
        Err(e) => {
            log::warn!("Running without a config directory: {:#}", e);
            None
        }
    };
    let settings = Settings::load(config_manager.as_ref().map(|m| m.config_dir()), cli.api_url)
        .context("Failed to load settings")?;
    log::info!("Using API at {}", settings.api_url);

    let api: Arc<dyn BlogApi> = Arc::new(
        ApiClient::new(settings.api_url.as_str()).context("Failed to create API client")?,
    );

    let store = config_manager
        .as_ref()
        .filter(|_| settings.persist_session && !cli.no_persist)
        .map(ConfigManager::session_store);
    let session = SessionProvider::new(store);

    terminal::install_panic_hook();
    let mut tui = terminal::init()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(api, tx, session, config_manager, log_config);
    app.start();

    let result = run(&mut tui, &mut app, &mut rx);

    terminal::restore()?;
    result
}

fn run(
    tui: &mut terminal::Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<inkwell::app::AppMessage>,
) -> Result<()> {
    while app.running {
        tui.draw(|frame| ui::render(app, frame))
            .context("Failed to draw frame")?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key)?;
            }
        }

        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }
        app.tick(Instant::now());
    }
    Ok(())
}
