mod api;
mod app;
mod cli;
mod config;
mod format;
mod logging;
mod models;
mod ui;
mod validation;

use std::io;
use anyhow::Result;
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::ApiClient;
use crate::app::AppState;
use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let cli = Cli::parse();
    let config = config::init(&cli)?;
    logging::init_tracing(&config)?;

    println!("Initializing client manager...");
    info!(api = config.api_base_url(), "starting client manager");

    let api = ApiClient::new(config.api_base_url());

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state; the first fetch is already queued
    let mut app_state = AppState::new(api, config.initial_search.clone());

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        error!(error = %err, "client manager exited with an error");
        println!("Error: {}", err);
    }

    info!("client manager stopped");
    println!("Thanks for using Client Manager!");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render_app(f, app_state))?;

        // Queued requests run after the frame that shows their loading state
        if app_state.has_pending() {
            app_state.run_pending().await;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app_state.handle_key(key.code) {
                break;
            }
        }
    }

    Ok(())
}
