mod action;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod filter;
mod forge;
mod github;
mod tui;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::filter::Filter;
use crate::forge::Forge;
use crate::github::GitHub;
use crate::tui::EventHandler;

/// Terminal inbox for the GitHub issues and pull requests that involve you.
#[derive(Parser, Debug)]
#[command(name = "gh-inbox", version, about)]
struct Cli {}

/// Log to `<cache dir>/gh-inbox/gh-inbox.log`; stderr belongs to the TUI.
/// Logging stays off if the file cannot be opened.
fn init_logging() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("gh-inbox")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("gh-inbox.log"))
    else {
        return;
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _cli = Cli::parse();
    init_logging();

    let config = Config::load();

    let token = match auth::resolve_token(config.general.token_command.as_deref()) {
        Ok(token) => token,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let github = GitHub::new(token, &config.general.api_url, config.timeout())?;
    let forge: Arc<dyn Forge> = Arc::new(github);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(forge, config.filters).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(forge: Arc<dyn Forge>, filters: Vec<Filter>) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(forge, filters, action_tx);

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => app.dispatch(event),
                }
            }
            // Completions of spawned requests
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
