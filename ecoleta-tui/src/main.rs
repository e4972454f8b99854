//! Terminal UI for registering an Ecoleta waste collection point.

mod app;
mod config;
mod input;
mod logging;
mod map;
mod tasks;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecoleta_core::{
    form::Completion,
    service::{Backends, EcoletaService},
};
use ecoleta_provider_api as api;
use ecoleta_provider_ibge::IbgeGeography;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::app::App;
use crate::config::Config;
use crate::input::Action;
use crate::tasks::TaskRunner;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    let _log_guard = logging::init(&config.log_file)?;
    info!(api = %config.api_url, ibge = %config.ibge_url, "starting ecoleta-tui");

    // HTTP + service setup
    let client = config.http_client()?;
    let (catalog, registry) = api::ports(client.clone(), &config.api_url);
    let geography = Arc::new(IbgeGeography::with_base_url(
        client.clone(),
        &config.ibge_url,
    ));
    let service = Arc::new(EcoletaService::new(Backends {
        catalog,
        registry,
        geography,
        locator: config.locator(client),
    }));
    let (runner, completions) = TaskRunner::new(service);

    // App state
    let app = App::new(config.zoom);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &runner, completions).await;
    runner.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("ui loop failed: {err:#}");
    }
    info!("ecoleta-tui stopped");
    res
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    runner: &TaskRunner,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()> {
    runner.spawn_all(app.form.mount());

    loop {
        // Fold finished lookups into the form before drawing
        while let Ok(completion) = completions.try_recv() {
            app.apply(completion);
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if !event::poll(StdDuration::from_millis(100))? {
            tokio::task::yield_now().await;
            continue;
        }

        let action = match event::read()? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                input::handle_key_event(key, &mut app)
            }
            CEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                let screen = Rect::new(0, 0, size.width, size.height);
                input::handle_mouse_event(mouse, &mut app, screen)
            }
            _ => Action::None,
        };

        match action {
            Action::Quit => break,
            Action::None => {}
            Action::Spawn(requests) => runner.spawn_all(requests),
        }
    }

    Ok(())
}
