// src/main.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::{execute, terminal};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::unbounded_channel;

mod bridge;
mod config;
mod document;
mod input;
mod models;
mod network;
mod overlay;
mod prompts;
mod theme;
mod ui;

use crate::bridge::{PanelController, bridge_channels};
use crate::config::Settings;
use crate::document::Document;
use crate::models::AppEvent;
use crate::network::SummaryClient;
use crate::overlay::OverlayController;
use crate::theme::Theme;
use crate::ui::OverlayScreen;

/// Margin between selection and overlay, in cells.
const OVERLAY_CELL_MARGIN: i32 = 2;

#[derive(Parser)]
#[command(name = "sumlens", about = "Read a text file and summarize selections with AI")]
struct Cli {
    /// Text file to open
    path: String,
    /// Override the configured model
    #[arg(long)]
    model: Option<String>,
    /// Store an API key in the user config and use it
    #[arg(long)]
    api_key: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut settings = Settings::new()?;
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if let Some(api_key) = cli.api_key {
        config::save_api_key(&api_key)?;
        settings.api_key = Some(api_key);
    }

    let document = Document::load(&cli.path)?;
    let client = Arc::new(SummaryClient::from_settings(&settings));
    let rt = Runtime::new()?;

    // Page context actor for whole-document summaries. It gets its own
    // client and the full visible text; the panel only ever talks to it
    // through the bridge channels.
    let (request_tx, request_rx, message_tx, mut message_rx) = bridge_channels();
    rt.spawn(bridge::run_page_context(
        document.visible_text(),
        SummaryClient::from_settings(&settings),
        request_rx,
        message_tx,
    ));
    let mut panel = PanelController::new(request_tx);

    let (event_tx, mut event_rx) = unbounded_channel::<AppEvent>();
    let mut controller = OverlayController::with_margin(OVERLAY_CELL_MARGIN);
    let theme = Theme::default();

    let mut scroll_y: usize = 0;
    let mut selection_anchor = None;
    let mut selection_head = None;
    let mut overlay_screen: Option<OverlayScreen> = None;

    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        // Drain work finished off the UI thread.
        while let Ok(AppEvent::SummaryReady(summary)) = event_rx.try_recv() {
            controller.finish_summarize(summary);
        }
        while let Ok(message) = message_rx.try_recv() {
            panel.on_message(message);
        }

        let selection = match (selection_anchor, selection_head) {
            (Some(a), Some(h)) => Some((a, h)),
            _ => None,
        };
        terminal.draw(|f| {
            overlay_screen = ui::render(
                f,
                &document,
                scroll_y,
                selection,
                &controller,
                &panel,
                &theme,
            );
        })?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key_event) => {
                    let viewport_height = terminal.size()?.height.saturating_sub(3) as usize;
                    if !input::handle_key(
                        key_event.code,
                        &document,
                        &mut scroll_y,
                        viewport_height,
                        &controller,
                        &mut panel,
                    )? {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => {
                    let size = terminal.size()?;
                    let viewport = Rect {
                        x: 0,
                        y: 0,
                        width: size.width,
                        height: size.height.saturating_sub(3),
                    };
                    input::handle_mouse(
                        mouse_event,
                        &document,
                        &mut scroll_y,
                        &mut selection_anchor,
                        &mut selection_head,
                        &mut controller,
                        overlay_screen,
                        viewport,
                        &client,
                        &event_tx,
                        &rt,
                    );
                }
                _ => {}
            }
        }
    }

    execute!(terminal.backend_mut(), DisableMouseCapture)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Logging goes to a file; the terminal belongs to the UI.
fn init_logging() {
    let path = config::get_log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(file) = std::fs::File::create(&path) {
        let filter = tracing_subscriber::EnvFilter::try_from_env("SUMLENS_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .try_init();
    }
}
