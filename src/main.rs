//! A scroll- and swipe-driven card stack in the terminal.
//!
//! Run the binary with an optional deck file (cards separated by `---`
//! lines) to page through it.  Run with `--write-config` to write the
//! current configuration to disk.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    cards,
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::ui::{layout::AppLayout, page::PageWidget, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll- and swipe-driven card stack")]
struct Cli {
    /// Deck file: cards separated by lines containing only `---`.
    /// A built-in demo deck is shown when omitted.
    deck: Option<PathBuf>,

    /// Animation frame rate (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,

    /// Write debug logs to this file (filter with `RUST_LOG`).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the current configuration to its config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        // The terminal belongs to the UI, so logs only go to a file.
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut config = config::AppConfig::load();
    if let Some(fps) = cli.fps {
        config.fps = fps.clamp(10, 120);
    }

    // ── config-writing mode ───────────────────────────────────
    if cli.write_config {
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    let deck = match &cli.deck {
        Some(path) => cards::load_deck(path)?,
        None => cards::demo_deck(),
    };

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let rows = terminal.size()?.height.saturating_sub(1);
    let mut state = AppState::new(deck, cli.deck.clone(), config, rows);
    tracing::info!(cards = state.cards.len(), fps = state.config.fps, "card stack started");

    // ── event + frame sources ─────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(250));
    let mut frames = tokio::time::interval(state.config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            frame.render_widget(
                PageWidget {
                    page: state.stack.viewport(),
                    cards: &state.cards,
                    surfaces: state.stack.renderer(),
                    active: state.stack.is_active(),
                },
                layout.page_area,
            );

            let summary_style = if state.stack.is_active() {
                Theme::status_active_style()
            } else {
                Theme::status_bar_style()
            };
            let hint = state.config.status_bar_hint();
            let message = state.status_message.as_deref().unwrap_or(&hint);
            let status = Line::from(vec![
                Span::styled(state.stack_summary(), summary_style),
                Span::raw(" "),
                Span::raw(message),
            ]);
            frame.render_widget(
                Paragraph::new(status).style(Theme::status_bar_style()),
                layout.status_area,
            );
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(_, h) => handler::handle_resize(&mut state, h),
                    AppEvent::Focus(focused) => handler::handle_focus(&mut state, focused),
                    AppEvent::Tick => {}
                }
            }

            _ = frames.tick(), if state.stack.clock().has_pending() => {
                handler::handle_frame(&mut state);
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.stack.unmount();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}
