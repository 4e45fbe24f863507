//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::core::stack::CardStack;
use crate::ui::cards::CardSurfaces;

use super::cards::{self, Card};
use super::host::{FrameClock, PageViewport};

/// The controller as hosted in the terminal.
pub type TerminalStack = CardStack<FrameClock, PageViewport, CardSurfaces>;

/// Top-level application state.
pub struct AppState {
    pub stack: TerminalStack,
    /// Deck currently shown; indices match the stack's card indices.
    pub cards: Vec<Card>,
    /// File the deck came from, if any (enables reloading).
    pub deck_path: Option<PathBuf>,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// A left-button drag (standing in for touch) is in progress.
    pub dragging: bool,
}

impl AppState {
    pub fn new(
        cards: Vec<Card>,
        deck_path: Option<PathBuf>,
        config: AppConfig,
        viewport_rows: u16,
    ) -> Self {
        let len = cards.len();
        let page = PageViewport::new(viewport_rows, config.stack_height);
        let stack = CardStack::new(len, FrameClock::new(), page, CardSurfaces::new(len));
        Self {
            stack,
            cards,
            deck_path,
            config,
            should_quit: false,
            status_message: None,
            dragging: false,
        }
    }

    /// Re-read the deck file and swap the new card sequence in.
    pub fn reload_deck(&mut self) {
        let Some(path) = self.deck_path.clone() else {
            self.status_message = Some("Built-in deck, nothing to reload".into());
            return;
        };
        match cards::load_deck(&path) {
            Ok(cards) => {
                let len = cards.len();
                self.cards = cards;
                self.stack.renderer_mut().resize(len);
                self.stack.replace_cards(len);
                self.status_message = Some(format!("Reloaded {len} cards"));
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "deck reload failed");
                self.status_message = Some(format!("Reload failed: {err:#}"));
            }
        }
    }

    /// Controller summary for the status bar.
    pub fn stack_summary(&self) -> String {
        let stack = &self.stack;
        let mode = if stack.is_active() {
            "captured"
        } else if stack.has_completed_stack() {
            "done"
        } else {
            "released"
        };
        let heading = match stack.next_index() {
            Some(next) => format!("→{}", next + 1),
            None => String::new(),
        };
        format!(
            " card {}{}/{} · {:?} · {:>3.0}% · {} ",
            stack.current_index() + 1,
            heading,
            stack.len(),
            stack.phase_kind(),
            stack.progress() * 100.0,
            mode,
        )
    }
}
