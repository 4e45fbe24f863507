//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme (change colours here and they propagate everywhere).
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    /// Body style for a card at `opacity`.  Terminals have no alpha, so
    /// opacity is approximated in three steps.
    pub fn card_style(opacity: f64) -> Style {
        if opacity >= 0.75 {
            Style::default().fg(Color::White)
        } else if opacity >= 0.35 {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        }
    }

    pub fn card_title_style(opacity: f64) -> Style {
        if opacity >= 0.75 {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::card_style(opacity)
        }
    }

    pub fn card_border_style(active: bool, opacity: f64) -> Style {
        match (active, opacity >= 0.75) {
            (true, true) => Style::default().fg(Color::Cyan),
            (false, true) => Style::default().fg(Color::Gray),
            _ => Self::card_style(opacity),
        }
    }

    // ── page ───────────────────────────────────────────────────
    pub fn page_heading_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn page_text_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn page_filler_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn status_active_style() -> Style {
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }
}
