//! Card deck loading.
//!
//! A deck file is plain text.  Cards are separated by a line containing only
//! `---`; the first non-empty line of each card is its title, the rest its
//! body.

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

/// Line that separates two cards in a deck file.
const SEPARATOR: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck contains no cards")]
    Empty,
}

/// Split deck text into cards.  Blank sections are skipped.
pub fn parse_deck(text: &str) -> Result<Vec<Card>, DeckError> {
    let mut cards = Vec::new();
    let mut section: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once(SEPARATOR)) {
        if line.trim() != SEPARATOR {
            section.push(line);
            continue;
        }
        let mut lines = section.drain(..).skip_while(|l| l.trim().is_empty());
        if let Some(title) = lines.next() {
            let mut body: Vec<String> = lines.map(|l| l.trim_end().to_string()).collect();
            while body.last().is_some_and(|l| l.is_empty()) {
                body.pop();
            }
            cards.push(Card {
                title: title.trim().to_string(),
                body,
            });
        }
    }

    if cards.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(cards)
}

pub fn load_deck(path: &Path) -> anyhow::Result<Vec<Card>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading deck {}", path.display()))?;
    let cards = parse_deck(&text).with_context(|| format!("parsing deck {}", path.display()))?;
    tracing::debug!(count = cards.len(), path = %path.display(), "deck loaded");
    Ok(cards)
}

/// Deck shown when no file is given.
pub fn demo_deck() -> Vec<Card> {
    const DEMO: &str = "\
Welcome
Scroll the page until this stack sits in the middle
of the window.  It then captures the wheel and the
page stops moving.
---
Wheel
Each wheel notch pushes the next card in.
Stop halfway and it settles on the nearer card.
Scrolling back up is more sensitive than down.
---
Swipe
Drag with the left mouse button to swipe.
A quick flick snaps straight to the next card.
---
Change your mind
Reverse direction mid-swipe and the cards
snap back before accepting new input.
---
The end
Scroll down once more to release the page.
The stack will not grab the wheel again until you
scroll back up to it.
";
    parse_deck(DEMO).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separator_lines() {
        let cards = parse_deck("One\nbody a\n\n---\n\nTwo\n---\n").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "One");
        assert_eq!(cards[0].body, vec!["body a".to_string()]);
        assert_eq!(cards[1].title, "Two");
        assert!(cards[1].body.is_empty());
    }

    #[test]
    fn blank_sections_are_skipped() {
        let cards = parse_deck("---\n\n---\nOnly\n").unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn empty_deck_is_an_error() {
        assert_eq!(parse_deck("\n  \n---\n"), Err(DeckError::Empty));
    }

    #[test]
    fn demo_deck_has_cards() {
        assert_eq!(demo_deck().len(), 5);
    }
}
