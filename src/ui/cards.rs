//! Card surfaces and the widget that paints them.
//!
//! [`CardSurfaces`] is the controller's renderer: it only records the latest
//! [`CardTransform`] per card.  [`CardStackWidget`] turns those transforms
//! into terminal cells: scale shrinks the card's box, offset shifts it right
//! by a fraction of the stack width, opacity picks a progressively dimmer
//! style.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::cards::Card;
use crate::core::host::Renderer;
use crate::core::transform::CardTransform;

use super::theme::Theme;

/// Cards with opacity at or below this are not drawn at all.
const INVISIBLE_OPACITY: f64 = 0.05;

// ───────────────────────────────────────── renderer ──────────

/// Per-card visual state written by the controller.
#[derive(Debug, Clone, Default)]
pub struct CardSurfaces {
    transforms: Vec<CardTransform>,
}

impl CardSurfaces {
    pub fn new(len: usize) -> Self {
        Self {
            transforms: vec![CardTransform::HIDDEN; len],
        }
    }

    /// Match a new deck length; existing transforms are kept.
    pub fn resize(&mut self, len: usize) {
        self.transforms.resize(len, CardTransform::HIDDEN);
    }

    pub fn transforms(&self) -> &[CardTransform] {
        &self.transforms
    }
}

impl Renderer for CardSurfaces {
    type Handle = usize;

    fn handle(&self, index: usize) -> Option<usize> {
        (index < self.transforms.len()).then_some(index)
    }

    fn apply_transform(&mut self, handle: usize, transform: CardTransform) {
        if let Some(slot) = self.transforms.get_mut(handle) {
            *slot = transform;
        }
    }
}

// ───────────────────────────────────────── geometry ──────────

/// Screen rect of a card inside a stack whose top-left corner may lie above
/// the visible area (`stack_y` negative).  Returns `None` when nothing of the
/// card is visible.
pub fn card_rect(
    stack_x: i32,
    stack_y: i32,
    width: u16,
    height: u16,
    transform: &CardTransform,
    clip: Rect,
) -> Option<Rect> {
    let scale = transform.scale.clamp(0.0, 1.0);
    let w = (f64::from(width) * scale).round() as i32;
    let h = (f64::from(height) * scale).round() as i32;
    if w < 3 || h < 3 {
        return None;
    }
    let shift = (transform.offset * f64::from(width)).round() as i32;
    let x = stack_x + (i32::from(width) - w) / 2 + shift;
    let y = stack_y + (i32::from(height) - h) / 2;

    let left = x.max(i32::from(clip.x));
    let top = y.max(i32::from(clip.y));
    let right = (x + w).min(i32::from(clip.right()));
    let bottom = (y + h).min(i32::from(clip.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        u16::try_from(left).ok()?,
        u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    ))
}

// ───────────────────────────────────────── widget ────────────

/// Draws every visible card of the stack.
pub struct CardStackWidget<'a> {
    pub cards: &'a [Card],
    pub surfaces: &'a CardSurfaces,
    /// Stack origin on screen; `y` may be negative when scrolled partly out.
    pub origin: (i32, i32),
    pub width: u16,
    pub height: u16,
    pub active: bool,
}

impl Widget for CardStackWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Faintest first so the card in focus ends up on top.
        let mut order: Vec<(usize, &CardTransform)> = self
            .surfaces
            .transforms()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.visible && t.opacity > INVISIBLE_OPACITY)
            .collect();
        order.sort_by(|a, b| a.1.opacity.total_cmp(&b.1.opacity));

        for (index, transform) in order {
            let Some(card) = self.cards.get(index) else {
                continue;
            };
            let Some(rect) = card_rect(
                self.origin.0,
                self.origin.1,
                self.width,
                self.height,
                transform,
                area,
            ) else {
                continue;
            };

            let style = Theme::card_style(transform.opacity);
            let block = Block::default()
                .title(format!(" {} · {}/{} ", card.title, index + 1, self.cards.len()))
                .title_style(Theme::card_title_style(transform.opacity))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::card_border_style(self.active, transform.opacity));

            let lines: Vec<Line> = card.body.iter().map(|l| Line::raw(l.as_str())).collect();
            Clear.render(rect, buf);
            Paragraph::new(lines)
                .style(style)
                .wrap(Wrap { trim: false })
                .block(block)
                .render(rect, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn rest_fills_the_stack() {
        let r = card_rect(0, 2, 80, 18, &CardTransform::REST, clip()).unwrap();
        assert_eq!(r, Rect::new(0, 2, 80, 18));
    }

    #[test]
    fn offset_shifts_and_clips() {
        let mut t = CardTransform::REST;
        t.offset = 0.5;
        let r = card_rect(0, 0, 80, 18, &t, clip()).unwrap();
        assert_eq!(r.x, 40);
        assert_eq!(r.width, 40);

        t.offset = 1.0;
        assert!(card_rect(0, 0, 80, 18, &t, clip()).is_none());
    }

    #[test]
    fn scale_shrinks_around_center() {
        let mut t = CardTransform::REST;
        t.scale = 0.5;
        let r = card_rect(0, 0, 80, 20, &t, clip()).unwrap();
        assert_eq!(r, Rect::new(20, 5, 40, 10));
    }

    #[test]
    fn stack_above_viewport_is_clipped() {
        let r = card_rect(0, -10, 80, 18, &CardTransform::REST, clip()).unwrap();
        assert_eq!(r, Rect::new(0, 0, 80, 8));
    }

    #[test]
    fn surfaces_ignore_unknown_handles() {
        let mut s = CardSurfaces::new(2);
        s.apply_transform(5, CardTransform::REST);
        assert_eq!(s.handle(1), Some(1));
        assert_eq!(s.handle(2), None);
        assert_eq!(s.transforms()[0], CardTransform::HIDDEN);
    }
}
