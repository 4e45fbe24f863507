//! Screen geometry: the page/status split and where the stack sits on screen.

use ratatui::layout::{Constraint, Layout, Rect};

use crate::app::host::PageViewport;

/// Columns kept free on each side of the stack.
const STACK_MARGIN: u16 = 2;

/// The page viewport above a one-row status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let [page_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        Self {
            page_area,
            status_area,
        }
    }
}

/// Screen position of the stack slot for the current page scroll.
///
/// `y` is signed: the slot keeps its full height while scrolled partly (or
/// entirely) above or below the page area, and each card is clipped later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackSlot {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl StackSlot {
    pub fn within(page_area: Rect, page: &PageViewport) -> Self {
        let y = i32::from(page_area.y) + i32::from(page.stack_top())
            - i32::from(page.scroll_top());
        Self {
            x: i32::from(page_area.x) + i32::from(STACK_MARGIN),
            y,
            width: page_area.width.saturating_sub(STACK_MARGIN * 2),
            height: page.stack_rows(),
        }
    }

    /// Part of the slot inside `page_area`, if any.
    pub fn visible_part(&self, page_area: Rect) -> Option<Rect> {
        let top = self.y.max(i32::from(page_area.y));
        let bottom = (self.y + i32::from(self.height)).min(i32::from(page_area.bottom()));
        if bottom <= top || self.width == 0 {
            return None;
        }
        Some(Rect::new(
            u16::try_from(self.x).ok()?,
            u16::try_from(top).ok()?,
            self.width,
            u16::try_from(bottom - top).ok()?,
        ))
    }
}
