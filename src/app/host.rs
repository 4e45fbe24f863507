//! Terminal implementations of the controller's clock and viewport.
//!
//! The "page" is a virtual document, taller than the terminal, with the card
//! stack embedded somewhere in the middle.  The terminal window (minus the
//! status bar) is the viewport onto it.  All units are terminal rows.

use std::time::{Duration, Instant};

use crate::core::host::{Bounds, Clock, TickHandle, Viewport};

/// Frame clock driven by the main loop's frame interval.
#[derive(Debug, Default)]
pub struct FrameClock {
    next_id: u64,
    pending: Option<TickHandle>,
    /// Added to the wall clock, so tests can step past deadlines.
    skew: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the tick due on this frame, if one was requested.
    pub fn take_pending(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Move this clock's notion of "now" forward without waiting.
    #[cfg(test)]
    pub fn advance(&mut self, by: Duration) {
        self.skew += by;
    }
}

impl Clock for FrameClock {
    fn now(&self) -> Instant {
        Instant::now() + self.skew
    }

    fn request_tick(&mut self) -> TickHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TickHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Rows of filler content above and below the stack.
pub const SECTION_ROWS: u16 = 40;

/// Scrollable page with the stack embedded between two sections.
#[derive(Debug, Clone)]
pub struct PageViewport {
    scroll_y: u16,
    height: u16,
    stack_height: u16,
    preferred_stack_height: u16,
    scroll_locked: bool,
}

impl PageViewport {
    pub fn new(height: u16, preferred_stack_height: u16) -> Self {
        let mut page = Self {
            scroll_y: 0,
            height,
            stack_height: 0,
            preferred_stack_height,
            scroll_locked: false,
        };
        page.resize(height);
        page
    }

    /// Terminal resized; the stack always fits inside the viewport.
    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.stack_height = self
            .preferred_stack_height
            .min(height.saturating_sub(2))
            .max(1);
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn scroll_top(&self) -> u16 {
        self.scroll_y
    }

    pub fn viewport_rows(&self) -> u16 {
        self.height
    }

    /// First page row of the stack.
    pub fn stack_top(&self) -> u16 {
        SECTION_ROWS
    }

    pub fn stack_rows(&self) -> u16 {
        self.stack_height
    }

    pub fn page_rows(&self) -> u16 {
        SECTION_ROWS * 2 + self.stack_height
    }

    pub fn max_scroll(&self) -> u16 {
        self.page_rows().saturating_sub(self.height)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Scroll the page by `rows`.  Returns `false` when locked or when the
    /// position did not change.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        if self.scroll_locked {
            return false;
        }
        let target = (i32::from(self.scroll_y) + rows).clamp(0, i32::from(self.max_scroll()));
        let target = u16::try_from(target).unwrap_or(self.scroll_y);
        let moved = target != self.scroll_y;
        self.scroll_y = target;
        moved
    }
}

impl Viewport for PageViewport {
    fn bounding_box(&self) -> Option<Bounds> {
        Some(Bounds::new(
            f64::from(self.stack_top()) - f64::from(self.scroll_y),
            f64::from(self.stack_height),
        ))
    }

    fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn scroll_y(&self) -> f64 {
        f64::from(self.scroll_y)
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_page_does_not_scroll() {
        let mut page = PageViewport::new(30, 18);
        assert!(page.scroll_by(5));
        page.set_scroll_locked(true);
        assert!(!page.scroll_by(5));
        assert_eq!(page.scroll_top(), 5);
    }

    #[test]
    fn scroll_is_clamped_to_page() {
        let mut page = PageViewport::new(30, 18);
        page.scroll_by(-10);
        assert_eq!(page.scroll_top(), 0);
        page.scroll_by(10_000);
        assert_eq!(page.scroll_top(), page.max_scroll());
    }

    #[test]
    fn stack_shrinks_to_fit_small_terminals() {
        let mut page = PageViewport::new(30, 18);
        page.resize(10);
        assert_eq!(page.stack_rows(), 8);
        let bounds = page.bounding_box().unwrap();
        assert_eq!(bounds.height, 8.0);
    }

    #[test]
    fn clock_keeps_one_pending_tick() {
        let mut clock = FrameClock::new();
        let first = clock.request_tick();
        clock.cancel_tick(first);
        assert!(!clock.has_pending());
        let second = clock.request_tick();
        assert_ne!(first, second);
        assert_eq!(clock.take_pending(), Some(second));
        assert_eq!(clock.take_pending(), None);
    }

    #[test]
    fn advanced_clock_runs_ahead_of_the_wall_clock() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(5));
        assert!(clock.now() >= Instant::now() + Duration::from_secs(4));
    }
}
