//! Capabilities the controller borrows from its host platform.
//!
//! The controller never talks to a terminal, browser or windowing system
//! directly.  Frame scheduling, viewport geometry, page scroll-lock and card
//! styling all come in through these three traits, which keeps the state
//! machine testable with the fakes in [`super::testing`].

use std::fmt;
use std::time::Instant;

use super::transform::CardTransform;

// ───────────────────────────────────────── clock ─────────────

/// Opaque handle for a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Frame scheduler.
///
/// `request_tick` asks the host to call [`CardStack::on_frame`] with the
/// returned handle on the next frame.  The host must not call back with a
/// handle that has been cancelled.
///
/// [`CardStack::on_frame`]: super::stack::CardStack::on_frame
pub trait Clock {
    fn now(&self) -> Instant;
    fn request_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
}

// ───────────────────────────────────────── viewport ──────────

/// Vertical extent of the component, relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// The page the component is embedded in.
pub trait Viewport {
    /// Component bounds, or `None` when it is not laid out yet.
    fn bounding_box(&self) -> Option<Bounds>;
    /// Visible height of the viewport.
    fn height(&self) -> f64;
    /// Current document scroll position.
    fn scroll_y(&self) -> f64;
    /// Suppress (`true`) or restore (`false`) normal page scrolling.
    fn set_scroll_locked(&mut self, locked: bool);
}

// ───────────────────────────────────────── renderer ──────────

/// Applies visual state to the cards.
pub trait Renderer {
    type Handle: Copy + PartialEq + fmt::Debug;

    /// Handle for the card at `index`, if one exists.
    fn handle(&self, index: usize) -> Option<Self::Handle>;

    fn apply_transform(&mut self, handle: Self::Handle, transform: CardTransform);
}
