//! In-memory host capabilities for driving the controller in tests.

use std::time::{Duration, Instant};

use super::host::{Bounds, Clock, Renderer, TickHandle, Viewport};
use super::transform::CardTransform;

/// Manually advanced clock with at most one outstanding tick.
#[derive(Debug)]
pub struct FakeClock {
    now: Instant,
    next_id: u64,
    pub pending: Option<TickHandle>,
    pub requested: usize,
    pub cancelled: usize,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
            next_id: 0,
            pending: None,
            requested: 0,
            cancelled: 0,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn request_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }
}

/// Page with a fixed-size component at a scrollable position.
#[derive(Debug, Clone)]
pub struct FakeViewport {
    pub height: f64,
    pub scroll_y: f64,
    /// Component top in page coordinates.
    pub component_top: f64,
    pub component_height: f64,
    pub scroll_locked: bool,
    pub lock_calls: usize,
}

impl FakeViewport {
    /// Viewport of height 100 with a 50-high component centered at scroll 0.
    pub fn centered() -> Self {
        Self {
            height: 100.0,
            scroll_y: 0.0,
            component_top: 25.0,
            component_height: 50.0,
            scroll_locked: false,
            lock_calls: 0,
        }
    }
}

impl Viewport for FakeViewport {
    fn bounding_box(&self) -> Option<Bounds> {
        Some(Bounds::new(
            self.component_top - self.scroll_y,
            self.component_height,
        ))
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.lock_calls += 1;
    }
}

/// Renderer that records the last transform of each card.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    pub cards: Vec<Option<CardTransform>>,
    /// Indices whose handle lookup fails.
    pub missing: Vec<usize>,
    pub writes: usize,
}

impl RecordingRenderer {
    pub fn new(len: usize) -> Self {
        Self {
            cards: vec![None; len],
            missing: Vec::new(),
            writes: 0,
        }
    }

    pub fn transform(&self, index: usize) -> CardTransform {
        self.cards[index].unwrap_or(CardTransform::HIDDEN)
    }

    pub fn visible(&self) -> Vec<usize> {
        (0..self.cards.len())
            .filter(|&i| self.transform(i).visible)
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    type Handle = usize;

    fn handle(&self, index: usize) -> Option<usize> {
        (index < self.cards.len() && !self.missing.contains(&index)).then_some(index)
    }

    fn apply_transform(&mut self, handle: usize, transform: CardTransform) {
        if handle >= self.cards.len() {
            self.cards.resize(handle + 1, None);
        }
        self.cards[handle] = Some(transform);
        self.writes += 1;
    }
}
