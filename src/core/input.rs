//! Input normalizers: raw wheel, touch and page-scroll notifications in,
//! direction plus bounded progress deltas out.
//!
//! Normalizers are pure bookkeeping.  Whether an intent is acted upon
//! (activation, lock during reversal) is decided by the stack.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::transform::Direction;

// ───────────────────────────────────────── wheel ─────────────

/// Idle time after which the wheel accumulator starts over.
pub const WHEEL_RESET: Duration = Duration::from_millis(100);
/// Largest delta a single wheel event may contribute.
pub const WHEEL_MAX_EVENT_DELTA: f64 = 120.0;
/// Largest accumulated delta within one wheel burst.
pub const WHEEL_MAX_ACCUMULATED: f64 = 360.0;
/// Progress step at full wheel velocity.
pub const WHEEL_STEP: f64 = 0.18;
const WHEEL_MIN_VELOCITY_FACTOR: f64 = 0.35;
pub const FORWARD_SENSITIVITY: f64 = 1.0;
/// Backward is more sensitive so leaving the stack upward takes less effort.
pub const BACKWARD_SENSITIVITY: f64 = 1.6;
/// Deltas below this magnitude count as "small" for the escape heuristic.
pub const WHEEL_SMALL_DELTA: f64 = 12.0;
/// Consecutive small backward deltas that force an escape at the first card.
pub const WHEEL_ESCAPE_COUNT: u32 = 3;

/// A wheel event reduced to a direction and a progress step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelIntent {
    pub direction: Direction,
    pub step: f64,
    /// Consecutive small backward deltas, including this one.
    pub small_backward_streak: u32,
}

impl WheelIntent {
    /// This event was a backward delta below [`WHEEL_SMALL_DELTA`].
    pub fn is_small_backward(&self) -> bool {
        self.small_backward_streak > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct WheelNormalizer {
    accumulated: f64,
    last_event: Option<Instant>,
    small_backward_streak: u32,
}

impl WheelNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw wheel delta (positive = toward the next card).
    pub fn push(&mut self, delta_y: f64, now: Instant) -> Option<WheelIntent> {
        if self
            .last_event
            .is_none_or(|t| now.saturating_duration_since(t) > WHEEL_RESET)
        {
            self.accumulated = 0.0;
        }
        self.last_event = Some(now);

        let direction = Direction::from_delta(delta_y)?;
        let delta = delta_y.clamp(-WHEEL_MAX_EVENT_DELTA, WHEEL_MAX_EVENT_DELTA);

        // A change of direction starts a new burst.
        if self.accumulated * delta < 0.0 {
            self.accumulated = 0.0;
        }
        self.accumulated =
            (self.accumulated + delta).clamp(-WHEEL_MAX_ACCUMULATED, WHEEL_MAX_ACCUMULATED);

        if direction == Direction::Backward && delta.abs() < WHEEL_SMALL_DELTA {
            self.small_backward_streak += 1;
        } else {
            self.small_backward_streak = 0;
        }

        let sensitivity = match direction {
            Direction::Forward => FORWARD_SENSITIVITY,
            Direction::Backward => BACKWARD_SENSITIVITY,
        };
        let velocity = (self.accumulated.abs() / WHEEL_MAX_ACCUMULATED)
            .clamp(WHEEL_MIN_VELOCITY_FACTOR, 1.0);

        Some(WheelIntent {
            direction,
            step: WHEEL_STEP * sensitivity * velocity,
            small_backward_streak: self.small_backward_streak,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ───────────────────────────────────────── touch ─────────────

/// Flick velocity (px/ms) above which a release snaps along the flick.
pub const TOUCH_VELOCITY_THRESHOLD: f64 = 0.4;
pub const TOUCH_MAX_VELOCITY: f64 = 3.0;
/// Finger travel (px) that corresponds to a full transition.
pub const TOUCH_TRAVEL: f64 = 320.0;
pub const TOUCH_MAX_STEP: f64 = 0.25;
/// Per-event cap while forced progression is on.
pub const TOUCH_FORCED_MAX_STEP: f64 = 0.6;
/// Moves closer together than this are dropped (unless forced).
pub const TOUCH_MIN_INTERVAL: Duration = Duration::from_millis(8);
pub const TOUCH_BURST_WINDOW: Duration = Duration::from_millis(120);
/// More moves than this inside the burst window force progression.
pub const TOUCH_BURST_COUNT: usize = 4;

/// A touch move reduced to a signed progress delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDrag {
    pub direction: Direction,
    /// Unsigned progress amount along `direction`.
    pub amount: f64,
}

/// How a released touch should settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchRelease {
    /// Fast enough to snap along the flick direction.
    Flick(Direction),
    /// Too slow; settle on the nearer end.
    Settle,
}

#[derive(Debug, Clone, Default)]
pub struct TouchNormalizer {
    last_y: Option<f64>,
    last_time: Option<Instant>,
    velocity: f64,
    recent: VecDeque<Instant>,
    forced: bool,
}

impl TouchNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.last_y.is_some()
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn forced_progression(&self) -> bool {
        self.forced
    }

    pub fn start(&mut self, y: f64, now: Instant) {
        *self = Self::default();
        self.last_y = Some(y);
        self.last_time = Some(now);
    }

    /// Feed a touch sample.  Positive travel (finger moving up) is forward.
    pub fn move_to(&mut self, y: f64, now: Instant) -> Option<TouchDrag> {
        let (last_y, last_time) = (self.last_y?, self.last_time?);

        self.recent.push_back(now);
        while self
            .recent
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) > TOUCH_BURST_WINDOW)
        {
            self.recent.pop_front();
        }
        if self.recent.len() > TOUCH_BURST_COUNT {
            self.forced = true;
        }

        let elapsed = now.saturating_duration_since(last_time);
        if !self.forced && elapsed < TOUCH_MIN_INTERVAL {
            return None;
        }

        let delta = last_y - y;
        let elapsed_ms = (elapsed.as_secs_f64() * 1000.0).max(1.0);
        self.velocity = (delta / elapsed_ms).clamp(-TOUCH_MAX_VELOCITY, TOUCH_MAX_VELOCITY);
        self.last_y = Some(y);
        self.last_time = Some(now);

        let direction = Direction::from_delta(delta)?;
        let cap = if self.forced {
            TOUCH_FORCED_MAX_STEP
        } else {
            TOUCH_MAX_STEP
        };
        Some(TouchDrag {
            direction,
            amount: (delta.abs() / TOUCH_TRAVEL).min(cap),
        })
    }

    /// Finish the gesture.  Returns `None` if no touch was in progress.
    pub fn end(&mut self) -> Option<TouchRelease> {
        self.last_y?;
        let velocity = self.velocity;
        *self = Self::default();
        if velocity.abs() >= TOUCH_VELOCITY_THRESHOLD {
            Direction::from_delta(velocity).map(TouchRelease::Flick)
        } else {
            Some(TouchRelease::Settle)
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

// ───────────────────────────────────────── page scroll ───────

pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(50);

/// Trailing-edge debounce of page-scroll notifications.
#[derive(Debug, Clone, Default)]
pub struct ScrollNormalizer {
    last_scroll_y: f64,
    deadline: Option<Instant>,
}

impl ScrollNormalizer {
    pub fn new(scroll_y: f64) -> Self {
        Self {
            last_scroll_y: scroll_y,
            deadline: None,
        }
    }

    /// Record a scroll notification; the evaluation is pushed back.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + SCROLL_DEBOUNCE);
    }

    /// Force an evaluation on the next poll.
    pub fn notify_immediate(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the debounce elapsed, consume it and report whether the page moved
    /// upward since the last evaluation.
    pub fn poll(&mut self, now: Instant, scroll_y: f64) -> Option<bool> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let scrolling_up = scroll_y < self.last_scroll_y;
        self.last_scroll_y = scroll_y;
        Some(scrolling_up)
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
