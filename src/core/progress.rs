//! Transition progress interpolator with distance-scaled damping.
//!
//! The target is set by input handlers; the current value chases it once per
//! frame.  Large gaps close quickly, small gaps ease in.  Once the gap drops
//! below [`EPSILON`] the value snaps onto the target and the interpolator
//! reports itself settled so the frame loop can stop.

/// Gap below which the current value snaps onto the target.
pub const EPSILON: f64 = 0.001;

const MIN_DAMPING: f64 = 0.12;
const MAX_DAMPING: f64 = 0.35;
/// Extra damping per unit of remaining distance.
const DISTANCE_GAIN: f64 = 0.6;

#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    current: f64,
    target: f64,
    /// True while frames are needed to reach the target.
    running: bool,
}

impl Interpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set a new target (clamped to `[0, 1]`).  Only the latest target
    /// matters.  Returns `true` when the interpolator went from idle to
    /// running, i.e. when the caller has to schedule a frame.
    pub fn set_target(&mut self, target: f64) -> bool {
        self.target = target.clamp(0.0, 1.0);
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Move the target by `delta`, clamped.
    pub fn nudge(&mut self, delta: f64) -> bool {
        self.set_target(self.target + delta)
    }

    /// Snap both current and target to `value` and stop.
    pub fn reset(&mut self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        self.current = value;
        self.target = value;
        self.running = false;
    }

    /// Advance one frame.  Returns `true` while still running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let gap = self.target - self.current;
        if gap.abs() < EPSILON {
            self.current = self.target;
            self.running = false;
            return false;
        }
        let damping = (MIN_DAMPING + DISTANCE_GAIN * gap.abs()).clamp(MIN_DAMPING, MAX_DAMPING);
        self.current += gap * damping;
        if (self.target - self.current).abs() < EPSILON {
            self.current = self.target;
            self.running = false;
        }
        self.running
    }

    /// Current value has landed on the target.
    pub fn settled_at(&self, value: f64) -> bool {
        !self.running && self.current == value && self.target == value
    }
}
