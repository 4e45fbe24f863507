//! Viewport activation gate.
//!
//! Decides whether the stack should capture input, based purely on where the
//! component sits in the viewport and which way the page last scrolled.

use super::host::Bounds;

/// Maximum distance between component center and viewport center, as a
/// fraction of the viewport height.
pub const CENTER_TOLERANCE: f64 = 0.25;

/// Snapshot of the component's position relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub bounds: Bounds,
    pub viewport_height: f64,
    pub distance_from_center: f64,
    pub is_near_center: bool,
}

impl Placement {
    pub fn measure(bounds: Bounds, viewport_height: f64) -> Self {
        let distance_from_center = (bounds.center() - viewport_height / 2.0).abs();
        let fully_visible = bounds.top >= 0.0 && bounds.bottom() <= viewport_height;
        Self {
            bounds,
            viewport_height,
            distance_from_center,
            is_near_center: fully_visible
                && distance_from_center < viewport_height * CENTER_TOLERANCE,
        }
    }
}

/// What the gate wants done with activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateDecision {
    pub activate: Option<bool>,
    pub clear_completed: bool,
}

/// Evaluate the gate after a (debounced) page scroll.
pub fn on_scroll(placement: Placement, scrolling_up: bool, has_completed_stack: bool) -> GateDecision {
    if scrolling_up && placement.bounds.bottom() < 0.0 {
        return GateDecision {
            activate: Some(false),
            clear_completed: false,
        };
    }

    let clear_completed = scrolling_up && placement.is_near_center;
    let completed = has_completed_stack && !clear_completed;

    let activate = if placement.is_near_center && !completed {
        Some(true)
    } else if !placement.is_near_center {
        Some(false)
    } else {
        None
    };

    GateDecision {
        activate,
        clear_completed,
    }
}

/// Evaluate the gate when a touch begins on the page.
pub fn on_touch_start(placement: Placement, has_completed_stack: bool) -> bool {
    placement.is_near_center && !has_completed_stack
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 40.0;

    #[test]
    fn centered_and_fully_visible_is_near_center() {
        let p = Placement::measure(Bounds::new(10.0, 20.0), VH);
        assert!(p.is_near_center);
        assert_eq!(p.distance_from_center, 0.0);
    }

    #[test]
    fn clipped_element_is_never_near_center() {
        // Center is within tolerance but the bottom edge is cut off.
        let p = Placement::measure(Bounds::new(12.0, 30.0), VH);
        assert!(p.distance_from_center < VH * CENTER_TOLERANCE);
        assert!(!p.is_near_center);
    }

    #[test]
    fn too_far_from_center() {
        let p = Placement::measure(Bounds::new(0.0, 8.0), VH);
        assert!(!p.is_near_center);
    }

    #[test]
    fn scrolled_past_upward_forces_deactivation() {
        let p = Placement::measure(Bounds::new(-30.0, 20.0), VH);
        let d = on_scroll(p, true, false);
        assert_eq!(d.activate, Some(false));
        assert!(!d.clear_completed);
    }

    #[test]
    fn completed_stack_blocks_activation_until_scrolling_back_up() {
        let p = Placement::measure(Bounds::new(10.0, 20.0), VH);
        let down = on_scroll(p, false, true);
        assert_eq!(down.activate, None);

        let up = on_scroll(p, true, true);
        assert!(up.clear_completed);
        assert_eq!(up.activate, Some(true));
    }

    #[test]
    fn leaving_center_deactivates() {
        let p = Placement::measure(Bounds::new(-5.0, 20.0), VH);
        assert_eq!(on_scroll(p, false, false).activate, Some(false));
    }

    #[test]
    fn touch_start_respects_completion() {
        let p = Placement::measure(Bounds::new(10.0, 20.0), VH);
        assert!(on_touch_start(p, false));
        assert!(!on_touch_start(p, true));
    }
}
