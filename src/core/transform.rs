//! Card position math.
//!
//! Forward and backward transitions are intentionally asymmetric: going
//! forward the outgoing card fades out in place (fully gone at half-way)
//! while the incoming one slides in from the right; going backward the
//! outgoing card slides off to the right and the incoming one fades in
//! where it stands.

use super::host::Renderer;

/// Scale of a card that is not yet (or no longer) in focus.
pub const RECEDED_SCALE: f64 = 0.8;

/// Direction of travel through the card sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward higher indices.
    #[default]
    Forward,
    /// Toward lower indices.
    Backward,
}

impl Direction {
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Forward)
        } else if delta < 0.0 {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Index one step away from `index`, if it stays inside `0..len`.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Forward => (index + 1 < len).then_some(index + 1),
            Direction::Backward => index.checked_sub(1),
        }
    }
}

/// Visual state of a single card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    /// Horizontal offset as a fraction of the card width (`1.0` = one full
    /// width to the right).
    pub offset: f64,
    pub opacity: f64,
    pub scale: f64,
    pub visible: bool,
}

impl CardTransform {
    pub const REST: CardTransform = CardTransform {
        offset: 0.0,
        opacity: 1.0,
        scale: 1.0,
        visible: true,
    };

    pub const HIDDEN: CardTransform = CardTransform {
        offset: 0.0,
        opacity: 0.0,
        scale: RECEDED_SCALE,
        visible: false,
    };
}

/// Transforms for `(current, next)` at `progress` in `direction`.
pub fn card_positions(progress: f64, direction: Direction) -> (CardTransform, CardTransform) {
    let p = progress.clamp(0.0, 1.0);
    let shrink = 1.0 - (1.0 - RECEDED_SCALE) * p;

    match direction {
        Direction::Forward => (
            CardTransform {
                offset: 0.0,
                opacity: (1.0 - p * 2.0).max(0.0),
                scale: shrink,
                visible: true,
            },
            CardTransform {
                offset: 1.0 - p,
                opacity: p,
                scale: RECEDED_SCALE + (1.0 - RECEDED_SCALE) * p,
                visible: true,
            },
        ),
        Direction::Backward => (
            CardTransform {
                offset: p,
                opacity: 1.0 - p,
                scale: shrink,
                visible: true,
            },
            CardTransform {
                offset: 0.0,
                opacity: p,
                scale: 1.0,
                visible: true,
            },
        ),
    }
}

/// Apply [`card_positions`] to both cards of a transition.
pub fn apply_positions<R: Renderer>(
    renderer: &mut R,
    current: R::Handle,
    next: R::Handle,
    progress: f64,
    direction: Direction,
) {
    let (cur, nxt) = card_positions(progress, direction);
    renderer.apply_transform(current, cur);
    renderer.apply_transform(next, nxt);
}
