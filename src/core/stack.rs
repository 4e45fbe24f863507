//! Card stack transition orchestrator.
//!
//! [`CardStack`] owns the whole per-instance state: the current index, the
//! transition phase, the progress interpolator, the input normalizers and
//! activation.  Platform access goes through the injected [`Clock`],
//! [`Viewport`] and [`Renderer`].
//!
//! ## Phases
//!
//! ```text
//!   Idle ──input──▶ Preparing ──frame──▶ Animating ──target 1──▶ Committing ──settle──▶ Idle(next)
//!                                           │  ╰──target 0──────────────────────────────▶ Idle
//!                                           ╰──reverse (> 0.1)──▶ Reversing ──done──────▶ Idle
//! ```
//!
//! Input handlers only touch the phase, the progress target and activation.
//! Card transforms are written from [`CardStack::on_frame`] (plus mount and
//! sequence resets), so input arriving between frames can never tear the
//! visual state.
//!
//! Every timer (commit settle delay, reversal animation, wheel settle,
//! page-scroll debounce) is a deadline serviced by the frame loop, so the
//! single outstanding tick is the only thing that ever needs cancelling.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::error::StackError;
use super::gate::{self, Placement};
use super::host::{Clock, Renderer, TickHandle, Viewport};
use super::input::{
    ScrollNormalizer, TouchNormalizer, TouchRelease, WheelNormalizer, WHEEL_ESCAPE_COUNT,
};
use super::progress::Interpolator;
use super::transform::{apply_positions, CardTransform, Direction};

/// Pause between reaching the next card and committing the index swap.
pub const SETTLE_DELAY: Duration = Duration::from_millis(80);
/// Length of the snap-back animation after a direction change.
pub const REVERSE_DURATION: Duration = Duration::from_millis(300);
/// Progress above which a direction change plays the snap-back animation.
pub const REVERSE_THRESHOLD: f64 = 0.1;
/// Progress below which small backward wheel deltas may escape the stack.
pub const ESCAPE_PROGRESS: f64 = 0.05;
/// Quiet time after the last wheel event before a wheel-driven transition
/// runs to completion (or back to the start if its target fell to zero).
pub const WHEEL_SETTLE_DELAY: Duration = Duration::from_millis(150);

// ───────────────────────────────────────── state ─────────────

/// A transition that has been requested but whose cards are not captured yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub direction: Direction,
    pub from: usize,
    pub to: usize,
}

/// A transition with both card handles captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<H> {
    pub direction: Direction,
    pub from: usize,
    pub to: usize,
    pub current: H,
    pub next: H,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase<H> {
    Idle,
    Preparing(PendingTransition),
    Animating(Transition<H>),
    Committing {
        transition: Transition<H>,
        settle_until: Instant,
    },
    Reversing {
        transition: Transition<H>,
        started: Instant,
        from_progress: f64,
        adopt: Direction,
    },
}

/// Observable phase without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Preparing,
    Animating,
    Committing,
    Reversing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Activation {
    is_active: bool,
    has_completed_stack: bool,
}

// ───────────────────────────────────────── controller ────────

pub struct CardStack<C: Clock, V: Viewport, R: Renderer> {
    clock: C,
    viewport: V,
    renderer: R,
    len: usize,
    current_index: usize,
    /// Most recently adopted direction.
    direction: Direction,
    phase: Phase<R::Handle>,
    progress: Interpolator,
    activation: Activation,
    wheel: WheelNormalizer,
    touch: TouchNormalizer,
    scroll: ScrollNormalizer,
    /// True when the in-flight transition was started by the current touch
    /// gesture; opposite drags then pull it back instead of reversing.
    gesture_owns_transition: bool,
    /// Cards to put back at rest on the next frame after a cheap reset.
    restore: Option<Transition<R::Handle>>,
    wheel_settle_at: Option<Instant>,
    tick: Option<TickHandle>,
    hidden: bool,
    mounted: bool,
}

impl<C: Clock, V: Viewport, R: Renderer> CardStack<C, V, R> {
    /// Mount a stack of `len` cards and lay them out with card 0 on top.
    pub fn new(len: usize, clock: C, viewport: V, renderer: R) -> Self {
        let scroll = ScrollNormalizer::new(viewport.scroll_y());
        let mut stack = Self {
            clock,
            viewport,
            renderer,
            len,
            current_index: 0,
            direction: Direction::Forward,
            phase: Phase::Idle,
            progress: Interpolator::new(),
            activation: Activation::default(),
            wheel: WheelNormalizer::new(),
            touch: TouchNormalizer::new(),
            scroll,
            gesture_owns_transition: false,
            restore: None,
            wheel_settle_at: None,
            tick: None,
            hidden: false,
            mounted: true,
        };
        stack.layout();
        // Evaluate placement once right away, the page may already be
        // scrolled to the component.
        let now = stack.clock.now();
        stack.scroll.notify_immediate(now);
        stack.ensure_tick();
        stack
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Interpolated transition progress.
    pub fn progress(&self) -> f64 {
        self.progress.current()
    }

    pub fn target(&self) -> f64 {
        self.progress.target()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase_kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Preparing(_) => PhaseKind::Preparing,
            Phase::Animating(_) => PhaseKind::Animating,
            Phase::Committing { .. } => PhaseKind::Committing,
            Phase::Reversing { .. } => PhaseKind::Reversing,
        }
    }

    /// Index of the card being transitioned to, if any.
    pub fn next_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Idle => None,
            Phase::Preparing(p) => Some(p.to),
            Phase::Animating(t)
            | Phase::Committing { transition: t, .. }
            | Phase::Reversing { transition: t, .. } => Some(t.to),
        }
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_active
    }

    pub fn has_completed_stack(&self) -> bool {
        self.activation.has_completed_stack
    }

    /// True only during the index-swap commit.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Committing { .. })
    }

    /// True while a snap-back animation drops all input.
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Reversing { .. })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ── lifecycle ───────────────────────────────────────────────

    /// Swap in a new card sequence.  All transition state is dropped and
    /// every card is laid out again from index 0.
    pub fn replace_cards(&mut self, len: usize) {
        if !self.mounted {
            return;
        }
        debug!(old = self.len, new = len, "card sequence replaced");
        self.len = len;
        self.current_index = 0;
        self.phase = Phase::Idle;
        self.restore = None;
        self.wheel_settle_at = None;
        self.progress.reset(0.0);
        self.wheel.reset();
        self.touch.cancel();
        self.gesture_owns_transition = false;
        self.layout();
    }

    /// Page became hidden (`true`) or visible again (`false`).
    pub fn on_visibility_change(&mut self, hidden: bool) {
        self.hidden = hidden;
        if hidden {
            self.cancel_tick();
            self.touch.cancel();
            self.gesture_owns_transition = false;
        } else {
            self.ensure_tick();
        }
    }

    /// Tear down: cancel the frame loop and every deadline, and give page
    /// scrolling back.  Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.cancel_tick();
        self.scroll.cancel();
        self.wheel.reset();
        self.touch.cancel();
        self.restore = None;
        self.wheel_settle_at = None;
        self.mounted = false;
        self.activation.is_active = false;
        self.viewport.set_scroll_locked(false);
        debug!("card stack unmounted");
    }

    // ── input ───────────────────────────────────────────────────

    /// Wheel input; positive `delta_y` moves toward the next card.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if !self.accepts_input() {
            return;
        }
        let now = self.clock.now();
        let Some(intent) = self.wheel.push(delta_y, now) else {
            return;
        };

        if intent.is_small_backward() && self.in_escape_window() {
            if intent.small_backward_streak >= WHEEL_ESCAPE_COUNT {
                debug!("small backward wheel streak at first card, releasing");
                self.cheap_reset(Direction::Backward);
                self.wheel.reset();
                self.set_active(false);
            }
            // Below the count the forward transition is left alone.
            return;
        }

        self.drive(intent.direction, intent.step, false);
        if self.in_flight().is_some() {
            self.wheel_settle_at = Some(now + WHEEL_SETTLE_DELAY);
            self.ensure_tick();
        }
    }

    pub fn on_touch_start(&mut self, y: f64) {
        if !self.mounted || self.hidden {
            return;
        }
        if let Some(placement) = self.placement() {
            if gate::on_touch_start(placement, self.activation.has_completed_stack) {
                self.set_active(true);
            }
        }
        if !self.accepts_input() {
            return;
        }
        let now = self.clock.now();
        self.touch.start(y, now);
        self.gesture_owns_transition = false;
    }

    pub fn on_touch_move(&mut self, y: f64) {
        if !self.accepts_input() {
            return;
        }
        let now = self.clock.now();
        let Some(drag) = self.touch.move_to(y, now) else {
            return;
        };
        self.drive(drag.direction, drag.amount, true);
    }

    pub fn on_touch_end(&mut self) {
        let Some(release) = self.touch.end() else {
            return;
        };
        self.gesture_owns_transition = false;
        if !self.accepts_input() {
            return;
        }

        match (self.in_flight(), release) {
            (Some(direction), TouchRelease::Flick(flick)) => {
                let target = if flick == direction { 1.0 } else { 0.0 };
                self.progress.set_target(target);
            }
            (Some(_), TouchRelease::Settle) => {
                let target = if self.progress.target() >= 0.5 { 1.0 } else { 0.0 };
                self.progress.set_target(target);
            }
            (None, TouchRelease::Flick(flick)) if self.phase == Phase::Idle => {
                self.begin(flick, 0.0);
                if matches!(self.phase, Phase::Preparing(_)) {
                    self.progress.set_target(1.0);
                }
            }
            _ => {}
        }
        trace!(goal = self.progress.target(), ?release, "touch released");
        self.ensure_tick();
    }

    /// Native page scroll happened; the gate is evaluated once it settles.
    pub fn on_scroll(&mut self) {
        if !self.mounted {
            return;
        }
        let now = self.clock.now();
        self.scroll.notify(now);
        self.ensure_tick();
    }

    // ── frame ───────────────────────────────────────────────────

    /// Frame callback for the tick requested through [`Clock::request_tick`].
    /// Handles other than the outstanding one are ignored.
    pub fn on_frame(&mut self, handle: TickHandle) {
        if self.tick != Some(handle) {
            trace!(?handle, "stale frame callback ignored");
            return;
        }
        self.tick = None;
        let now = self.clock.now();

        if let Some(transition) = self.restore.take() {
            self.rest(transition);
        }

        let scroll_y = self.viewport.scroll_y();
        if let Some(scrolling_up) = self.scroll.poll(now, scroll_y) {
            self.evaluate_gate(scrolling_up);
        }

        if self.wheel_settle_at.is_some_and(|at| now >= at) {
            self.wheel_settle_at = None;
            if self.in_flight().is_some() && !self.touch.is_tracking() {
                // Any remaining progress completes the card the burst pushed in.
                let goal = if self.progress.target() > 0.0 { 1.0 } else { 0.0 };
                self.progress.set_target(goal);
                trace!(goal, "wheel burst over, settling");
            }
        }

        self.step(now);
        self.ensure_tick();
    }

    fn step(&mut self, now: Instant) {
        match self.phase {
            Phase::Idle => {
                self.progress.tick();
            }
            Phase::Preparing(pending) => match self.capture(pending) {
                Ok(transition) => {
                    apply_positions(
                        &mut self.renderer,
                        transition.current,
                        transition.next,
                        self.progress.current(),
                        transition.direction,
                    );
                    self.phase = Phase::Animating(transition);
                    debug!(from = transition.from, to = transition.to, direction = ?transition.direction, "transition started");
                }
                Err(err) => {
                    warn!(%err, "transition aborted");
                    self.phase = Phase::Idle;
                    self.progress.reset(0.0);
                }
            },
            Phase::Animating(transition) => {
                self.progress.tick();
                apply_positions(
                    &mut self.renderer,
                    transition.current,
                    transition.next,
                    self.progress.current(),
                    transition.direction,
                );
                if self.progress.settled_at(1.0) {
                    self.phase = Phase::Committing {
                        transition,
                        settle_until: now + SETTLE_DELAY,
                    };
                } else if self.progress.settled_at(0.0) {
                    self.abandon();
                }
            }
            Phase::Committing { settle_until, .. } => {
                if now >= settle_until {
                    self.commit();
                }
            }
            Phase::Reversing {
                transition,
                started,
                from_progress,
                adopt,
            } => {
                let elapsed = now.saturating_duration_since(started);
                let t = (elapsed.as_secs_f64() / REVERSE_DURATION.as_secs_f64()).min(1.0);
                let progress = from_progress * (1.0 - ease_out_cubic(t));
                self.progress.reset(progress);
                apply_positions(
                    &mut self.renderer,
                    transition.current,
                    transition.next,
                    progress,
                    transition.direction,
                );
                if t >= 1.0 {
                    self.rest(transition);
                    self.progress.reset(0.0);
                    self.direction = adopt;
                    self.phase = Phase::Idle;
                    debug!(direction = ?adopt, "reversal finished");
                }
            }
        }
    }

    /// Finish a transition that reached the next card: advance the index,
    /// hide the previous card and clear transition state.  Returns `false`
    /// (and does nothing) unless a commit is actually pending.
    pub fn commit(&mut self) -> bool {
        let Phase::Committing { transition, .. } = self.phase else {
            return false;
        };
        self.renderer
            .apply_transform(transition.current, CardTransform::HIDDEN);
        self.renderer
            .apply_transform(transition.next, CardTransform::REST);
        self.current_index = transition.to;
        self.progress.reset(0.0);
        self.phase = Phase::Idle;
        debug!(index = self.current_index, "transition committed");
        true
    }

    /// Drop an in-flight transition that fell back to zero.  Only acts while
    /// animating.
    fn abandon(&mut self) -> bool {
        let Phase::Animating(transition) = self.phase else {
            return false;
        };
        self.rest(transition);
        self.progress.reset(0.0);
        self.phase = Phase::Idle;
        debug!(index = self.current_index, "transition abandoned");
        true
    }

    // ── internals ───────────────────────────────────────────────

    /// Direction of a transition that still takes input.
    fn in_flight(&self) -> Option<Direction> {
        match self.phase {
            Phase::Preparing(p) => Some(p.direction),
            Phase::Animating(t) => Some(t.direction),
            _ => None,
        }
    }

    /// A barely started forward transition off the first card, where small
    /// backward wheel jitter counts toward releasing the stack.
    fn in_escape_window(&self) -> bool {
        self.current_index == 0
            && self.in_flight() == Some(Direction::Forward)
            && self.progress.current() < ESCAPE_PROGRESS
    }

    fn accepts_input(&self) -> bool {
        self.mounted && !self.hidden && self.activation.is_active && !self.is_locked()
    }

    /// Route one directional input.  `from_touch` marks drags of a touch
    /// gesture, which may pull their own transition back.
    fn drive(&mut self, direction: Direction, amount: f64, from_touch: bool) {
        let in_flight = match self.phase {
            Phase::Idle => {
                self.begin(direction, amount);
                if from_touch && self.phase != Phase::Idle {
                    self.gesture_owns_transition = true;
                }
                self.ensure_tick();
                return;
            }
            Phase::Preparing(p) => p.direction,
            Phase::Animating(t) => t.direction,
            Phase::Committing { .. } | Phase::Reversing { .. } => return,
        };

        if direction == in_flight {
            self.progress.nudge(amount);
        } else if from_touch && self.gesture_owns_transition {
            self.progress.nudge(-amount);
        } else {
            self.change_direction(direction);
        }
        self.ensure_tick();
    }

    fn begin(&mut self, direction: Direction, amount: f64) {
        self.direction = direction;
        match direction.step(self.current_index, self.len) {
            Some(to) => {
                self.phase = Phase::Preparing(PendingTransition {
                    direction,
                    from: self.current_index,
                    to,
                });
                self.progress.reset(0.0);
                self.progress.set_target(amount);
            }
            None => {
                if direction == Direction::Forward {
                    self.activation.has_completed_stack = true;
                }
                self.wheel.reset();
                self.set_active(false);
                debug!(index = self.current_index, ?direction, "left the stack at its edge");
            }
        }
    }

    fn change_direction(&mut self, adopt: Direction) {
        match self.phase {
            Phase::Animating(transition) if self.progress.current() > REVERSE_THRESHOLD => {
                let from_progress = self.progress.current();
                self.progress.reset(from_progress);
                self.phase = Phase::Reversing {
                    transition,
                    started: self.clock.now(),
                    from_progress,
                    adopt,
                };
                self.wheel.reset();
                debug!(from_progress, "direction change, reversing");
            }
            _ => self.cheap_reset(adopt),
        }
    }

    /// Go straight back to idle; visuals are restored on the next frame.
    fn cheap_reset(&mut self, adopt: Direction) {
        if let Phase::Animating(transition) = self.phase {
            self.restore = Some(transition);
        }
        if matches!(self.phase, Phase::Preparing(_) | Phase::Animating(_)) {
            self.phase = Phase::Idle;
            self.progress.reset(0.0);
            trace!("in-flight transition dropped");
        }
        self.direction = adopt;
        self.ensure_tick();
    }

    fn capture(
        &self,
        pending: PendingTransition,
    ) -> Result<Transition<R::Handle>, StackError> {
        if self.len == 0 {
            return Err(StackError::EmptySequence);
        }
        let lookup = |index: usize| {
            self.renderer.handle(index).ok_or(StackError::MissingCard {
                index,
                len: self.len,
            })
        };
        Ok(Transition {
            direction: pending.direction,
            from: pending.from,
            to: pending.to,
            current: lookup(pending.from)?,
            next: lookup(pending.to)?,
        })
    }

    /// Current card at rest, the other one hidden.
    fn rest(&mut self, transition: Transition<R::Handle>) {
        self.renderer
            .apply_transform(transition.current, CardTransform::REST);
        self.renderer
            .apply_transform(transition.next, CardTransform::HIDDEN);
    }

    fn layout(&mut self) {
        for index in 0..self.len {
            let Some(handle) = self.renderer.handle(index) else {
                warn!(index, "card has no handle during layout");
                continue;
            };
            let transform = if index == self.current_index {
                CardTransform::REST
            } else {
                CardTransform::HIDDEN
            };
            self.renderer.apply_transform(handle, transform);
        }
    }

    fn placement(&self) -> Option<Placement> {
        let bounds = self.viewport.bounding_box()?;
        Some(Placement::measure(bounds, self.viewport.height()))
    }

    fn evaluate_gate(&mut self, scrolling_up: bool) {
        let Some(placement) = self.placement() else {
            return;
        };
        let decision = gate::on_scroll(
            placement,
            scrolling_up,
            self.activation.has_completed_stack,
        );
        if decision.clear_completed {
            self.activation.has_completed_stack = false;
        }
        if let Some(active) = decision.activate {
            self.set_active(active);
        }
    }

    /// Activation and page scroll-lock always change together.
    fn set_active(&mut self, active: bool) {
        if self.activation.is_active == active {
            return;
        }
        self.activation.is_active = active;
        self.viewport.set_scroll_locked(active);
        if !active {
            self.touch.cancel();
            self.gesture_owns_transition = false;
        }
        debug!(active, completed = self.activation.has_completed_stack, "activation changed");
    }

    fn needs_frame(&self) -> bool {
        self.progress.is_running()
            || self.restore.is_some()
            || self.scroll.is_pending()
            || self.wheel_settle_at.is_some()
            || matches!(
                self.phase,
                Phase::Preparing(_) | Phase::Committing { .. } | Phase::Reversing { .. }
            )
    }

    fn ensure_tick(&mut self) {
        if self.tick.is_none() && self.mounted && !self.hidden && self.needs_frame() {
            self.tick = Some(self.clock.request_tick());
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.clock.cancel_tick(handle);
        }
    }
}

impl<C: Clock, V: Viewport, R: Renderer> Drop for CardStack<C, V, R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
