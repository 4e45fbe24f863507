//! Input handling: maps key/mouse events onto the page and the card stack.
//!
//! While the stack is captured, wheel notches and scroll keys go to the
//! stack as wheel input and the page itself cannot move.  While released,
//! they scroll the page and the stack is told about it so its activation
//! gate can re-evaluate.  Left-button drags stand in for touch.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;

use super::state::AppState;

/// Page rows moved by one wheel notch while the stack is released.
const PAGE_ROWS_PER_NOTCH: i32 = 3;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollDown => scroll_notch(state, 1),
        Action::ScrollUp => scroll_notch(state, -1),
        Action::PageDown => {
            let rows = page_jump(state);
            scroll_page(state, rows);
        }
        Action::PageUp => {
            let rows = page_jump(state);
            scroll_page(state, -rows);
        }
        Action::Reload => state.reload_deck(),
    }
}

/// Process a mouse event.  `row` coordinates are converted to pixels with
/// the configured row height so the touch thresholds keep their meaning.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let y = f64::from(mouse.row) * state.config.touch_row_px;
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_notch(state, 1),
        MouseEventKind::ScrollUp => scroll_notch(state, -1),
        MouseEventKind::Down(MouseButton::Left) => {
            state.dragging = true;
            state.stack.on_touch_start(y);
        }
        MouseEventKind::Drag(MouseButton::Left) if state.dragging => {
            state.stack.on_touch_move(y);
        }
        MouseEventKind::Up(MouseButton::Left) if state.dragging => {
            state.dragging = false;
            state.stack.on_touch_end();
        }
        _ => {}
    }
}

/// Terminal resized to `rows` total rows (status bar included).
pub fn handle_resize(state: &mut AppState, rows: u16) {
    state
        .stack
        .viewport_mut()
        .resize(rows.saturating_sub(1));
    state.stack.on_scroll();
}

/// Focus changes stand in for page visibility.
pub fn handle_focus(state: &mut AppState, focused: bool) {
    if !focused {
        state.dragging = false;
    }
    state.stack.on_visibility_change(!focused);
}

/// Deliver the frame tick if the stack asked for one.
pub fn handle_frame(state: &mut AppState) {
    if let Some(handle) = state.stack.clock_mut().take_pending() {
        state.stack.on_frame(handle);
    }
}

fn scroll_notch(state: &mut AppState, direction: i32) {
    if state.stack.is_active() {
        let delta = f64::from(direction) * state.config.wheel_line_delta;
        state.stack.on_wheel(delta);
    } else {
        scroll_page(state, direction * PAGE_ROWS_PER_NOTCH);
    }
}

fn scroll_page(state: &mut AppState, rows: i32) {
    if state.stack.viewport_mut().scroll_by(rows) {
        state.stack.on_scroll();
    }
}

fn page_jump(state: &AppState) -> i32 {
    i32::from(state.stack.viewport().viewport_rows().saturating_sub(2)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cards::demo_deck;
    use crate::config::AppConfig;
    use crate::core::stack::PhaseKind;
    use std::time::Duration;

    const ROWS: u16 = 30;

    fn state() -> AppState {
        let mut state = AppState::new(demo_deck(), None, AppConfig::default(), ROWS);
        // Let the mount-time placement check run.
        handle_frame(&mut state);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Scroll the page so the stack is centred and let the debounce fire.
    fn capture(state: &mut AppState) {
        let page = state.stack.viewport();
        let center = i32::from(page.stack_top()) + i32::from(page.stack_rows()) / 2;
        let rows = center - i32::from(ROWS) / 2 - i32::from(page.scroll_top());
        scroll_page(state, rows);
        state.stack.clock_mut().advance(Duration::from_millis(60));
        handle_frame(state);
        assert!(state.stack.is_active());
    }

    #[test]
    fn released_stack_lets_the_page_scroll() {
        let mut state = state();
        assert!(!state.stack.is_active());
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.stack.viewport().scroll_top(), PAGE_ROWS_PER_NOTCH as u16);
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollUp, 0));
        assert_eq!(state.stack.viewport().scroll_top(), 0);
    }

    #[test]
    fn captured_stack_takes_the_wheel() {
        let mut state = state();
        capture(&mut state);
        assert!(state.stack.viewport().is_scroll_locked());

        let top = state.stack.viewport().scroll_top();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 0));
        assert_eq!(state.stack.viewport().scroll_top(), top);
        assert_eq!(state.stack.phase_kind(), PhaseKind::Preparing);
        assert!(state.stack.target() > 0.0);

        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.stack.viewport().scroll_top(), top);
    }

    #[test]
    fn drag_is_ignored_while_released() {
        let mut state = state();
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 20));
        handle_mouse(&mut state, mouse(MouseEventKind::Drag(MouseButton::Left), 5));
        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 5));
        assert!(!state.dragging);
        assert_eq!(state.stack.phase_kind(), PhaseKind::Idle);
    }

    #[test]
    fn reload_without_file_reports_it() {
        let mut state = state();
        handle_key(&mut state, key(KeyCode::Char('r')));
        assert!(state.status_message.is_some());
        assert_eq!(state.stack.len(), 5);
    }

    #[test]
    fn ctrl_c_and_quit_key_stop_the_loop() {
        let mut state = state();
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);

        let mut state = self::state();
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }

    #[test]
    fn focus_loss_pauses_frames() {
        let mut state = state();
        capture(&mut state);
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 0));
        assert!(state.stack.clock().has_pending());
        handle_focus(&mut state, false);
        assert!(!state.stack.clock().has_pending());
        handle_focus(&mut state, true);
        assert!(state.stack.clock().has_pending());
    }

    #[test]
    fn resize_keeps_stack_inside_viewport() {
        let mut state = state();
        handle_resize(&mut state, 12);
        assert_eq!(state.stack.viewport().viewport_rows(), 11);
        assert!(state.stack.viewport().stack_rows() <= 9);
    }
}
