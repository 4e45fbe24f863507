//! User configuration: keybindings, input tuning and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/card-stack/config.toml` (default `~/.config/card-stack/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// One wheel notch toward the next card (or page scroll when released).
    ScrollDown,
    /// One wheel notch toward the previous card.
    ScrollUp,
    PageDown,
    PageUp,
    /// Re-read the card file.
    Reload,
    Quit,
}

impl Action {
    /// Ordered list of all actions.
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::Reload,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::Reload => "reload",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "scroll_down" => Some(Action::ScrollDown),
            "scroll_up" => Some(Action::ScrollUp),
            "page_down" => Some(Action::PageDown),
            "page_up" => Some(Action::PageUp),
            "reload" => Some(Action::Reload),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => key_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            other => key_name(other),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"PageDown"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

const DEFAULT_FPS: u32 = 60;
const DEFAULT_WHEEL_LINE_DELTA: f64 = 120.0;
const DEFAULT_TOUCH_ROW_PX: f64 = 24.0;
const DEFAULT_STACK_HEIGHT: u16 = 18;

/// Application configuration: keybindings and input tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Frame rate of the animation loop.
    pub fps: u32,
    /// Wheel delta (pixels) reported for one wheel notch or scroll key.
    pub wheel_line_delta: f64,
    /// Pixels per terminal row when a mouse drag stands in for touch.
    pub touch_row_px: f64,
    /// Preferred height of the card stack in rows.
    pub stack_height: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            fps: DEFAULT_FPS,
            wheel_line_delta: DEFAULT_WHEEL_LINE_DELTA,
            touch_row_px: DEFAULT_TOUCH_ROW_PX,
            stack_height: DEFAULT_STACK_HEIGHT,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::{Char, Down, Esc, Up};
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Action::ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(Action::Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}/wheel: scroll | drag: swipe | {}: reload | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::Reload),
            self.short_binding(Action::Quit),
        )
    }

    /// Duration of one animation frame.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                if path.exists() {
                    tracing::warn!(%err, path = %path.display(), "config unreadable, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk and return where it went.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, self.serialise())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "fps" => {
                    if let Ok(v) = value.parse::<u32>() {
                        config.fps = v.clamp(10, 120);
                    }
                    continue;
                }
                "wheel_line_delta" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.wheel_line_delta = v.clamp(1.0, 1000.0);
                    }
                    continue;
                }
                "touch_row_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.touch_row_px = v.clamp(1.0, 200.0);
                    }
                    continue;
                }
                "stack_height" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.stack_height = v.clamp(6, 200);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# card-stack configuration".to_string(),
            String::new(),
            "# Animation and input".to_string(),
            format!("fps = {}", self.fps),
            format!("wheel_line_delta = {}", self.wheel_line_delta),
            format!("touch_row_px = {}", self.touch_row_px),
            format!("stack_height = {}", self.stack_height),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/card-stack/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("card-stack").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_match_keys() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(key(KeyCode::Char('j'))), Some(Action::ScrollDown));
        assert_eq!(config.match_key(key(KeyCode::Up)), Some(Action::ScrollUp));
        assert_eq!(config.match_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn default_page_keys_map_to_page_actions() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(key(KeyCode::PageDown)), Some(Action::PageDown));
        assert_eq!(config.match_key(key(KeyCode::Char(' '))), Some(Action::PageDown));
        assert_eq!(config.match_key(key(KeyCode::PageUp)), Some(Action::PageUp));
        assert_eq!(config.match_key(key(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn parse_reads_tuning_and_bindings() {
        let config = AppConfig::parse_config(
            "# comment\nfps = 500\nwheel_line_delta = 40\nquit = Ctrl+x, Esc\nbogus = 1\n",
        );
        assert_eq!(config.fps, 120);
        assert_eq!(config.wheel_line_delta, 40.0);
        assert_eq!(
            config.bindings[&Action::Quit],
            vec![
                KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Esc, KeyModifiers::NONE),
            ]
        );
        assert_eq!(config.touch_row_px, DEFAULT_TOUCH_ROW_PX);
    }

    #[test]
    fn serialise_then_parse_keeps_settings() {
        let mut config = AppConfig::default();
        config.fps = 30;
        config.stack_height = 12;
        config
            .bindings
            .insert(Action::Reload, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::SHIFT)]);
        let parsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(parsed.fps, 30);
        assert_eq!(parsed.stack_height, 12);
        assert_eq!(parsed.bindings, config.bindings);
    }

    #[test]
    fn key_parse_rejects_unknown_modifiers() {
        assert!(KeyBind::parse("Hyper+a").is_none());
        assert_eq!(
            KeyBind::parse("Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("Space"), Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE)));
    }

    #[test]
    fn frame_interval_follows_fps() {
        let mut config = AppConfig::default();
        config.fps = 50;
        assert_eq!(config.frame_interval(), std::time::Duration::from_millis(20));
    }
}
