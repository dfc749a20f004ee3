//! Shell tuning loaded from the `[shell]` table of `desktop.toml`.
//!
//! Every field has a default, so a missing table or key falls back to the stock retro layout.

use desktop_app_contract::AppId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Desktop icon grid metrics in px.
pub struct GridConfig {
    pub cell_width: i32,
    pub cell_height: i32,
    pub padding: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 90,
            cell_height: 90,
            padding: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Window placement defaults and drag limits.
pub struct WindowConfig {
    pub default_width: i32,
    pub default_height: i32,
    pub min_width: i32,
    pub min_height: i32,
    /// Cascade origin for windows without any other geometry source.
    pub cascade_x: i32,
    pub cascade_y: i32,
    /// Cascade offset per open window.
    pub cascade_step: i32,
    /// First z-index handed out; the counter only grows from here.
    pub z_base: u32,
    /// Horizontal px of a dragged window that must stay on screen.
    pub drag_keep_visible: i32,
    /// Title-bar px kept above the taskbar when dragging down.
    pub drag_bottom_reserve: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400,
            default_height: 300,
            min_width: 200,
            min_height: 150,
            cascade_x: 100,
            cascade_y: 80,
            cascade_step: 30,
            z_base: 100,
            drag_keep_visible: 100,
            drag_bottom_reserve: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Pointer gesture thresholds.
pub struct InputConfig {
    pub double_click_ms: u32,
    pub drag_threshold_px: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 250,
            drag_threshold_px: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Animation and debounce delays in ms.
pub struct TimingConfig {
    pub opening_ms: u32,
    pub closing_ms: u32,
    pub fatal_arm_ms: u32,
    pub grid_resize_debounce_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            opening_ms: 200,
            closing_ms: 150,
            fatal_arm_ms: 500,
            grid_resize_debounce_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Repeated-close easter egg.
pub struct FatalCloseConfig {
    pub app: AppId,
    pub threshold: u32,
}

impl Default for FatalCloseConfig {
    fn default() -> Self {
        Self {
            app: AppId::Portfolio,
            threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// App launched on boot when no session was restored.
pub struct LaunchConfig {
    pub app: AppId,
    pub x: i32,
    pub y: i32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            app: AppId::Portfolio,
            x: 50,
            y: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Text of the generic about box.
pub struct AboutConfig {
    pub version_line: String,
    pub copyright: String,
    pub tagline: String,
    pub default_icon: String,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            version_line: "Portfolio OS v1.0".to_string(),
            copyright: "© 2024 All Rights Reserved".to_string(),
            tagline: "Windows 3.1 Style Portfolio".to_string(),
            default_icon: "📁".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Initial state of the sound toggle.
    pub enabled: bool,
    /// Output gain in `[0, 1]`.
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: 0.006,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Global key binding that opens an app.
pub struct ShortcutConfig {
    /// `KeyboardEvent.key` value; single characters match case-insensitively.
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    pub app: AppId,
}

impl ShortcutConfig {
    fn new(key: &str, ctrl: bool, app: AppId) -> Self {
        Self {
            key: key.to_string(),
            ctrl,
            app,
        }
    }

    fn matches(&self, key: &str, ctrl: bool) -> bool {
        self.ctrl == ctrl && self.key.eq_ignore_ascii_case(key)
    }
}

fn default_shortcuts() -> Vec<ShortcutConfig> {
    vec![
        ShortcutConfig::new("o", true, AppId::Portfolio),
        ShortcutConfig::new("n", true, AppId::Notepad),
        ShortcutConfig::new("t", true, AppId::Terminal),
        ShortcutConfig::new("F1", false, AppId::Readme),
    ]
}

fn default_start_menu() -> Vec<AppId> {
    vec![
        AppId::Portfolio,
        AppId::Readme,
        AppId::Contact,
        AppId::Notepad,
        AppId::Terminal,
        AppId::Explorer,
        AppId::Browser,
        AppId::Paint,
        AppId::Calc,
        AppId::Tunes,
        AppId::Mines,
        AppId::Snake,
        AppId::Tetris,
        AppId::Control,
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Complete shell configuration.
pub struct DesktopConfig {
    pub taskbar_height: i32,
    /// App opened by the generic `Help Topics` menu command.
    pub help_app: AppId,
    pub grid: GridConfig,
    pub windows: WindowConfig,
    pub input: InputConfig,
    pub timing: TimingConfig,
    pub fatal_close: FatalCloseConfig,
    pub launch: LaunchConfig,
    pub about: AboutConfig,
    pub sound: SoundConfig,
    /// Start menu entries, top to bottom.
    pub start_menu: Vec<AppId>,
    pub shortcuts: Vec<ShortcutConfig>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            taskbar_height: 40,
            help_app: AppId::Readme,
            grid: GridConfig::default(),
            windows: WindowConfig::default(),
            input: InputConfig::default(),
            timing: TimingConfig::default(),
            fatal_close: FatalCloseConfig::default(),
            launch: LaunchConfig::default(),
            about: AboutConfig::default(),
            sound: SoundConfig::default(),
            start_menu: default_start_menu(),
            shortcuts: default_shortcuts(),
        }
    }
}

impl DesktopConfig {
    /// Parses a shell config document.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or names an unknown app.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid shell config: {e}"))
    }

    /// App bound to a key press, if any. Ctrl must match the binding exactly.
    pub fn shortcut_app(&self, key: &str, ctrl: bool) -> Option<AppId> {
        self.shortcuts
            .iter()
            .find(|shortcut| shortcut.matches(key, ctrl))
            .map(|shortcut| shortcut.app)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(
            DesktopConfig::from_json("{}").expect("parse"),
            DesktopConfig::default()
        );
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = DesktopConfig::from_json(
            r#"{"grid":{"cell_width":120},"fatal_close":{"app":"notepad"}}"#,
        )
        .expect("parse");
        assert_eq!(config.grid.cell_width, 120);
        assert_eq!(config.grid.cell_height, 90);
        assert_eq!(config.fatal_close.app, AppId::Notepad);
        assert_eq!(config.fatal_close.threshold, 3);
    }

    #[test]
    fn shortcuts_require_the_exact_modifier() {
        let config = DesktopConfig::default();
        assert_eq!(config.shortcut_app("o", true), Some(AppId::Portfolio));
        assert_eq!(config.shortcut_app("N", true), Some(AppId::Notepad));
        assert_eq!(config.shortcut_app("F1", false), Some(AppId::Readme));
        assert_eq!(config.shortcut_app("o", false), None);
        assert_eq!(config.shortcut_app("F1", true), None);
        assert_eq!(config.shortcut_app("x", true), None);
    }

    #[test]
    fn shortcut_tables_replace_the_defaults() {
        let config = DesktopConfig::from_json(
            r#"{"shortcuts":[{"key":"p","ctrl":true,"app":"paint"}],"start_menu":["calc"]}"#,
        )
        .expect("parse");
        assert_eq!(config.shortcut_app("p", true), Some(AppId::Paint));
        assert_eq!(config.shortcut_app("o", true), None);
        assert_eq!(config.start_menu, vec![AppId::Calc]);
    }

    #[test]
    fn unknown_app_is_rejected() {
        assert!(DesktopConfig::from_json(r#"{"help_app":"winamp"}"#).is_err());
    }
}
