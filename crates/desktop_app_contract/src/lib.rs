//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! Apps are addressed by the closed [`AppId`] set, describe their window chrome through an
//! [`AppManifest`], and are mounted through an [`AppModule`] descriptor. Menu activations reach
//! apps as [`AppMenuEvent`] values carrying the closed [`MenuCommand`] union; apps talk back to
//! the window manager through [`WindowService`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod menu;

use std::str::FromStr;

use leptos::{Callable, Callback, RwSignal, View};
use serde::{Deserialize, Serialize};

pub use menu::{
    default_menus, toggle_menu_checked, update_menu_checked, MenuCommand, MenuEntry, MenuItem,
    MenuSpec,
};

/// Identifier of a bundled application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum AppId {
    Portfolio,
    Readme,
    Contact,
    Notepad,
    Terminal,
    Explorer,
    Browser,
    SimpleMode,
    Paint,
    Calc,
    Tunes,
    Mines,
    Snake,
    Tetris,
    SysInfo,
    TaskMgr,
    Control,
}

impl AppId {
    /// Every bundled application, in desktop order.
    pub const ALL: [AppId; 17] = [
        Self::Portfolio,
        Self::Readme,
        Self::Contact,
        Self::Notepad,
        Self::Terminal,
        Self::Explorer,
        Self::Browser,
        Self::SimpleMode,
        Self::Paint,
        Self::Calc,
        Self::Tunes,
        Self::Mines,
        Self::Snake,
        Self::Tetris,
        Self::SysInfo,
        Self::TaskMgr,
        Self::Control,
    ];

    /// Returns the stable lowercase id used in storage keys and window ids.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Readme => "readme",
            Self::Contact => "contact",
            Self::Notepad => "notepad",
            Self::Terminal => "terminal",
            Self::Explorer => "explorer",
            Self::Browser => "browser",
            Self::SimpleMode => "simplemode",
            Self::Paint => "paint",
            Self::Calc => "calc",
            Self::Tunes => "tunes",
            Self::Mines => "mines",
            Self::Snake => "snake",
            Self::Tetris => "tetris",
            Self::SysInfo => "sysinfo",
            Self::TaskMgr => "taskmgr",
            Self::Control => "control",
        }
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == raw)
            .ok_or_else(|| format!("unknown application id `{raw}`"))
    }
}

fn default_min_width() -> i32 {
    200
}

fn default_min_height() -> i32 {
    150
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Static window metadata for an application.
pub struct AppManifest {
    /// Application id.
    pub app_id: AppId,
    /// Initial window title.
    pub title: String,
    /// Glyph shown in the title bar, taskbar and about box.
    pub icon: String,
    /// Default window width in px.
    pub default_width: i32,
    /// Default window height in px.
    pub default_height: i32,
    /// Resize floor width.
    #[serde(default = "default_min_width")]
    pub min_width: i32,
    /// Resize floor height.
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    /// Whether the window exposes a resize handle.
    #[serde(default = "default_true")]
    pub resizable: bool,
    /// Whether the window renders a menu bar.
    #[serde(default = "default_true")]
    pub has_menu: bool,
    /// Declared menus; [`default_menus`] is used when empty and `has_menu` is set.
    #[serde(default)]
    pub menus: Vec<MenuSpec>,
}

impl AppManifest {
    /// Returns the menu bar a new window of this app starts with.
    pub fn effective_menus(&self) -> Vec<MenuSpec> {
        if !self.has_menu {
            Vec::new()
        } else if self.menus.is_empty() {
            default_menus()
        } else {
            self.menus.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Menu activation delivered to the app hosted in a window.
pub struct AppMenuEvent {
    /// Window the menu belongs to.
    pub window_id: String,
    /// Top-level menu name the item was in.
    pub menu: String,
    /// Activated command.
    pub command: MenuCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Requests an app sends to the window manager for its own window.
pub enum AppCommand {
    /// Replace the window title.
    SetWindowTitle {
        /// New title text.
        title: String,
    },
    /// Update menu check marks (see [`update_menu_checked`]).
    SetMenuChecked {
        /// Menu name.
        menu: String,
        /// Commands to check or toggle.
        commands: Vec<MenuCommand>,
        /// Radio-style update when `true`, toggle otherwise.
        exclusive: bool,
    },
    /// Open (or focus) another application.
    OpenApp {
        /// Target app.
        app_id: AppId,
    },
    /// Close the current window.
    CloseWindow,
}

#[derive(Clone, Copy)]
/// Window-scoped service handed to a mounted app.
pub struct WindowService {
    sender: Callback<AppCommand>,
}

impl WindowService {
    /// Creates a service bound to the runtime command callback.
    pub fn new(sender: Callback<AppCommand>) -> Self {
        Self { sender }
    }

    /// Requests a title change for the current window.
    pub fn set_title(&self, title: impl Into<String>) {
        self.sender.call(AppCommand::SetWindowTitle {
            title: title.into(),
        });
    }

    /// Radio-style check mark update within a menu group.
    pub fn set_menu_checked(&self, menu: impl Into<String>, commands: Vec<MenuCommand>) {
        self.sender.call(AppCommand::SetMenuChecked {
            menu: menu.into(),
            commands,
            exclusive: true,
        });
    }

    /// Flips a single check mark.
    pub fn toggle_menu_checked(&self, menu: impl Into<String>, command: MenuCommand) {
        self.sender.call(AppCommand::SetMenuChecked {
            menu: menu.into(),
            commands: vec![command],
            exclusive: false,
        });
    }

    /// Opens another application.
    pub fn open_app(&self, app_id: AppId) {
        self.sender.call(AppCommand::OpenApp { app_id });
    }

    /// Requests the current window to close.
    pub fn close(&self) {
        self.sender.call(AppCommand::CloseWindow);
    }

    /// Forwards a prebuilt command.
    pub fn send(&self, command: AppCommand) {
        self.sender.call(command);
    }
}

#[derive(Clone)]
/// App mount context injected by the desktop runtime per window instance.
pub struct AppMountContext {
    /// Hosted application.
    pub app_id: AppId,
    /// Window id (the app id, or a generated id for extra instances).
    pub window_id: String,
    /// Menu events not yet consumed by the app view.
    pub inbox: RwSignal<Vec<AppMenuEvent>>,
    /// Window integration service.
    pub window: WindowService,
}

/// Static app mount function used by the runtime registry.
pub type AppMountFn = fn(AppMountContext) -> View;
/// Hook invoked with the window id after the window is registered.
pub type AppLifecycleFn = fn(&str);
/// Menu hook; returned commands are applied to the originating window.
pub type AppMenuFn = fn(&AppMenuEvent) -> Result<Vec<AppCommand>, String>;

#[derive(Debug, Clone, Copy)]
/// Mounted app module descriptor used by the runtime app registry.
pub struct AppModule {
    mount_fn: AppMountFn,
    init_fn: Option<AppLifecycleFn>,
    close_fn: Option<AppLifecycleFn>,
    menu_fn: Option<AppMenuFn>,
}

impl AppModule {
    /// Creates a module from a mount function with no lifecycle hooks.
    pub const fn new(mount_fn: AppMountFn) -> Self {
        Self {
            mount_fn,
            init_fn: None,
            close_fn: None,
            menu_fn: None,
        }
    }

    /// Adds an init hook.
    pub const fn with_init(mut self, init_fn: AppLifecycleFn) -> Self {
        self.init_fn = Some(init_fn);
        self
    }

    /// Adds a close hook.
    pub const fn with_close(mut self, close_fn: AppLifecycleFn) -> Self {
        self.close_fn = Some(close_fn);
        self
    }

    /// Adds a menu-command handler.
    pub const fn with_menu_handler(mut self, menu_fn: AppMenuFn) -> Self {
        self.menu_fn = Some(menu_fn);
        self
    }

    /// Mounts the app view with a runtime-provided context.
    pub fn mount(self, context: AppMountContext) -> View {
        (self.mount_fn)(context)
    }

    /// Runs the init hook, if any.
    pub fn init(self, window_id: &str) {
        if let Some(init_fn) = self.init_fn {
            init_fn(window_id);
        }
    }

    /// Runs the close hook, if any.
    pub fn close(self, window_id: &str) {
        if let Some(close_fn) = self.close_fn {
            close_fn(window_id);
        }
    }

    /// Runs the menu handler. Modules without one accept every command and request nothing.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error message.
    pub fn handle_menu(self, event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
        match self.menu_fn {
            Some(menu_fn) => menu_fn(event),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn app_ids_round_trip_through_their_string_form() {
        for app in AppId::ALL {
            assert_eq!(app.as_str().parse::<AppId>(), Ok(app));
            assert_eq!(
                serde_json::to_value(app).expect("serialize app id"),
                serde_json::json!(app.as_str())
            );
        }
        assert!("minesweeper".parse::<AppId>().is_err());
    }

    #[test]
    fn manifest_defaults_fill_minimums_and_flags() {
        let manifest: AppManifest = serde_json::from_str(
            r#"{"app_id":"readme","title":"README.TXT","icon":"📄","default_width":500,"default_height":520}"#,
        )
        .expect("parse manifest");
        assert_eq!(manifest.min_width, 200);
        assert_eq!(manifest.min_height, 150);
        assert!(manifest.resizable);
        assert!(manifest.has_menu);
        assert_eq!(manifest.effective_menus(), default_menus());
    }

    #[test]
    fn menu_less_manifest_has_no_effective_menus() {
        let manifest = AppManifest {
            app_id: AppId::Calc,
            title: "Calculator".to_string(),
            icon: "🧮".to_string(),
            default_width: 260,
            default_height: 320,
            min_width: 200,
            min_height: 150,
            resizable: false,
            has_menu: false,
            menus: Vec::new(),
        };
        assert!(manifest.effective_menus().is_empty());
    }

    #[test]
    fn module_without_menu_handler_accepts_commands() {
        fn mount(_: AppMountContext) -> View {
            leptos::IntoView::into_view(())
        }
        let module = AppModule::new(mount);
        let event = AppMenuEvent {
            window_id: "paint".to_string(),
            menu: "Image".to_string(),
            command: MenuCommand::FlipH,
        };
        assert_eq!(module.handle_menu(&event), Ok(Vec::new()));
    }
}
