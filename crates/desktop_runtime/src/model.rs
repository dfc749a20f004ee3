use std::{collections::BTreeMap, rc::Rc};

use desktop_app_contract::{AppId, AppManifest, MenuSpec};
use serde::{Deserialize, Serialize};

use crate::{
    apps::AppCatalog,
    config::DesktopConfig,
    desktop_icons::{icon_records, sync_icon_cells},
    grid::DesktopGrid,
};

/// Registry key of an open window: the app id, or `"{app}-{n}"` for extra instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn for_app(app_id: AppId) -> Self {
        Self(app_id.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AppId> for WindowId {
    fn from(app_id: AppId) -> Self {
        Self::for_app(app_id)
    }
}

/// Desktop icon key, `"icon-{app}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

impl IconId {
    pub fn for_app(app_id: AppId) -> Self {
        Self(format!("icon-{}", app_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "width")]
    pub w: i32,
    #[serde(rename = "height")]
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

/// Browser viewport size in css px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Area above the taskbar that maximized windows fill.
    pub fn work_area(self, taskbar_height: i32) -> WindowRect {
        WindowRect::new(0, 0, self.width, (self.height - taskbar_height).max(0))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Effective display state; minimized dominates maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDisplayState {
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub icon: String,
    pub rect: WindowRect,
    pub min_width: i32,
    pub min_height: i32,
    pub z_index: u32,
    pub resizable: bool,
    pub has_menu: bool,
    pub menus: Vec<MenuSpec>,
    pub minimized: bool,
    pub maximized: bool,
    /// Geometry to reapply when leaving the maximized state.
    pub restore_rect: Option<WindowRect>,
    /// Cleared by the opening timer.
    pub opening: bool,
    /// Extra instance; never written to the saved session.
    pub transient: bool,
}

impl WindowRecord {
    pub fn display_state(&self) -> WindowDisplayState {
        if self.minimized {
            WindowDisplayState::Minimized
        } else if self.maximized {
            WindowDisplayState::Maximized
        } else {
            WindowDisplayState::Normal
        }
    }

    /// Whether the window has a taskbar tray entry.
    pub fn in_tray(&self) -> bool {
        self.minimized
    }

    pub fn can_drag(&self) -> bool {
        !self.maximized && !self.minimized
    }

    pub fn can_resize(&self) -> bool {
        self.resizable && !self.maximized && !self.minimized
    }
}

/// Explicit geometry and multiplicity overrides for [`crate::reducer::DesktopAction::CreateWindow`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOptions {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub title: Option<String>,
    /// Open another instance instead of focusing an existing one.
    pub allow_multiple: bool,
}

impl WindowOptions {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIconRecord {
    pub id: IconId,
    pub app_id: AppId,
    pub title: String,
    pub icon: String,
    /// Last cell reported by the grid; `None` while the grid is full.
    pub cell: Option<GridCell>,
}

/// Persisted entry of the open-window list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowEntry {
    pub id: WindowId,
    pub minimized: bool,
    pub maximized: bool,
    #[serde(rename = "zIndex", alias = "z_index")]
    pub z_index: u32,
}

pub type WindowGeometryMap = BTreeMap<WindowId, WindowRect>;
pub type IconPositionMap = BTreeMap<IconId, GridCell>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FatalErrorState {
    pub visible: bool,
    /// Dismissal is accepted only once armed.
    pub armed: bool,
    pub close_attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub config: Rc<DesktopConfig>,
    pub catalog: Rc<AppCatalog>,
    pub viewport: Viewport,
    /// Open windows in creation order; stacking comes from `z_index`.
    pub windows: Vec<WindowRecord>,
    /// Windows playing their close animation.
    pub closing: Vec<WindowRecord>,
    pub focused: Option<WindowId>,
    /// Last z-index handed out.
    pub z_counter: u32,
    pub next_instance: u64,
    /// Last known geometry per window id, including closed windows.
    pub geometry: WindowGeometryMap,
    pub icons: Vec<DesktopIconRecord>,
    pub grid: DesktopGrid,
    pub selected_icon: Option<IconId>,
    pub about: Option<AboutInfo>,
    pub fatal_error: FatalErrorState,
    pub sound_enabled: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(
            Rc::new(DesktopConfig::default()),
            Rc::new(AppCatalog::builtin()),
            Viewport::default(),
        )
    }
}

impl DesktopState {
    /// Fresh desktop with the catalog icons laid out in registration order.
    pub fn new(config: Rc<DesktopConfig>, catalog: Rc<AppCatalog>, viewport: Viewport) -> Self {
        let mut grid = DesktopGrid::new(config.grid, config.taskbar_height, viewport);
        let icons = icon_records(&catalog, &config.about.default_icon);
        let ids: Vec<IconId> = icons.iter().map(|icon| icon.id.clone()).collect();
        grid.register_icons(&ids, &IconPositionMap::new());
        let mut state = Self {
            z_counter: config.windows.z_base,
            sound_enabled: config.sound.enabled,
            config,
            catalog,
            viewport,
            windows: Vec::new(),
            closing: Vec::new(),
            focused: None,
            next_instance: 1,
            geometry: WindowGeometryMap::new(),
            icons,
            grid,
            selected_icon: None,
            about: None,
            fatal_error: FatalErrorState::default(),
        };
        sync_icon_cells(&mut state);
        state
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn icon(&self, icon_id: &IconId) -> Option<&DesktopIconRecord> {
        self.icons.iter().find(|icon| &icon.id == icon_id)
    }

    pub fn manifest(&self, app_id: AppId) -> Option<&AppManifest> {
        self.catalog.manifest(app_id)
    }

    pub fn focused_window_id(&self) -> Option<&WindowId> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, window_id: &WindowId) -> bool {
        self.focused.as_ref() == Some(window_id)
    }

    /// Windows in the minimized tray, in creation order.
    pub fn tray_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(|w| w.in_tray())
    }

    /// Open-window list for the saved session; extra instances are skipped.
    pub fn open_window_entries(&self) -> Vec<OpenWindowEntry> {
        self.windows
            .iter()
            .filter(|w| !w.transient)
            .map(|w| OpenWindowEntry {
                id: w.id.clone(),
                minimized: w.minimized,
                maximized: w.maximized,
                z_index: w.z_index,
            })
            .collect()
    }
}

/// Open dropdown in a window menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMenu {
    pub window_id: WindowId,
    pub menu: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

/// Pointer-down on an icon that may turn into a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDragSession {
    pub icon_id: IconId,
    pub pointer_start: PointerPosition,
    pub pointer: PointerPosition,
    /// Offset from the icon's top-left to the grab point.
    pub grab_offset: PointerPosition,
    /// Set once movement passed the drag threshold.
    pub active: bool,
    pub preview: Option<GridCell>,
}

impl IconDragSession {
    /// Top-left of the floating clone.
    pub fn ghost_position(&self) -> PointerPosition {
        PointerPosition::new(
            self.pointer.x - self.grab_offset.x,
            self.pointer.y - self.grab_offset.y,
        )
    }
}

/// Click waiting to learn whether a second click follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIconClick {
    pub icon_id: IconId,
    pub token: u64,
    pub at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextMenuTarget {
    Desktop,
    Icon(IconId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuState {
    pub target: ContextMenuTarget,
    pub position: PointerPosition,
}

/// Right-click menu rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuCommand {
    Open,
    Properties,
    Refresh,
    AutoArrange,
    SortByName,
    Settings,
    SystemInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
    pub icon_drag: Option<IconDragSession>,
    pub pending_click: Option<PendingIconClick>,
    pub next_click_token: u64,
    /// Swallows the click event that follows a committed icon drag.
    pub suppress_icon_click: bool,
    pub open_menu: Option<OpenMenu>,
    pub context_menu: Option<ContextMenuState>,
    pub start_menu_open: bool,
}
