//! Window-manager transition helpers used by the desktop reducer.

use desktop_app_contract::{AppId, AppManifest};

use crate::{
    config::{DesktopConfig, WindowConfig},
    model::{DesktopState, Viewport, WindowId, WindowOptions, WindowRecord, WindowRect},
};

/// Gives `window_id` the next z-index and focus, un-minimizing it.
///
/// A window that is already focused, visible and on top is left untouched. Returns whether
/// anything changed, or `None` when the window does not exist.
pub fn bring_to_front(state: &mut DesktopState, window_id: &WindowId) -> Option<bool> {
    let z_counter = state.z_counter;
    let focused = state.is_focused(window_id);
    let window = state.windows.iter_mut().find(|w| &w.id == window_id)?;

    if focused && !window.minimized && window.z_index == z_counter {
        return Some(false);
    }

    state.z_counter = z_counter.saturating_add(1);
    window.z_index = state.z_counter;
    window.minimized = false;
    state.focused = Some(window_id.clone());
    Some(true)
}

/// Highest-z window that is not minimized.
pub fn top_visible_window(state: &DesktopState) -> Option<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone())
}

/// Geometry for a new window.
///
/// Each field resolves independently: explicit option, then saved geometry, then the manifest
/// default size, then the configured default size or cascade position. The result never drops
/// below the manifest minimum size.
pub fn initial_rect(
    config: &WindowConfig,
    manifest: &AppManifest,
    saved: Option<WindowRect>,
    options: &WindowOptions,
    open_count: usize,
) -> WindowRect {
    let cascade = config.cascade_step * open_count as i32;
    let positive = |v: i32| (v > 0).then_some(v);
    let width = options
        .width
        .or_else(|| saved.and_then(|r| positive(r.w)))
        .or_else(|| positive(manifest.default_width))
        .unwrap_or(config.default_width);
    let height = options
        .height
        .or_else(|| saved.and_then(|r| positive(r.h)))
        .or_else(|| positive(manifest.default_height))
        .unwrap_or(config.default_height);
    let x = options
        .x
        .or(saved.map(|r| r.x))
        .unwrap_or(config.cascade_x + cascade);
    let y = options
        .y
        .or(saved.map(|r| r.y))
        .unwrap_or(config.cascade_y + cascade);

    WindowRect::new(x, y, width, height).clamped_min(manifest.min_width, manifest.min_height)
}

/// Allocates the id for a new window of `app_id`.
///
/// Returns the id and whether it belongs to an extra (transient) instance.
pub fn next_window_id(state: &mut DesktopState, app_id: AppId, allow_multiple: bool) -> (WindowId, bool) {
    let primary = WindowId::for_app(app_id);
    if !allow_multiple || state.window(&primary).is_none() {
        return (primary, false);
    }
    loop {
        let candidate = WindowId(format!("{}-{}", app_id.as_str(), state.next_instance));
        state.next_instance = state.next_instance.saturating_add(1);
        if state.window(&candidate).is_none() {
            return (candidate, true);
        }
    }
}

/// Builds the registry record for a freshly opened window.
pub fn build_window_record(
    id: WindowId,
    manifest: &AppManifest,
    rect: WindowRect,
    title: Option<String>,
    transient: bool,
) -> WindowRecord {
    WindowRecord {
        id,
        app_id: manifest.app_id,
        title: title.unwrap_or_else(|| manifest.title.clone()),
        icon: manifest.icon.clone(),
        rect,
        min_width: manifest.min_width,
        min_height: manifest.min_height,
        z_index: 0,
        resizable: manifest.resizable,
        has_menu: manifest.has_menu,
        menus: manifest.effective_menus(),
        minimized: false,
        maximized: false,
        restore_rect: None,
        opening: true,
        transient,
    }
}

/// Clamps a dragged window so part of it stays reachable.
///
/// `x` stays within `[keep - w, vw - keep]` and `y` within `[0, vh - taskbar - reserve]`.
pub fn clamp_drag(rect: WindowRect, viewport: Viewport, config: &DesktopConfig) -> WindowRect {
    let keep = config.windows.drag_keep_visible;
    let min_x = keep - rect.w;
    let max_x = (viewport.width - keep).max(min_x);
    let max_y = (viewport.height - config.taskbar_height - config.windows.drag_bottom_reserve).max(0);
    WindowRect {
        x: rect.x.clamp(min_x, max_x),
        y: rect.y.clamp(0, max_y),
        ..rect
    }
}

/// Bottom-right handle resize, floored at the window minimum.
pub fn resize_from(start: WindowRect, dx: i32, dy: i32, min_width: i32, min_height: i32) -> WindowRect {
    WindowRect {
        w: (start.w + dx).max(min_width),
        h: (start.h + dy).max(min_height),
        ..start
    }
}

/// Maximizes or restores `window`. Maximizing remembers the current rect; restoring reapplies it.
pub fn toggle_maximize(window: &mut WindowRecord, work_area: WindowRect) {
    if window.maximized {
        if let Some(restore_rect) = window.restore_rect.take() {
            window.rect = restore_rect;
        }
        window.maximized = false;
    } else {
        window.restore_rect = Some(window.rect);
        window.rect = work_area;
        window.maximized = true;
    }
}

/// Geometry that should be remembered for a window: the pre-maximize rect while maximized.
pub fn persisted_rect(window: &WindowRecord) -> WindowRect {
    if window.maximized {
        window.restore_rect.unwrap_or(window.rect)
    } else {
        window.rect
    }
}
