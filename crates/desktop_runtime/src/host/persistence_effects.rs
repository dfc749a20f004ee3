use leptos::{logging, spawn_local, SignalWithUntracked};

use crate::{host::DesktopHostContext, persistence, runtime_context::DesktopRuntimeContext};

pub(super) fn persist_open_windows(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let entries = runtime.state.with_untracked(|state| state.open_window_entries());
    let prefs = host.prefs_store();
    spawn_local(async move {
        if let Err(err) = persistence::save_open_windows(prefs.as_ref(), &entries).await {
            logging::warn!("persist open windows failed: {err}");
        }
    });
}

pub(super) fn persist_geometry(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let geometry = runtime.state.with_untracked(|state| state.geometry.clone());
    let prefs = host.prefs_store();
    spawn_local(async move {
        if let Err(err) = persistence::save_window_geometry(prefs.as_ref(), &geometry).await {
            logging::warn!("persist window geometry failed: {err}");
        }
    });
}

pub(super) fn persist_icon_positions(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let positions = runtime
        .state
        .with_untracked(|state| state.grid.positions().clone());
    let prefs = host.prefs_store();
    spawn_local(async move {
        if let Err(err) = persistence::save_icon_positions(prefs.as_ref(), &positions).await {
            logging::warn!("persist icon positions failed: {err}");
        }
    });
}
