use leptos::{create_effect, spawn_local, Callable, Callback};

use crate::{host::DesktopHostContext, persistence, reducer::DesktopAction};

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let prefs = host.prefs_store();
        spawn_local(async move {
            let snapshot = persistence::load_boot_snapshot(prefs.as_ref()).await;

            dispatch.call(DesktopAction::HydrateGeometry {
                geometry: snapshot.geometry,
            });
            dispatch.call(DesktopAction::HydrateIconPositions {
                positions: snapshot.icon_positions,
            });
            dispatch.call(DesktopAction::RestoreSession {
                entries: snapshot.open_windows,
            });
        });
    });
}
