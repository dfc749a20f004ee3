//! Runtime-effect dispatch for the desktop host boundary.

use crate::{
    host::{app_bus, host_ui, persistence_effects, DesktopHostContext},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn run_runtime_effect(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    effect: RuntimeEffect,
) {
    match effect {
        RuntimeEffect::PersistOpenWindows => {
            persistence_effects::persist_open_windows(host, runtime)
        }
        RuntimeEffect::PersistWindowGeometry => persistence_effects::persist_geometry(host, runtime),
        RuntimeEffect::PersistIconPositions => {
            persistence_effects::persist_icon_positions(host, runtime)
        }
        RuntimeEffect::PlaySound(cue) => {
            host.sound().play(cue, true);
        }
        RuntimeEffect::InitApp { window_id, app_id } => {
            app_bus::init_app(runtime, window_id, app_id)
        }
        RuntimeEffect::CloseApp { window_id, app_id } => app_bus::close_app(window_id, app_id),
        RuntimeEffect::DeliverMenuCommand { app_id, event } => {
            app_bus::deliver_menu_command(runtime, app_id, event);
        }
        RuntimeEffect::Schedule { delay_ms, action } => {
            host_ui::schedule(runtime, delay_ms, *action)
        }
        RuntimeEffect::ShowInfoDialog { title, rows } => {
            host_ui::show_info_dialog(runtime, title, rows)
        }
        RuntimeEffect::ReloadPage => host_ui::reload_page(host),
    }
}
