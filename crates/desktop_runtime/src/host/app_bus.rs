use desktop_app_contract::{AppId, AppMenuEvent};
use leptos::logging;

use crate::{
    app_runtime::{deliver_menu_event, ensure_window_session},
    apps,
    model::WindowId,
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn init_app(runtime: DesktopRuntimeContext, window_id: WindowId, app_id: AppId) {
    ensure_window_session(runtime.app_runtime, Some(runtime.owner), &window_id);
    apps::app_module(app_id).init(window_id.as_str());
}

pub(super) fn close_app(window_id: WindowId, app_id: AppId) {
    apps::app_module(app_id).close(window_id.as_str());
}

/// Lets the app's menu hook answer with window commands, then queues the event for its view.
pub(super) fn deliver_menu_command(
    runtime: DesktopRuntimeContext,
    app_id: AppId,
    event: AppMenuEvent,
) {
    let window_id = WindowId(event.window_id.clone());
    match apps::app_module(app_id).handle_menu(&event) {
        Ok(commands) => {
            for command in commands {
                runtime.dispatch_action(DesktopAction::ApplyAppCommand {
                    window_id: window_id.clone(),
                    command,
                });
            }
        }
        Err(err) => logging::warn!("`{app_id}` menu command {} failed: {err}", event.command),
    }
    deliver_menu_event(runtime.app_runtime, Some(runtime.owner), &window_id, event);
}
