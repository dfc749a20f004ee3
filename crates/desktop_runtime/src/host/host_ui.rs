use std::time::Duration;

use leptos::{logging, set_timeout, spawn_local, Callback};
#[cfg(target_arch = "wasm32")]
use leptos::{ev, on_cleanup, set_timeout_with_handle, store_value, window_event_listener, Callable};

use crate::{
    dialog::InfoRow,
    host::DesktopHostContext,
    model::Viewport,
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn schedule(runtime: DesktopRuntimeContext, delay_ms: u32, action: DesktopAction) {
    set_timeout(
        move || runtime.dispatch_action(action),
        Duration::from_millis(u64::from(delay_ms)),
    );
}

pub(super) fn show_info_dialog(runtime: DesktopRuntimeContext, title: String, rows: Vec<InfoRow>) {
    spawn_local(runtime.dialogs.info(title, rows));
}

pub(super) fn reload_page(host: DesktopHostContext) {
    if let Err(err) = host.page_service().reload() {
        logging::warn!("page reload failed: {err}");
    }
}

pub(super) fn desktop_viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback| {
                value
                    .ok()
                    .and_then(|value| value.as_f64())
                    .map(|value| value as i32)
                    .unwrap_or(fallback)
            };
            let fallback = Viewport::default();
            return Viewport::new(
                read(window.inner_width(), fallback.width),
                read(window.inner_height(), fallback.height),
            );
        }
    }

    Viewport::default()
}

pub(super) fn install_viewport_listener(dispatch: Callback<DesktopAction>, debounce_ms: u32) {
    #[cfg(target_arch = "wasm32")]
    {
        let pending = store_value(None::<leptos::leptos_dom::helpers::TimeoutHandle>);
        let handle = window_event_listener(ev::resize, move |_| {
            if let Some(previous) = pending.get_value() {
                previous.clear();
            }
            let scheduled = set_timeout_with_handle(
                move || {
                    dispatch.call(DesktopAction::ViewportResized {
                        viewport: desktop_viewport(),
                    })
                },
                Duration::from_millis(u64::from(debounce_ms)),
            );
            match scheduled {
                Ok(timeout) => pending.set_value(Some(timeout)),
                Err(err) => logging::warn!("viewport debounce timer failed: {err:?}"),
            }
        });
        on_cleanup(move || handle.remove());
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = (dispatch, debounce_ms);
}
