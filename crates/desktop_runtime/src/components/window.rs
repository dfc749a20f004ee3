use super::*;
use super::menus::WindowMenuBar;
use crate::{app_runtime::ensure_window_session, apps, model::WindowId};
use desktop_app_contract::{AppMountContext, WindowService};

#[component]
pub(super) fn DesktopWindow(window_id: WindowId, closing: bool) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let window = Signal::derive(move || {
        runtime.state.with(|desktop| {
            let list = if closing {
                &desktop.closing
            } else {
                &desktop.windows
            };
            id.with_value(|id| list.iter().find(|w| &w.id == id).cloned())
        })
    });
    let focused = Signal::derive(move || {
        runtime
            .state
            .with(|desktop| id.with_value(|id| desktop.is_focused(id)))
    });

    let focus = move |_: web_sys::PointerEvent| {
        if closing || focused.get_untracked() {
            return;
        }
        runtime.dispatch_action(DesktopAction::FocusWindow {
            window_id: id.get_value(),
        });
    };
    let minimize = move || {
        runtime.dispatch_action(DesktopAction::MinimizeWindow {
            window_id: id.get_value(),
        })
    };
    let toggle_maximize = move || {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id: id.get_value(),
        })
    };
    let close = move || {
        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: id.get_value(),
        })
    };
    let begin_drag = move |ev: web_sys::PointerEvent| {
        if closing || !is_primary_pointer(&ev) {
            return;
        }
        if !window.get_untracked().is_some_and(|w| w.can_drag()) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.dispatch_action(DesktopAction::BeginDrag {
            window_id: id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        if !closing {
            toggle_maximize();
        }
    };

    let title_id = id.with_value(|id| format!("window-title-{id}"));
    let is_maximized = move || window.with(|w| w.as_ref().is_some_and(|w| w.maximized));

    view! {
        <Show when=move || window.with(Option::is_some) fallback=|| ()>
            <section
                class=move || {
                    window
                        .with(|w| w.as_ref().map(|w| window_class(w, focused.get(), closing)))
                        .unwrap_or_default()
                }
                style=move || window.with(|w| w.as_ref().map(window_style)).unwrap_or_default()
                role="dialog"
                aria-labelledby=title_id.clone()
                aria-hidden=move || window.with(|w| w.as_ref().is_some_and(|w| w.minimized)).to_string()
                on:pointerdown=focus
            >
                <header
                    class="title-bar"
                    on:pointerdown=begin_drag
                    on:dblclick=titlebar_double_click
                >
                    <span class="title-bar-icon" aria-hidden="true">
                        {move || window.with(|w| w.as_ref().map(|w| w.icon.clone()))}
                    </span>
                    <span id=title_id.clone() class="title-bar-text">
                        {move || window.with(|w| w.as_ref().map(|w| w.title.clone()))}
                    </span>
                    <div class="title-bar-controls">
                        <TitleBarButton label=|| "Minimize" glyph=|| "▼" on_press=minimize />
                        <TitleBarButton
                            label=move || if is_maximized() { "Restore" } else { "Maximize" }
                            glyph=move || if is_maximized() { "◆" } else { "▲" }
                            on_press=toggle_maximize
                        />
                        <TitleBarButton label=|| "Close" glyph=|| "✕" on_press=close />
                    </div>
                </header>
                <Show
                    when=move || !closing && window.with(|w| w.as_ref().is_some_and(|w| w.has_menu))
                    fallback=|| ()
                >
                    <WindowMenuBar window_id=id.get_value() />
                </Show>
                <div class="window-body">
                    {(!closing).then(|| view! { <WindowBody window_id=id.get_value() /> })}
                </div>
                <Show
                    when=move || !closing && window.with(|w| w.as_ref().is_some_and(|w| w.can_resize()))
                    fallback=|| ()
                >
                    <WindowResizeHandle window_id=id.get_value() />
                </Show>
            </section>
        </Show>
    }
}

#[component]
fn TitleBarButton<L, G, F>(label: L, glyph: G, on_press: F) -> impl IntoView
where
    L: Fn() -> &'static str + Copy + 'static,
    G: Fn() -> &'static str + Copy + 'static,
    F: Fn() + Copy + 'static,
{
    view! {
        <button
            type="button"
            class="title-bar-button"
            aria-label=label
            title=label
            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
            on:dblclick=move |ev| stop_mouse_event(&ev)
            on:click=move |ev| {
                stop_mouse_event(&ev);
                on_press();
            }
        >
            {glyph}
        </button>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id: id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! { <div class="resize-handle" aria-hidden="true" on:pointerdown=on_pointerdown /> }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let session = ensure_window_session(runtime.app_runtime, Some(runtime.owner), &window_id);
    let id = store_value(window_id.clone());
    let command_sender = Callback::new(move |command| {
        runtime.dispatch_action(DesktopAction::ApplyAppCommand {
            window_id: id.get_value(),
            command,
        });
    });
    let contents = runtime
        .state
        .with_untracked(|desktop| desktop.window(&window_id).map(|w| w.app_id))
        .map(|app_id| {
            apps::app_module(app_id).mount(AppMountContext {
                app_id,
                window_id: window_id.to_string(),
                inbox: session.inbox,
                window: WindowService::new(command_sender),
            })
        })
        .unwrap_or_else(|| ().into_view());

    view! { <div class="window-content">{contents}</div> }
}
