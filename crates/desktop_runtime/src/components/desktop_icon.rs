use super::*;
use crate::model::IconId;
use platform_host::unix_time_ms_now;

#[component]
pub(super) fn DesktopIcon(icon_id: IconId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let interaction = runtime.interaction;
    let id = store_value(icon_id);

    let icon = Signal::derive(move || {
        state.with(|desktop| id.with_value(|id| desktop.icon(id).cloned()))
    });
    let selected = move || {
        state.with(|desktop| id.with_value(|id| desktop.selected_icon.as_ref() == Some(id)))
    };
    let dragging = move || {
        interaction.with(|ui| {
            ui.icon_drag
                .as_ref()
                .is_some_and(|drag| drag.active && id.with_value(|id| &drag.icon_id == id))
        })
    };

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::IconPointerDown {
            icon_id: id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::IconClick {
            icon_id: id.get_value(),
            at_ms: unix_time_ms_now(),
        });
    };
    let on_contextmenu = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::OpenContextMenu {
            target: ContextMenuTarget::Icon(id.get_value()),
            position: pointer_from_mouse_event(&ev),
        });
    };
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::ActivateIcon {
                icon_id: id.get_value(),
            });
        }
    };

    view! {
        <Show
            when=move || icon.with(|icon| icon.as_ref().is_some_and(|i| i.cell.is_some()))
            fallback=|| ()
        >
            <div
                class="desktop-icon"
                class:selected=selected
                class:dragging=dragging
                role="button"
                tabindex="0"
                aria-label=move || icon.with(|icon| icon.as_ref().map(|i| i.title.clone()))
                style=move || {
                    state.with(|desktop| {
                        icon.with(|icon| {
                            icon.as_ref()
                                .and_then(|i| i.cell)
                                .map(|cell| icon_cell_style(desktop, cell))
                        })
                    })
                }
                on:pointerdown=on_pointerdown
                on:click=on_click
                on:contextmenu=on_contextmenu
                on:keydown=on_keydown
            >
                <span class="desktop-icon-glyph" aria-hidden="true">
                    {move || icon.with(|icon| icon.as_ref().map(|i| i.icon.clone()))}
                </span>
                <span class="desktop-icon-label">
                    {move || icon.with(|icon| icon.as_ref().map(|i| i.title.clone()))}
                </span>
            </div>
        </Show>
    }
}

/// Floating clone that follows the pointer during an icon drag.
#[component]
pub(super) fn IconDragGhost() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let ghost = move || {
        let drag = runtime
            .interaction
            .with(|ui| ui.icon_drag.clone().filter(|drag| drag.active))?;
        let icon = runtime.state.with(|desktop| desktop.icon(&drag.icon_id).cloned())?;
        Some((drag.ghost_position(), icon))
    };

    move || {
        ghost().map(|(at, icon)| {
            view! {
                <div
                    class="desktop-icon ghost"
                    aria-hidden="true"
                    style=format!("left:{}px;top:{}px;", at.x, at.y)
                >
                    <span class="desktop-icon-glyph">{icon.icon}</span>
                    <span class="desktop-icon-label">{icon.title}</span>
                </div>
            }
        })
    }
}

/// Outline of the cell an icon drag would drop into.
#[component]
pub(super) fn IconDropPreview() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let preview = move || {
        let cell = runtime
            .interaction
            .with(|ui| ui.icon_drag.as_ref().and_then(|drag| drag.preview))?;
        Some(runtime.state.with(|desktop| icon_cell_style(desktop, cell)))
    };

    move || {
        preview().map(|style| {
            view! { <div class="desktop-drop-preview" aria-hidden="true" style=style></div> }
        })
    }
}
