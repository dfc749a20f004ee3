//! Desktop shell UI composition and interaction surfaces.

mod a11y;
mod desktop_icon;
mod menus;
mod overlays;
mod taskbar;
mod window;

use leptos::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use self::{
    a11y::{focus_element_by_id, focus_first_menu_item},
    desktop_icon::{DesktopIcon, IconDragGhost, IconDropPreview},
    menus::{DesktopContextMenu, StartMenu},
    overlays::{AboutModal, DialogHost, FatalErrorOverlay},
    taskbar::Taskbar,
    window::DesktopWindow,
};

use crate::{
    model::{
        ContextMenuCommand, ContextMenuTarget, DesktopState, GridCell, PointerPosition, Viewport,
        WindowRecord,
    },
    reducer::DesktopAction,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

pub(crate) const CONTEXT_MENU_DOM_ID: &str = "desktop-context-menu";
const SHELL_DOM_ID: &str = "desktop-shell-root";
pub(crate) const START_MENU_DOM_ID: &str = "start-menu";
pub(crate) const START_BUTTON_DOM_ID: &str = "taskbar-start-button";
const CONTEXT_MENU_WIDTH_PX: i32 = 180;
const CONTEXT_MENU_ROW_PX: i32 = 24;

/// One row of a right-click menu; `None` is a separator.
pub(crate) type ContextMenuRow = Option<(&'static str, ContextMenuCommand)>;

pub(crate) fn context_menu_rows(target: &ContextMenuTarget) -> Vec<ContextMenuRow> {
    match target {
        ContextMenuTarget::Icon(_) => vec![
            Some(("Open", ContextMenuCommand::Open)),
            None,
            Some(("Properties", ContextMenuCommand::Properties)),
        ],
        ContextMenuTarget::Desktop => vec![
            Some(("Refresh", ContextMenuCommand::Refresh)),
            None,
            Some(("Auto Arrange", ContextMenuCommand::AutoArrange)),
            Some(("Sort by Name", ContextMenuCommand::SortByName)),
            None,
            Some(("Settings", ContextMenuCommand::Settings)),
            Some(("System Info", ContextMenuCommand::SystemInfo)),
        ],
    }
}

/// Keeps a popup of `rows` entries inside the work area.
pub(crate) fn clamp_popup_position(
    position: PointerPosition,
    rows: usize,
    viewport: Viewport,
    taskbar_height: i32,
) -> PointerPosition {
    let height = rows as i32 * CONTEXT_MENU_ROW_PX + 8;
    let max_x = (viewport.width - CONTEXT_MENU_WIDTH_PX - 4).max(0);
    let max_y = (viewport.height - taskbar_height - height - 4).max(0);
    PointerPosition::new(position.x.clamp(0, max_x), position.y.clamp(0, max_y))
}

pub(crate) fn window_class(win: &WindowRecord, focused: bool, closing: bool) -> String {
    let mut class = String::from("window");
    if focused {
        class.push_str(" active");
    }
    if win.minimized {
        class.push_str(" minimized");
    }
    if win.maximized {
        class.push_str(" maximized");
    }
    if win.opening {
        class.push_str(" opening");
    }
    if closing {
        class.push_str(" closing");
    }
    class
}

pub(crate) fn window_style(win: &WindowRecord) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        win.rect.x, win.rect.y, win.rect.w, win.rect.h, win.z_index
    )
}

fn icon_cell_style(state: &DesktopState, cell: GridCell) -> String {
    let origin = state.grid.position_from_cell(cell);
    format!("left:{}px;top:{}px;", origin.x, origin.y)
}

pub(crate) fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

pub(crate) fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

pub(crate) fn pointer_from_mouse_event(ev: &web_sys::MouseEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

/// Primary button for mice, primary contact for touch and pen.
pub(crate) fn is_primary_pointer(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext, pointer: PointerPosition) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndDrag);
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
    if interaction.icon_drag.is_some() {
        runtime.dispatch_action(DesktopAction::IconPointerUp { pointer });
    }
}

#[component]
/// Renders the full desktop shell UI: icon grid, window layer, overlays and taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let interaction = runtime.interaction;
    let dialogs = runtime.dialogs;
    let context_menu_was_open = create_rw_signal(false);
    let start_menu_was_open = create_rw_signal(false);

    create_effect(move |_| {
        let is_open = interaction.with(|ui| ui.context_menu.is_some());
        let was_open = context_menu_was_open.get_untracked();
        if is_open && !was_open {
            context_menu_was_open.set(true);
            let _ = focus_first_menu_item(CONTEXT_MENU_DOM_ID);
        } else if !is_open && was_open {
            context_menu_was_open.set(false);
        }
    });

    create_effect(move |_| {
        let is_open = interaction.with(|ui| ui.start_menu_open);
        let was_open = start_menu_was_open.get_untracked();
        if is_open && !was_open {
            start_menu_was_open.set(true);
            let _ = focus_first_menu_item(START_MENU_DOM_ID);
        } else if !is_open && was_open {
            start_menu_was_open.set(false);
        }
    });

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.key() != "Escape" {
            return;
        }

        if let Some(request) = dialogs.current() {
            ev.prevent_default();
            dialogs.resolve(request.id, crate::dialog::DialogResponse::Cancel);
            return;
        }
        let ui = interaction.get_untracked();
        if ui.context_menu.is_some() {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseContextMenu);
            let _ = focus_element_by_id(SHELL_DOM_ID);
        } else if ui.start_menu_open {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseStartMenu);
            let _ = focus_element_by_id(START_BUTTON_DOM_ID);
        } else if ui.open_menu.is_some() {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseMenus);
        } else if state.with_untracked(|desktop| desktop.about.is_some()) {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseAbout);
        }
    });
    on_cleanup(move || escape_listener.remove());

    let shortcut_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.alt_key() || ev.meta_key() {
            return;
        }
        let blocked = state.with_untracked(|desktop| desktop.fatal_error.visible)
            || dialogs.current().is_some();
        if blocked {
            return;
        }
        let app_id = state.with_untracked(|desktop| {
            desktop.config.shortcut_app(&ev.key(), ev.ctrl_key())
        });
        if let Some(app_id) = app_id {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CreateWindow {
                app_id,
                options: Default::default(),
            });
        }
    });
    on_cleanup(move || shortcut_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let ui = interaction.get_untracked();

        if ui.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateDrag { pointer });
        }
        if ui.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
        if ui.icon_drag.is_some() {
            runtime.dispatch_action(DesktopAction::IconPointerMove { pointer });
        }
    };
    let on_pointer_up = move |ev: web_sys::PointerEvent| {
        end_active_pointer_interaction(runtime, pointer_from_pointer_event(&ev));
    };
    let on_pointer_cancel = move |ev: web_sys::PointerEvent| {
        let ui = interaction.get_untracked();
        if ui.icon_drag.is_some() {
            runtime.dispatch_action(DesktopAction::IconPointerCancel);
        }
        if ui.dragging.is_some() || ui.resizing.is_some() {
            end_active_pointer_interaction(runtime, pointer_from_pointer_event(&ev));
        }
    };

    let on_desktop_click = move |ev: web_sys::MouseEvent| {
        if ev.target() != ev.current_target() {
            return;
        }
        if interaction.with_untracked(|ui| ui.open_menu.is_some()) {
            runtime.dispatch_action(DesktopAction::CloseMenus);
        }
        runtime.dispatch_action(DesktopAction::DeactivateAll);
        runtime.dispatch_action(DesktopAction::ClearSelection);
    };
    let on_desktop_context_menu = move |ev: web_sys::MouseEvent| {
        if ev.target() != ev.current_target() {
            return;
        }
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::OpenContextMenu {
            target: ContextMenuTarget::Desktop,
            position: pointer_from_mouse_event(&ev),
        });
    };

    view! {
        <div
            id=SHELL_DOM_ID
            class="desktop-shell"
            tabindex="-1"
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_cancel
            on:mousedown=move |_| {
                let (context_menu, start_menu) = interaction
                    .with_untracked(|ui| (ui.context_menu.is_some(), ui.start_menu_open));
                if context_menu {
                    runtime.dispatch_action(DesktopAction::CloseContextMenu);
                }
                if start_menu {
                    runtime.dispatch_action(DesktopAction::CloseStartMenu);
                }
            }
        >
            <div
                class="desktop"
                role="application"
                aria-label="Desktop"
                style=move || format!(
                    "bottom:{}px;",
                    state.with(|desktop| desktop.config.taskbar_height)
                )
                on:click:undelegated=on_desktop_click
                on:contextmenu:undelegated=on_desktop_context_menu
            >
                <IconDropPreview />
                <For
                    each=move || state.get().icons
                    key=|icon| icon.id.0.clone()
                    let:icon
                >
                    <DesktopIcon icon_id=icon.id />
                </For>
                <IconDragGhost />

                <For
                    each=move || state.get().windows
                    key=|win| win.id.0.clone()
                    let:win
                >
                    <DesktopWindow window_id=win.id closing=false />
                </For>
                <For
                    each=move || state.get().closing
                    key=|win| format!("closing-{}", win.id)
                    let:win
                >
                    <DesktopWindow window_id=win.id closing=true />
                </For>
            </div>

            <DesktopContextMenu />
            <AboutModal />
            <FatalErrorOverlay />
            <DialogHost />
            <StartMenu />
            <Taskbar />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppId;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{IconId, WindowRect};

    #[test]
    fn context_menu_rows_match_target() {
        let icon_rows: Vec<_> = context_menu_rows(&ContextMenuTarget::Icon(IconId::for_app(
            AppId::Calc,
        )))
        .into_iter()
        .flatten()
        .map(|(label, _)| label)
        .collect();
        assert_eq!(icon_rows, vec!["Open", "Properties"]);

        let desktop_rows = context_menu_rows(&ContextMenuTarget::Desktop);
        assert_eq!(desktop_rows.len(), 7);
        assert_eq!(
            desktop_rows.last().copied().flatten(),
            Some(("System Info", ContextMenuCommand::SystemInfo))
        );
    }

    #[test]
    fn popups_stay_above_the_taskbar() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(
            clamp_popup_position(PointerPosition::new(790, 590), 7, viewport, 40),
            PointerPosition::new(616, 380)
        );
        assert_eq!(
            clamp_popup_position(PointerPosition::new(-5, 20), 3, viewport, 40),
            PointerPosition::new(0, 20)
        );
    }

    #[test]
    fn window_class_reflects_state() {
        let mut state = DesktopState::default();
        crate::reducer::reduce_desktop(
            &mut state,
            &mut Default::default(),
            DesktopAction::CreateWindow {
                app_id: AppId::Notepad,
                options: Default::default(),
            },
        )
        .expect("open notepad");
        let mut win = state.windows[0].clone();
        assert_eq!(window_class(&win, true, false), "window active opening");

        win.opening = false;
        win.maximized = true;
        win.rect = WindowRect::new(0, 0, 1024, 728);
        assert_eq!(window_class(&win, false, true), "window maximized closing");
        assert_eq!(
            window_style(&win),
            format!("left:0px;top:0px;width:1024px;height:728px;z-index:{};", win.z_index)
        );
    }
}
