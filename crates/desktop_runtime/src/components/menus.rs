use super::*;
use super::a11y::handle_menu_roving_keydown;
use crate::model::WindowId;
use desktop_app_contract::{AppId, MenuEntry, MenuSpec};

fn dropdown_dom_id(window_id: &WindowId, menu: &str) -> String {
    let slug: String = menu
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("menu-{window_id}-{slug}")
}

#[component]
pub(super) fn WindowMenuBar(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let menus = Signal::derive(move || {
        runtime.state.with(|desktop| {
            id.with_value(|id| desktop.window(id).map(|w| w.menus.clone()))
                .unwrap_or_default()
        })
    });
    let open_menu = Signal::derive(move || {
        runtime.interaction.with(|ui| {
            ui.open_menu
                .as_ref()
                .filter(|open| id.with_value(|id| &open.window_id == id))
                .map(|open| open.menu.clone())
        })
    });

    view! {
        <nav class="menu-bar" role="menubar" on:pointerdown=move |ev| ev.stop_propagation()>
            <For each=move || menus.get() key=|menu| menu.name.clone() let:menu>
                <MenuBarEntry window_id=id.get_value() menu=menu open_menu=open_menu />
            </For>
        </nav>
    }
}

#[component]
fn MenuBarEntry(window_id: WindowId, menu: MenuSpec, open_menu: Signal<Option<String>>) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let name = store_value(menu.name.clone());
    let dropdown_id = dropdown_dom_id(&window_id, &menu.name);
    let id = store_value(window_id);
    let is_open = move || name.with_value(|name| open_menu.get().as_deref() == Some(name.as_str()));

    let toggle = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::ToggleMenu {
            window_id: id.get_value(),
            menu: name.get_value(),
        });
    };
    let hover = move |_| {
        if open_menu.get_untracked().is_some() && !is_open() {
            runtime.dispatch_action(DesktopAction::HoverMenu {
                window_id: id.get_value(),
                menu: name.get_value(),
            });
        }
    };

    // Entries are read live so check marks follow `SetMenuChecked`.
    let entries = move || {
        runtime.state.with(|desktop| {
            id.with_value(|window_id| {
                name.with_value(|name| {
                    desktop
                        .window(window_id)
                        .and_then(|w| w.menus.iter().find(|m| &m.name == name))
                        .map(|m| m.entries.clone())
                        .unwrap_or_default()
                })
            })
        })
    };

    view! {
        <div class="menu-bar-entry" class:open=is_open>
            <button
                type="button"
                class="menu-bar-title"
                role="menuitem"
                aria-haspopup="menu"
                aria-expanded=move || is_open().to_string()
                on:click=toggle
                on:mouseenter=hover
            >
                {menu.name.clone()}
            </button>
            <Show when=is_open fallback=|| ()>
                <div
                    id=dropdown_id.clone()
                    class="menu-dropdown"
                    role="menu"
                    on:keydown={
                        let dropdown_id = dropdown_id.clone();
                        move |ev: web_sys::KeyboardEvent| {
                            handle_menu_roving_keydown(&ev, &dropdown_id);
                        }
                    }
                >
                    {move || {
                        entries()
                            .into_iter()
                            .map(|entry| match entry {
                                MenuEntry::Divider => {
                                    view! { <div class="menu-divider" role="separator"></div> }
                                        .into_view()
                                }
                                MenuEntry::Item(item) => {
                                    let command = item.command;
                                    let disabled = item.disabled;
                                    view! {
                                        <button
                                            type="button"
                                            class="menu-item"
                                            class:disabled=disabled
                                            role="menuitemcheckbox"
                                            aria-checked=item.checked.to_string()
                                            aria-disabled=disabled.to_string()
                                            on:click=move |ev| {
                                                stop_mouse_event(&ev);
                                                if disabled {
                                                    return;
                                                }
                                                runtime.dispatch_action(DesktopAction::ActivateMenuItem {
                                                    window_id: id.get_value(),
                                                    menu: name.get_value(),
                                                    command,
                                                });
                                            }
                                        >
                                            <span class="menu-check" aria-hidden="true">
                                                {if item.checked { "✓" } else { "" }}
                                            </span>
                                            <span class="menu-label">{item.label.clone()}</span>
                                            <span class="menu-shortcut">
                                                {item.shortcut.clone().unwrap_or_default()}
                                            </span>
                                        </button>
                                    }
                                        .into_view()
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
        </div>
    }
}

#[component]
pub(super) fn DesktopContextMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <Show
            when=move || runtime.interaction.with(|ui| ui.context_menu.is_some())
            fallback=|| ()
        >
            {move || {
                let Some(menu) = runtime.interaction.with(|ui| ui.context_menu.clone()) else {
                    return ().into_view();
                };
                let rows = context_menu_rows(&menu.target);
                let (viewport, taskbar_height) = runtime
                    .state
                    .with_untracked(|desktop| (desktop.viewport, desktop.config.taskbar_height));
                let at = clamp_popup_position(menu.position, rows.len(), viewport, taskbar_height);
                let label = match menu.target {
                    ContextMenuTarget::Desktop => "Desktop context menu",
                    ContextMenuTarget::Icon(_) => "Icon context menu",
                };

                view! {
                    <div
                        id=CONTEXT_MENU_DOM_ID
                        class="context-menu"
                        role="menu"
                        aria-label=label
                        style=format!("left:{}px;top:{}px;", at.x, at.y)
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            handle_menu_roving_keydown(&ev, CONTEXT_MENU_DOM_ID);
                        }
                        on:mousedown=move |ev| ev.stop_propagation()
                        on:contextmenu=move |ev| stop_mouse_event(&ev)
                    >
                        {rows
                            .into_iter()
                            .map(|row| match row {
                                None => {
                                    view! { <div class="menu-divider" role="separator"></div> }
                                        .into_view()
                                }
                                Some((text, command)) => {
                                    view! {
                                        <button
                                            type="button"
                                            class="menu-item"
                                            role="menuitem"
                                            on:click=move |ev| {
                                                stop_mouse_event(&ev);
                                                runtime.dispatch_action(
                                                    DesktopAction::RunContextMenuCommand { command },
                                                );
                                            }
                                        >
                                            <span class="menu-label">{text}</span>
                                        </button>
                                    }
                                        .into_view()
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_view()
            }}
        </Show>
    }
}

/// Start menu rows `(app, icon, title)`; apps without a manifest are left out.
fn start_menu_entries(state: &DesktopState) -> Vec<(AppId, String, String)> {
    state
        .config
        .start_menu
        .iter()
        .filter_map(|&app_id| {
            state
                .manifest(app_id)
                .map(|manifest| (app_id, manifest.icon.clone(), manifest.title.clone()))
        })
        .collect()
}

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let entries = move || runtime.state.with(start_menu_entries);

    view! {
        <Show
            when=move || runtime.interaction.with(|ui| ui.start_menu_open)
            fallback=|| ()
        >
            <div
                id=START_MENU_DOM_ID
                class="start-menu"
                role="menu"
                aria-label="Programs"
                style=move || format!(
                    "bottom:{}px;",
                    runtime.state.with(|desktop| desktop.config.taskbar_height)
                )
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    handle_menu_roving_keydown(&ev, START_MENU_DOM_ID);
                }
                on:mousedown=move |ev| ev.stop_propagation()
                on:contextmenu=move |ev| stop_mouse_event(&ev)
            >
                <div class="start-menu-banner" aria-hidden="true">"Portfolio OS"</div>
                <For each=entries key=|(app_id, _, _)| *app_id let:entry>
                    {{
                        let (app_id, icon, title) = entry;
                        view! {
                            <button
                                type="button"
                                class="menu-item start-item"
                                role="menuitem"
                                data-app=app_id.to_string()
                                on:click=move |ev| {
                                    stop_mouse_event(&ev);
                                    runtime.dispatch_action(DesktopAction::CreateWindow {
                                        app_id,
                                        options: Default::default(),
                                    });
                                }
                            >
                                <span class="start-item-icon" aria-hidden="true">{icon}</span>
                                <span class="menu-label">{title}</span>
                            </button>
                        }
                    }}
                </For>
            </div>
        </Show>
    }
}
