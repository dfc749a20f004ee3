use std::time::Duration;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockSnapshot {
    hour: u32,
    minute: u32,
}

impl ClockSnapshot {
    fn now() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let date = js_sys::Date::new_0();
            Self {
                hour: date.get_hours(),
                minute: date.get_minutes(),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { hour: 0, minute: 0 }
        }
    }
}

/// 12-hour clock text, e.g. `3:07 PM`.
fn format_clock(snapshot: ClockSnapshot) -> String {
    let suffix = if snapshot.hour < 12 { "AM" } else { "PM" };
    let hour = match snapshot.hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour}:{:02} {suffix}", snapshot.minute)
}

fn tray_button_label(win: &WindowRecord) -> String {
    format!("Restore {}", win.title)
}

fn taskbar_button_class(win: &WindowRecord, focused: bool) -> String {
    let mut class = String::from("taskbar-window-btn");
    if focused && !win.minimized {
        class.push_str(" active");
    }
    if win.minimized {
        class.push_str(" minimized");
    }
    class
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let clock = create_rw_signal(ClockSnapshot::now());

    if let Ok(handle) = set_interval_with_handle(
        move || clock.set(ClockSnapshot::now()),
        Duration::from_secs(15),
    ) {
        on_cleanup(move || handle.clear());
    }

    let running = move || state.with(|desktop| desktop.windows.clone());
    let tray = move || state.with(|desktop| desktop.tray_windows().cloned().collect::<Vec<_>>());
    let start_open = move || runtime.interaction.with(|ui| ui.start_menu_open);
    let sound_enabled = move || state.with(|desktop| desktop.sound_enabled);

    view! {
        <footer
            class="taskbar"
            role="toolbar"
            aria-label="Taskbar"
            style=move || format!("height:{}px;", state.with(|desktop| desktop.config.taskbar_height))
            on:contextmenu=move |ev| stop_mouse_event(&ev)
        >
            <button
                id=START_BUTTON_DOM_ID
                type="button"
                class=move || if start_open() { "start-button pressed" } else { "start-button" }
                aria-haspopup="menu"
                aria-controls=START_MENU_DOM_ID
                aria-expanded=move || start_open().to_string()
                on:mousedown=move |ev| ev.stop_propagation()
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::ToggleStartMenu);
                }
            >
                <span class="start-button-logo" aria-hidden="true">"🪟"</span>
                <span>"Start"</span>
            </button>
            <div class="taskbar-windows" role="group" aria-label="Open windows">
                <For each=running key=|win| win.id.0.clone() let:win>
                    {{
                        let window_id = store_value(win.id.clone());
                        let focused = move || {
                            state.with(|desktop| window_id.with_value(|id| desktop.is_focused(id)))
                        };
                        let record = move || {
                            state.with(|desktop| window_id.with_value(|id| desktop.window(id).cloned()))
                        };
                        view! {
                            <button
                                type="button"
                                class=move || {
                                    record()
                                        .map(|win| taskbar_button_class(&win, focused()))
                                        .unwrap_or_default()
                                }
                                title=win.title.clone()
                                aria-pressed=move || {
                                    record().is_some_and(|win| focused() && !win.minimized).to_string()
                                }
                                on:click=move |ev| {
                                    stop_mouse_event(&ev);
                                    runtime.dispatch_action(DesktopAction::CloseStartMenu);
                                    runtime.dispatch_action(DesktopAction::ToggleTaskbarWindow {
                                        window_id: window_id.get_value(),
                                    });
                                }
                            >
                                <span class="taskbar-window-icon" aria-hidden="true">{win.icon.clone()}</span>
                                <span class="taskbar-window-title">{move || record().map(|win| win.title).unwrap_or_default()}</span>
                            </button>
                        }
                    }}
                </For>
            </div>
            <div class="taskbar-tray" role="group" aria-label="Minimized windows">
                <For each=tray key=|win| win.id.0.clone() let:win>
                    {{
                        let window_id = store_value(win.id.clone());
                        view! {
                            <button
                                type="button"
                                class="taskbar-item"
                                title=win.title.clone()
                                aria-label=tray_button_label(&win)
                                on:click=move |ev| {
                                    stop_mouse_event(&ev);
                                    runtime.dispatch_action(DesktopAction::ToggleTaskbarWindow {
                                        window_id: window_id.get_value(),
                                    });
                                }
                            >
                                <span class="taskbar-item-icon" aria-hidden="true">{win.icon.clone()}</span>
                                <span class="taskbar-item-title">{win.title.clone()}</span>
                            </button>
                        }
                    }}
                </For>
            </div>
            <div class="taskbar-status">
                <button
                    type="button"
                    class="taskbar-sound"
                    aria-pressed=move || sound_enabled().to_string()
                    title=move || if sound_enabled() { "Sound on" } else { "Sound off" }
                    on:click=move |ev| {
                        stop_mouse_event(&ev);
                        runtime.dispatch_action(DesktopAction::ToggleSound);
                    }
                >
                    {move || if sound_enabled() { "🔊" } else { "🔇" }}
                </button>
                <span class="taskbar-clock" aria-live="off">
                    {move || format_clock(clock.get())}
                </span>
            </div>
        </footer>
    }
}
