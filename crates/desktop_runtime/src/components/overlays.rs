use super::*;
use crate::{
    dialog::{DialogKind, DialogRequest, DialogResponse},
    sound::SoundCue,
};

#[component]
pub(super) fn AboutModal() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let close = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::CloseAbout);
    };

    move || {
        let (about, lines) =
            state.with(|desktop| (desktop.about.clone(), desktop.config.about.clone()));
        let about = about?;
        Some(view! {
            <div class="modal-backdrop" on:click=close>
                <div
                    class="about-dialog"
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="about-dialog-title"
                    on:click=move |ev| ev.stop_propagation()
                >
                    <div class="about-icon" aria-hidden="true">{about.icon}</div>
                    <h2 id="about-dialog-title">{about.title}</h2>
                    <p>{lines.version_line}</p>
                    <p>{lines.copyright}</p>
                    <p class="about-tagline">{lines.tagline}</p>
                    <button type="button" class="dialog-button" on:click=close>"OK"</button>
                </div>
            </div>
        })
    }
}

#[component]
pub(super) fn FatalErrorOverlay() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let visible = move || state.with(|desktop| desktop.fatal_error.visible);

    // Dismissal before arming is ignored by the reducer.
    let dismiss = move || runtime.dispatch_action(DesktopAction::DismissFatalError);
    let key_listener = window_event_listener(ev::keydown, move |_| {
        if state.with_untracked(|desktop| desktop.fatal_error.visible) {
            dismiss();
        }
    });
    on_cleanup(move || key_listener.remove());

    view! {
        <Show when=visible fallback=|| ()>
            <div
                class="fatal-error-screen"
                role="alertdialog"
                aria-label="Fatal error"
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    dismiss();
                }
            >
                <div class="fatal-error-content">
                    <p class="fatal-error-title">" Portfolio OS "</p>
                    <p>"A fatal exception 0E has occurred at 0028:C0011E36."</p>
                    <p>"The current application will be terminated."</p>
                    <p>"*  Press any key to continue."</p>
                    <p>"*  You will lose any unsaved information in all applications."</p>
                    <p class="fatal-error-prompt">"Press any key to continue _"</p>
                </div>
            </div>
        </Show>
    }
}

fn dialog_buttons(kind: &DialogKind) -> &'static [(&'static str, bool)] {
    match kind {
        DialogKind::Confirm => &[("Yes", true), ("No", false)],
        DialogKind::Prompt { .. } => &[("OK", true), ("Cancel", false)],
        DialogKind::Alert | DialogKind::Info { .. } => &[("OK", true)],
    }
}

#[component]
pub(super) fn DialogHost() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let dialogs = runtime.dialogs;
    let shown = create_rw_signal(None::<u64>);

    create_effect(move |_| {
        let current = dialogs.current().map(|request| request.id);
        if current.is_some() && current != shown.get_untracked() {
            runtime.dispatch_action(DesktopAction::PlayCue {
                cue: SoundCue::Chord,
            });
        }
        shown.set(current);
    });

    move || dialogs.current().map(|request| view! { <DialogView request=request /> })
}

#[component]
fn DialogView(request: DialogRequest) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let dialogs = runtime.dialogs;
    let input_ref = create_node_ref::<html::Input>();
    let request_id = request.id;
    let kind = store_value(request.kind.clone());

    let respond = move |accept: bool| {
        runtime.dispatch_action(DesktopAction::PlayCue {
            cue: SoundCue::Click,
        });
        let response = match (accept, kind.get_value()) {
            (false, _) => DialogResponse::Cancel,
            (true, DialogKind::Prompt { .. }) => DialogResponse::Submit(
                input_ref
                    .get_untracked()
                    .map(|input| input.value())
                    .unwrap_or_default(),
            ),
            (true, _) => DialogResponse::Accept,
        };
        dialogs.resolve(request_id, response);
    };

    let body = match &request.kind {
        DialogKind::Alert | DialogKind::Confirm => ().into_view(),
        DialogKind::Prompt { default_value } => view! {
            <input
                type="text"
                class="dialog-input"
                node_ref=input_ref
                value=default_value.clone()
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        respond(true);
                    }
                }
            />
        }
        .into_view(),
        DialogKind::Info { rows } => view! {
            <table class="dialog-info">
                <tbody>
                    {rows
                        .iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    <th scope="row">{row.label.clone()}</th>
                                    <td>{row.value.clone()}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_view(),
    };

    create_effect(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
            input.select();
        }
    });

    view! {
        <div
            class="modal-backdrop"
            on:click=move |ev| {
                stop_mouse_event(&ev);
                respond(false);
            }
        >
            <div
                class="dialog"
                role="dialog"
                aria-modal="true"
                aria-labelledby="dialog-title"
                on:click=move |ev| ev.stop_propagation()
            >
                <div class="title-bar">
                    <span id="dialog-title" class="title-bar-text">{request.title.clone()}</span>
                </div>
                <div class="dialog-body">
                    {(!request.message.is_empty())
                        .then(|| view! { <p class="dialog-message">{request.message.clone()}</p> })}
                    {body}
                </div>
                <div class="dialog-buttons">
                    {dialog_buttons(&request.kind)
                        .iter()
                        .map(|&(label, accept)| {
                            view! {
                                <button
                                    type="button"
                                    class="dialog-button"
                                    on:click=move |ev| {
                                        stop_mouse_event(&ev);
                                        respond(accept);
                                    }
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dialog_buttons_follow_kind() {
        assert_eq!(dialog_buttons(&DialogKind::Confirm), &[("Yes", true), ("No", false)]);
        assert_eq!(
            dialog_buttons(&DialogKind::Prompt {
                default_value: String::new()
            }),
            &[("OK", true), ("Cancel", false)]
        );
        assert_eq!(dialog_buttons(&DialogKind::Info { rows: Vec::new() }), &[("OK", true)]);
    }
}
