//! Per-window app sessions: the menu inbox each mounted app drains.

use std::collections::{BTreeSet, HashMap};

use desktop_app_contract::AppMenuEvent;
use leptos::*;

use crate::model::{WindowId, WindowRecord};

const MAX_INBOX_EVENTS: usize = 64;

#[derive(Clone, Copy)]
/// Reactive per-window app session signals.
pub struct WindowAppSession {
    /// Menu commands not yet handled by the app view.
    pub inbox: RwSignal<Vec<AppMenuEvent>>,
}

#[derive(Default)]
/// Sessions keyed by window id, created on first use and dropped when the window closes.
pub struct AppRuntimeState {
    sessions: HashMap<WindowId, WindowAppSession>,
}

impl AppRuntimeState {
    fn ensure_session(&mut self, owner: Option<Owner>, window_id: &WindowId) -> WindowAppSession {
        if let Some(session) = self.sessions.get(window_id).copied() {
            return session;
        }

        let create = || WindowAppSession {
            inbox: create_rw_signal(Vec::new()),
        };
        let session = match owner {
            Some(owner) => with_owner(owner, create),
            None => create(),
        };
        self.sessions.insert(window_id.clone(), session);
        session
    }

    fn deliver(&mut self, owner: Option<Owner>, window_id: &WindowId, event: AppMenuEvent) {
        let session = self.ensure_session(owner, window_id);
        session.inbox.update(|inbox| {
            inbox.push(event);
            if inbox.len() > MAX_INBOX_EVENTS {
                let overflow = inbox.len() - MAX_INBOX_EVENTS;
                inbox.drain(0..overflow);
            }
        });
    }

    fn sync_windows(&mut self, windows: &[WindowRecord]) {
        let active: BTreeSet<&WindowId> = windows.iter().map(|w| &w.id).collect();
        self.sessions.retain(|window_id, session| {
            let keep = active.contains(window_id);
            if !keep {
                session.inbox.dispose();
            }
            keep
        });
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Ensures and returns the session for `window_id`, creating its signals under `owner`.
pub fn ensure_window_session(
    runtime_state: StoredValue<AppRuntimeState>,
    owner: Option<Owner>,
    window_id: &WindowId,
) -> WindowAppSession {
    runtime_state
        .try_update_value(|state| state.ensure_session(owner, window_id))
        .unwrap_or_else(|| WindowAppSession {
            inbox: create_rw_signal(Vec::new()),
        })
}

/// Pushes a menu command into the window's inbox.
pub fn deliver_menu_event(
    runtime_state: StoredValue<AppRuntimeState>,
    owner: Option<Owner>,
    window_id: &WindowId,
    event: AppMenuEvent,
) {
    runtime_state.update_value(|state| state.deliver(owner, window_id, event));
}

/// Drops sessions of windows that are no longer open.
pub fn sync_runtime_sessions(runtime_state: StoredValue<AppRuntimeState>, windows: &[WindowRecord]) {
    runtime_state.update_value(|state| state.sync_windows(windows));
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppId, MenuCommand};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{model::DesktopState, reducer::reduce_desktop, reducer::DesktopAction};

    fn event(command: MenuCommand) -> AppMenuEvent {
        AppMenuEvent {
            window_id: "notepad".to_string(),
            menu: "Edit".to_string(),
            command,
        }
    }

    #[test]
    fn inbox_is_bounded_and_sessions_follow_open_windows() {
        let runtime = create_runtime();
        let sessions = store_value(AppRuntimeState::default());
        let notepad = WindowId::for_app(AppId::Notepad);

        for _ in 0..MAX_INBOX_EVENTS + 5 {
            deliver_menu_event(sessions, None, &notepad, event(MenuCommand::Copy));
        }
        deliver_menu_event(sessions, None, &notepad, event(MenuCommand::Paste));
        let inbox = ensure_window_session(sessions, None, &notepad).inbox.get_untracked();
        assert_eq!(inbox.len(), MAX_INBOX_EVENTS);
        assert_eq!(inbox.last().map(|e| e.command), Some(MenuCommand::Paste));

        let mut state = DesktopState::default();
        let mut interaction = Default::default();
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CreateWindow {
                app_id: AppId::Paint,
                options: Default::default(),
            },
        )
        .expect("open paint");
        ensure_window_session(sessions, None, &WindowId::for_app(AppId::Paint));

        sync_runtime_sessions(sessions, &state.windows);
        assert_eq!(sessions.with_value(AppRuntimeState::len), 1);
        runtime.dispose();
    }
}
