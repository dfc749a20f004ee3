//! Modal dialogs resolved through futures.
//!
//! Requests queue up and are shown one at a time. Every request resolves exactly once: by a
//! button, by clicking outside the dialog, by Escape, or as a cancel when the queue is dropped.

use std::{collections::VecDeque, future::Future};

use futures::channel::oneshot;
use leptos::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

impl InfoRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt { default_value: String },
    Info { rows: Vec<InfoRow> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    /// Primary button of alert, info and confirm dialogs.
    Accept,
    /// Prompt submission with the entered text.
    Submit(String),
    /// Secondary button, outside click or Escape.
    Cancel,
}

/// FIFO of pending dialogs; the front entry is the one on screen.
#[derive(Debug, Default)]
pub struct DialogQueue {
    next_id: u64,
    pending: VecDeque<(DialogRequest, oneshot::Sender<DialogResponse>)>,
}

impl DialogQueue {
    pub fn push(
        &mut self,
        title: String,
        message: String,
        kind: DialogKind,
    ) -> (u64, oneshot::Receiver<DialogResponse>) {
        self.next_id += 1;
        let id = self.next_id;
        let (tx, rx) = oneshot::channel();
        self.pending.push_back((
            DialogRequest {
                id,
                title,
                message,
                kind,
            },
            tx,
        ));
        (id, rx)
    }

    pub fn current(&self) -> Option<&DialogRequest> {
        self.pending.front().map(|(request, _)| request)
    }

    /// Resolves the dialog on screen. Stale ids are ignored and return `false`.
    pub fn resolve(&mut self, id: u64, response: DialogResponse) -> bool {
        if self.current().map(|request| request.id) != Some(id) {
            return false;
        }
        if let Some((_, tx)) = self.pending.pop_front() {
            // The caller may have stopped waiting.
            let _ = tx.send(response);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Reactive handle to the dialog queue, provided as context by the desktop shell.
#[derive(Clone, Copy)]
pub struct DialogManager {
    queue: StoredValue<DialogQueue>,
    current: RwSignal<Option<DialogRequest>>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self {
            queue: store_value(DialogQueue::default()),
            current: create_rw_signal(None),
        }
    }

    /// Dialog that should be on screen.
    pub fn current(&self) -> Option<DialogRequest> {
        self.current.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.with_value(DialogQueue::len)
    }

    pub fn resolve(&self, id: u64, response: DialogResponse) {
        let resolved = self.queue.try_update_value(|queue| queue.resolve(id, response));
        if resolved == Some(true) {
            self.sync();
        }
    }

    pub fn alert(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> impl Future<Output = ()> {
        let rx = self.open(title.into(), message.into(), DialogKind::Alert);
        async move {
            let _ = rx.await;
        }
    }

    /// Resolves to `true` only for the Yes button.
    pub fn confirm(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> impl Future<Output = bool> {
        let rx = self.open(title.into(), message.into(), DialogKind::Confirm);
        async move { matches!(rx.await, Ok(DialogResponse::Accept)) }
    }

    /// Resolves to the entered text, or `None` when cancelled.
    pub fn prompt(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        default_value: impl Into<String>,
    ) -> impl Future<Output = Option<String>> {
        let rx = self.open(
            title.into(),
            message.into(),
            DialogKind::Prompt {
                default_value: default_value.into(),
            },
        );
        async move {
            match rx.await {
                Ok(DialogResponse::Submit(value)) => Some(value),
                _ => None,
            }
        }
    }

    pub fn info(&self, title: impl Into<String>, rows: Vec<InfoRow>) -> impl Future<Output = ()> {
        let rx = self.open(title.into(), String::new(), DialogKind::Info { rows });
        async move {
            let _ = rx.await;
        }
    }

    fn open(
        &self,
        title: String,
        message: String,
        kind: DialogKind,
    ) -> oneshot::Receiver<DialogResponse> {
        let opened = self
            .queue
            .try_update_value(|queue| queue.push(title, message, kind).1);
        self.sync();
        match opened {
            Some(rx) => rx,
            None => {
                logging::warn!("dialog opened after the desktop shell was disposed");
                // Dropping the sender resolves the receiver as cancelled.
                oneshot::channel().1
            }
        }
    }

    fn sync(&self) {
        let current = self.queue.with_value(|queue| queue.current().cloned());
        if self.current.get_untracked() != current {
            self.current.set(current);
        }
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn queue_shows_requests_in_order_and_resolves_each_once() {
        let mut queue = DialogQueue::default();
        let (first, first_rx) = queue.push("A".into(), "one".into(), DialogKind::Alert);
        let (second, second_rx) = queue.push("B".into(), "two".into(), DialogKind::Confirm);

        assert_eq!(queue.current().map(|r| r.id), Some(first));
        assert!(!queue.resolve(second, DialogResponse::Accept));
        assert!(queue.resolve(first, DialogResponse::Accept));
        assert!(!queue.resolve(first, DialogResponse::Cancel));
        assert_eq!(queue.current().map(|r| r.id), Some(second));
        assert!(queue.resolve(second, DialogResponse::Cancel));
        assert!(queue.is_empty());

        assert_eq!(block_on(first_rx), Ok(DialogResponse::Accept));
        assert_eq!(block_on(second_rx), Ok(DialogResponse::Cancel));
    }

    #[test]
    fn dropped_queue_cancels_waiters() {
        let mut queue = DialogQueue::default();
        let (_, rx) = queue.push("A".into(), "one".into(), DialogKind::Alert);
        drop(queue);
        assert!(block_on(rx).is_err());
    }

    #[test]
    fn manager_futures_map_responses() {
        let runtime = create_runtime();
        let dialogs = DialogManager::new();

        let confirm = dialogs.confirm("Paint", "Clear?");
        let prompt = dialogs.prompt("New Folder", "Name:", "New Folder");
        let cancelled = dialogs.prompt("Open", "Address:", "");
        assert_eq!(dialogs.pending(), 3);

        let current = dialogs.current().expect("confirm on screen");
        assert_eq!(current.kind, DialogKind::Confirm);
        dialogs.resolve(current.id, DialogResponse::Accept);

        let current = dialogs.current().expect("prompt on screen");
        assert_eq!(
            current.kind,
            DialogKind::Prompt {
                default_value: "New Folder".to_string()
            }
        );
        dialogs.resolve(current.id, DialogResponse::Submit("Projects".to_string()));

        let current = dialogs.current().expect("second prompt on screen");
        dialogs.resolve(current.id, DialogResponse::Cancel);

        assert!(block_on(confirm));
        assert_eq!(block_on(prompt), Some("Projects".to_string()));
        assert_eq!(block_on(cancelled), None);
        assert_eq!(dialogs.current(), None);
        runtime.dispose();
    }
}
