//! Saved desktop session: open windows, window geometry and icon positions.
//!
//! Each document is stored under its own key in a versioned envelope. Bare documents written
//! before envelopes existed load as schema 0 with the same payload shape.

use leptos::logging;
use platform_host::{
    delete_prefs_with, load_versioned_with, save_versioned_with, PrefsStore, StateEnvelope,
    LEGACY_SCHEMA_VERSION,
};
use serde::de::DeserializeOwned;

use crate::model::{IconPositionMap, OpenWindowEntry, WindowGeometryMap};

pub const OPEN_WINDOWS_KEY: &str = "portfolio.desktop.open_windows";
pub const WINDOW_GEOMETRY_KEY: &str = "portfolio.desktop.window_geometry";
pub const ICON_POSITIONS_KEY: &str = "portfolio.desktop.icon_positions";
/// Current payload schema shared by the three desktop documents.
pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Everything the desktop restores on boot.
pub struct BootSnapshot {
    pub open_windows: Vec<OpenWindowEntry>,
    pub geometry: WindowGeometryMap,
    pub icon_positions: IconPositionMap,
}

fn migrate_layout_document<T: DeserializeOwned>(
    schema_version: u32,
    envelope: &StateEnvelope,
) -> Result<Option<T>, String> {
    match schema_version {
        LEGACY_SCHEMA_VERSION => envelope.decode().map(Some),
        _ => Ok(None),
    }
}

async fn load_document<T: DeserializeOwned>(store: &dyn PrefsStore, key: &str) -> Option<T> {
    match load_versioned_with(
        store,
        key,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        migrate_layout_document::<T>,
    )
    .await
    {
        Ok(value) => value,
        Err(err) => {
            logging::warn!("discarding saved `{key}`: {err}");
            None
        }
    }
}

pub async fn load_open_windows(store: &dyn PrefsStore) -> Vec<OpenWindowEntry> {
    load_document(store, OPEN_WINDOWS_KEY).await.unwrap_or_default()
}

pub async fn load_window_geometry(store: &dyn PrefsStore) -> WindowGeometryMap {
    load_document(store, WINDOW_GEOMETRY_KEY)
        .await
        .unwrap_or_default()
}

pub async fn load_icon_positions(store: &dyn PrefsStore) -> IconPositionMap {
    load_document(store, ICON_POSITIONS_KEY)
        .await
        .unwrap_or_default()
}

/// Loads all three documents. Missing or invalid documents come back empty.
pub async fn load_boot_snapshot(store: &dyn PrefsStore) -> BootSnapshot {
    BootSnapshot {
        open_windows: load_open_windows(store).await,
        geometry: load_window_geometry(store).await,
        icon_positions: load_icon_positions(store).await,
    }
}

/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_open_windows(
    store: &dyn PrefsStore,
    entries: &[OpenWindowEntry],
) -> Result<(), String> {
    save_versioned_with(store, OPEN_WINDOWS_KEY, DESKTOP_LAYOUT_SCHEMA_VERSION, &entries).await
}

/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_window_geometry(
    store: &dyn PrefsStore,
    geometry: &WindowGeometryMap,
) -> Result<(), String> {
    save_versioned_with(store, WINDOW_GEOMETRY_KEY, DESKTOP_LAYOUT_SCHEMA_VERSION, geometry).await
}

/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_icon_positions(
    store: &dyn PrefsStore,
    positions: &IconPositionMap,
) -> Result<(), String> {
    save_versioned_with(store, ICON_POSITIONS_KEY, DESKTOP_LAYOUT_SCHEMA_VERSION, positions).await
}

/// Forgets the saved session (open windows and geometry). Icon positions are kept.
///
/// # Errors
///
/// Returns the first store deletion failure.
pub async fn clear_saved_state(store: &dyn PrefsStore) -> Result<(), String> {
    delete_prefs_with(store, &[OPEN_WINDOWS_KEY, WINDOW_GEOMETRY_KEY]).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{GridCell, IconId, WindowId, WindowRect};

    fn entry(id: &str, z_index: u32) -> OpenWindowEntry {
        OpenWindowEntry {
            id: WindowId(id.to_string()),
            minimized: false,
            maximized: false,
            z_index,
        }
    }

    #[test]
    fn documents_round_trip_through_the_store() {
        let store = MemoryPrefsStore::default();
        let entries = vec![entry("notepad", 101), entry("paint", 102)];
        let mut geometry = WindowGeometryMap::new();
        geometry.insert(WindowId("paint".to_string()), WindowRect::new(1, 2, 300, 200));
        let mut icons = IconPositionMap::new();
        icons.insert(IconId("icon-calc".to_string()), GridCell::new(1, 2));

        block_on(save_open_windows(&store, &entries)).expect("save windows");
        block_on(save_window_geometry(&store, &geometry)).expect("save geometry");
        block_on(save_icon_positions(&store, &icons)).expect("save icons");

        let snapshot = block_on(load_boot_snapshot(&store));
        assert_eq!(snapshot.open_windows, entries);
        assert_eq!(snapshot.geometry, geometry);
        assert_eq!(snapshot.icon_positions, icons);
        assert!(!block_on(load_open_windows(&store)).is_empty());
    }

    #[test]
    fn legacy_bare_documents_are_migrated() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(
            OPEN_WINDOWS_KEY,
            r#"[{"id":"readme","minimized":true,"maximized":false,"zIndex":104}]"#,
        );
        store.insert_raw(
            WINDOW_GEOMETRY_KEY,
            r#"{"readme":{"x":10,"y":20,"width":500,"height":520}}"#,
        );
        store.insert_raw(ICON_POSITIONS_KEY, r#"{"icon-readme":{"row":0,"col":3}}"#);

        let snapshot = block_on(load_boot_snapshot(&store));
        assert_eq!(
            snapshot.open_windows,
            vec![OpenWindowEntry {
                minimized: true,
                ..entry("readme", 104)
            }]
        );
        assert_eq!(
            snapshot.geometry.get(&WindowId("readme".to_string())),
            Some(&WindowRect::new(10, 20, 500, 520))
        );
        assert_eq!(
            snapshot.icon_positions.get(&IconId("icon-readme".to_string())),
            Some(&GridCell::new(0, 3))
        );
    }

    #[test]
    fn malformed_and_future_documents_are_discarded() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(OPEN_WINDOWS_KEY, "{not json");
        store.insert_raw(
            WINDOW_GEOMETRY_KEY,
            r#"{"envelope_version":1,"key":"portfolio.desktop.window_geometry","schema_version":9,"updated_at_unix_ms":1,"payload":{}}"#,
        );

        let snapshot = block_on(load_boot_snapshot(&store));
        assert_eq!(snapshot, BootSnapshot::default());
        assert!(block_on(load_open_windows(&store)).is_empty());
    }

    #[test]
    fn clearing_keeps_icon_positions() {
        let store = MemoryPrefsStore::default();
        block_on(save_open_windows(&store, &[entry("calc", 101)])).expect("save");
        block_on(save_window_geometry(&store, &WindowGeometryMap::new())).expect("save");
        block_on(save_icon_positions(&store, &IconPositionMap::new())).expect("save");

        block_on(clear_saved_state(&store)).expect("clear");

        assert_eq!(store.keys(), vec![ICON_POSITIONS_KEY.to_string()]);
        assert!(block_on(load_open_windows(&store)).is_empty());
    }
}
