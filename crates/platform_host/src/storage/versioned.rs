//! Versioned JSON envelopes for persisted layout documents.
//!
//! Every persisted document is wrapped in a [`StateEnvelope`] stamped with the schema version of
//! its payload. Loading validates the envelope and routes older schemas through a caller-supplied
//! migration. Documents written before envelopes existed (bare JSON) are surfaced as schema `0`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::prefs::PrefsStore;

/// Version of the [`StateEnvelope`] wrapper itself.
pub const STATE_ENVELOPE_VERSION: u32 = 1;
/// Schema version assigned to bare, pre-envelope documents.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned wrapper around one persisted payload.
pub struct StateEnvelope {
    /// Wrapper version.
    pub envelope_version: u32,
    /// Store key the envelope was written under.
    pub key: String,
    /// Payload schema version.
    pub schema_version: u32,
    /// Last write time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl StateEnvelope {
    /// Creates an envelope stamped with a monotonic timestamp.
    pub fn new(key: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: STATE_ENVELOPE_VERSION,
            key: key.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }

    /// Decodes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.payload.clone()).map_err(|e| e.to_string())
    }
}

/// Builds an envelope from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_state_envelope<T: Serialize>(
    key: &str,
    schema_version: u32,
    payload: &T,
) -> Result<StateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(StateEnvelope::new(key, schema_version, payload))
}

/// Parses stored text into an envelope, wrapping bare JSON as a legacy envelope.
///
/// # Errors
///
/// Returns an error when `raw` is not JSON or carries an unsupported wrapper version.
pub fn parse_state_envelope(key: &str, raw: &str) -> Result<StateEnvelope, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("malformed json: {e}"))?;
    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.contains_key("envelope_version"));
    if !is_envelope {
        return Ok(StateEnvelope {
            envelope_version: STATE_ENVELOPE_VERSION,
            key: key.to_string(),
            schema_version: LEGACY_SCHEMA_VERSION,
            updated_at_unix_ms: 0,
            payload: value,
        });
    }

    let envelope: StateEnvelope =
        serde_json::from_value(value).map_err(|e| format!("malformed envelope: {e}"))?;
    if envelope.envelope_version != STATE_ENVELOPE_VERSION {
        return Err(format!(
            "unsupported envelope version {} (expected {STATE_ENVELOPE_VERSION})",
            envelope.envelope_version
        ));
    }
    Ok(envelope)
}

/// Saves `payload` under `key` wrapped in an envelope at `schema_version`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_versioned_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let envelope = build_state_envelope(key, schema_version, payload)?;
    let raw = serde_json::to_string(&envelope).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

/// Loads a versioned document.
///
/// Payloads at `current_schema` are decoded directly. Older payloads are passed to `migrate`,
/// which may return `Ok(None)` to drop them. Newer payloads are rejected.
///
/// # Errors
///
/// Returns an error for store failures, malformed documents, newer schemas and failed
/// migrations.
pub async fn load_versioned_with<S, T, F>(
    store: &S,
    key: &str,
    current_schema: u32,
    migrate: F,
) -> Result<Option<T>, String>
where
    S: PrefsStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce(u32, &StateEnvelope) -> Result<Option<T>, String>,
{
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let envelope = parse_state_envelope(key, &raw)?;
    if envelope.schema_version == current_schema {
        return envelope.decode().map(Some);
    }
    if envelope.schema_version > current_schema {
        return Err(format!(
            "schema version {} is newer than supported {current_schema}",
            envelope.schema_version
        ));
    }
    migrate(envelope.schema_version, &envelope)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::storage::prefs::MemoryPrefsStore;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Layout {
        ids: Vec<String>,
    }

    fn reject_old(_: u32, _: &StateEnvelope) -> Result<Option<Layout>, String> {
        Ok(None)
    }

    #[test]
    fn envelope_serialization_shape_is_snake_case() {
        let envelope = StateEnvelope {
            envelope_version: STATE_ENVELOPE_VERSION,
            key: "layout".to_string(),
            schema_version: 3,
            updated_at_unix_ms: 77,
            payload: json!({"ok": true}),
        };
        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(
            value,
            json!({
                "envelope_version": 1,
                "key": "layout",
                "schema_version": 3,
                "updated_at_unix_ms": 77,
                "payload": {"ok": true}
            })
        );
    }

    #[test]
    fn new_envelopes_get_increasing_timestamps() {
        let first = StateEnvelope::new("k", 1, json!(1));
        let second = StateEnvelope::new("k", 1, json!(2));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[test]
    fn current_schema_round_trips() {
        let store = MemoryPrefsStore::default();
        let layout = Layout {
            ids: vec!["portfolio".to_string(), "calc".to_string()],
        };
        block_on(save_versioned_with(&store, "layout", 1, &layout)).expect("save");
        let loaded = block_on(load_versioned_with(&store, "layout", 1, reject_old)).expect("load");
        assert_eq!(loaded, Some(layout));
    }

    #[test]
    fn bare_json_is_migrated_as_legacy_schema() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("layout", r#"["readme","paint"]"#);

        let loaded = block_on(load_versioned_with(&store, "layout", 1, |version, envelope| {
            assert_eq!(version, LEGACY_SCHEMA_VERSION);
            let ids: Vec<String> = envelope.decode()?;
            Ok(Some(Layout { ids }))
        }))
        .expect("load");

        assert_eq!(
            loaded,
            Some(Layout {
                ids: vec!["readme".to_string(), "paint".to_string()]
            })
        );
    }

    #[test]
    fn newer_schema_is_rejected() {
        let store = MemoryPrefsStore::default();
        block_on(save_versioned_with(&store, "layout", 9, &json!({"ids": []}))).expect("save");
        let err = block_on(load_versioned_with(&store, "layout", 1, reject_old))
            .expect_err("newer schema should fail");
        assert!(err.contains("newer"));
    }

    #[test]
    fn malformed_documents_are_errors() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("layout", "{{{");
        assert!(block_on(load_versioned_with(&store, "layout", 1, reject_old)).is_err());

        store.insert_raw(
            "layout",
            r#"{"envelope_version":2,"key":"layout","schema_version":1,"updated_at_unix_ms":1,"payload":{}}"#,
        );
        let err = block_on(load_versioned_with(&store, "layout", 1, reject_old))
            .expect_err("unsupported wrapper");
        assert!(err.contains("unsupported envelope version"));
    }

    #[test]
    fn payload_type_mismatch_is_an_error() {
        let store = MemoryPrefsStore::default();
        block_on(save_versioned_with(&store, "layout", 1, &json!({"ids": 5}))).expect("save");
        assert!(block_on(load_versioned_with(&store, "layout", 1, reject_old)).is_err());
    }

    #[test]
    fn missing_key_loads_as_none() {
        let store = MemoryPrefsStore::default();
        assert_eq!(
            block_on(load_versioned_with(&store, "layout", 1, reject_old)).expect("load"),
            None
        );
    }
}
