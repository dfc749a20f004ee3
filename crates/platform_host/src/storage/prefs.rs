//! Key-value store contract backing desktop session persistence.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host key-value store holding one JSON document per key.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the raw JSON stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Removes `key`. Missing keys are not an error.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing; used where no host storage exists.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store; clones share the same map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Returns the raw value for `key` without going through the async API.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Seeds a raw value, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw_json.into());
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

/// Deletes every key in `keys`, continuing past failures.
///
/// # Errors
///
/// Returns the first delete error after all deletes were attempted.
pub async fn delete_prefs_with<S: PrefsStore + ?Sized>(
    store: &S,
    keys: &[&str],
) -> Result<(), String> {
    let mut first_error = None;
    for key in keys {
        if let Err(err) = store.delete_pref(key).await {
            first_error.get_or_insert(format!("{key}: {err}"));
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Geometry {
        x: i32,
        y: i32,
    }

    struct FailingDeleteStore;

    impl PrefsStore for FailingDeleteStore {
        fn load_pref<'a>(
            &'a self,
            _key: &'a str,
        ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
            Box::pin(async { Ok(None) })
        }

        fn save_pref<'a>(
            &'a self,
            _key: &'a str,
            _raw_json: &'a str,
        ) -> PrefsStoreFuture<'a, Result<(), String>> {
            Box::pin(async { Ok(()) })
        }

        fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
            Box::pin(async move { Err(format!("quota exceeded for {key}")) })
        }
    }

    #[test]
    fn memory_store_shares_state_between_clones() {
        let store = MemoryPrefsStore::default();
        let twin = store.clone();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("desk.icons", "{\"calc\":1}")).expect("save");
        assert_eq!(twin.raw("desk.icons"), Some("{\"calc\":1}".to_string()));
        block_on(store_obj.delete_pref("desk.icons")).expect("delete");
        assert_eq!(twin.keys(), Vec::<String>::new());
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryPrefsStore::default();
        block_on(save_pref_with(&store, "geometry", &Geometry { x: 4, y: 9 })).expect("save");

        let loaded: Option<Geometry> = block_on(load_pref_with(&store, "geometry")).expect("load");
        assert_eq!(loaded, Some(Geometry { x: 4, y: 9 }));

        let missing: Option<Geometry> = block_on(load_pref_with(&store, "nope")).expect("load");
        assert_eq!(missing, None);
    }

    #[test]
    fn typed_load_reports_malformed_json() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("geometry", "{not json");
        let result: Result<Option<Geometry>, String> = block_on(load_pref_with(&store, "geometry"));
        assert!(result.is_err());
    }

    #[test]
    fn delete_many_removes_all_listed_keys() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("a", "1");
        store.insert_raw("b", "2");
        store.insert_raw("c", "3");
        block_on(delete_prefs_with(&store, &["a", "c"])).expect("delete");
        assert_eq!(store.keys(), vec!["b".to_string()]);
    }

    #[test]
    fn delete_many_reports_first_failure() {
        let err = block_on(delete_prefs_with(&FailingDeleteStore, &["one", "two"]))
            .expect_err("delete should fail");
        assert_eq!(err, "one: quota exceeded for one");
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store_obj: &dyn PrefsStore = &NoopPrefsStore;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
