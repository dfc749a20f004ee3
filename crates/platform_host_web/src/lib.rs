//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Provides the `localStorage` store behind [`platform_host::PrefsStore`], the compile-time
//! adapter factory used by the runtime, and the page reload helper for the boot error screen.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod page;
pub mod storage;

pub use adapters::{
    host_services, host_strategy_name, prefs_store, selected_host_strategy, HostStrategy,
    PrefsStoreAdapter, WebPageService,
};
pub use page::reload_page;
pub use storage::local_prefs::WebPrefsStore;
