//! Typed host contracts shared by the desktop runtime and browser adapters.
//!
//! The runtime only talks to storage through [`PrefsStore`] and to speakers through
//! [`ToneSink`]; concrete browser adapters live in `platform_host_web`. Persisted layout
//! documents go through the versioned envelope helpers in [`storage::versioned`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod audio;
pub mod host;
pub mod storage;
pub mod time;

pub use audio::{NoopToneSink, Tone, ToneSink, Waveform};
pub use host::{HostServices, NoopPageService, PageService};

pub use storage::prefs::{
    delete_prefs_with, load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore,
    PrefsStore, PrefsStoreFuture,
};
pub use storage::versioned::{
    build_state_envelope, load_versioned_with, parse_state_envelope, save_versioned_with,
    StateEnvelope, LEGACY_SCHEMA_VERSION, STATE_ENVELOPE_VERSION,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
