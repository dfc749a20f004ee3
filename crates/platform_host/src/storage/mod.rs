//! Host storage contracts.

pub mod prefs;
pub mod versioned;
