//! Window manager runtime for the retro portfolio desktop.
//!
//! All desktop state changes flow through [`reduce_desktop`]; the host layer executes the
//! [`RuntimeEffect`] values it returns. Components in [`components`] render the state and
//! dispatch [`DesktopAction`] values through [`DesktopRuntimeContext`].

pub mod app_runtime;
pub mod apps;
pub mod components;
pub mod config;
pub mod desktop_icons;
pub mod dialog;
mod effect_executor;
pub mod grid;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
mod runtime_context;
pub mod sound;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::DesktopConfig;
pub use dialog::{DialogManager, InfoRow};
pub use grid::DesktopGrid;
pub use host::DesktopHostContext;
pub use model::*;
pub use persistence::{clear_saved_state, load_boot_snapshot, BootSnapshot};
pub use reducer::{reduce_desktop, restore_session, DesktopAction, ReducerError, RuntimeEffect};
pub use sound::{SoundCue, SoundManager};
