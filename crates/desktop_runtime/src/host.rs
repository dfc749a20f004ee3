//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Reducer effects are intents; this module turns them into storage writes, timers, sounds, app
//! hook calls and dialogs using the injected [`HostServices`].

mod app_bus;
mod boot;
mod effects;
mod host_ui;
mod persistence_effects;

use std::rc::Rc;

use leptos::Callback;
use platform_host::{HostServices, PageService, PrefsStore};

use crate::{
    model::Viewport,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
    sound::SoundManager,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    page: Rc<dyn PageService>,
    sound: SoundManager,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self::new(HostServices::in_memory(), 0.0)
    }
}

impl DesktopHostContext {
    /// Wraps injected host services; `volume` is the cue gain.
    pub fn new(services: HostServices, volume: f32) -> Self {
        Self {
            prefs: services.prefs,
            page: services.page,
            sound: SoundManager::new(services.tones, volume),
            host_strategy_name: services.host_strategy,
        }
    }

    /// Returns the configured preference store.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    pub fn page_service(&self) -> Rc<dyn PageService> {
        self.page.clone()
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Loads the saved layout and replays it: geometry, icon positions, then open windows.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Keeps the reducer's viewport in sync with the browser window, debounced by `debounce_ms`.
    pub fn install_viewport_listener(&self, dispatch: Callback<DesktopAction>, debounce_ms: u32) {
        host_ui::install_viewport_listener(dispatch, debounce_ms);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        effects::run_runtime_effect(self.clone(), runtime, effect);
    }

    /// Current browser viewport, or the 1024x768 fallback off-browser.
    pub fn desktop_viewport(&self) -> Viewport {
        host_ui::desktop_viewport()
    }
}
