//! Host service bundle assembled by the entry layer and injected into the desktop runtime.

use std::rc::Rc;

use crate::{NoopToneSink, PrefsStore, ToneSink};

/// Page-level controls the shell may request from its host.
pub trait PageService {
    /// Reloads the page hosting the shell.
    ///
    /// # Errors
    ///
    /// Returns an error when the host refuses or cannot reload.
    fn reload(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Page service for hosts without a reloadable page (tests, native builds).
pub struct NoopPageService;

impl PageService for NoopPageService {
    fn reload(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Clone)]
/// Concrete host services handed to the desktop provider.
pub struct HostServices {
    /// Key-value store for layout persistence.
    pub prefs: Rc<dyn PrefsStore>,
    /// Page reload control.
    pub page: Rc<dyn PageService>,
    /// Speaker for UI sound cues.
    pub tones: Rc<dyn ToneSink>,
    /// Stable strategy token for diagnostics.
    pub host_strategy: &'static str,
}

impl HostServices {
    /// Bundles the given services.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        page: Rc<dyn PageService>,
        tones: Rc<dyn ToneSink>,
        host_strategy: &'static str,
    ) -> Self {
        Self {
            prefs,
            page,
            tones,
            host_strategy,
        }
    }

    /// In-memory services: empty [`crate::MemoryPrefsStore`], a no-op page and no audio.
    pub fn in_memory() -> Self {
        Self::new(
            Rc::new(crate::MemoryPrefsStore::default()),
            Rc::new(NoopPageService),
            Rc::new(NoopToneSink),
            "memory",
        )
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn in_memory_services_store_and_reload() {
        let services = HostServices::in_memory();
        block_on(services.prefs.save_pref("k", "1")).expect("save");
        assert_eq!(
            block_on(services.prefs.load_pref("k")).expect("load"),
            Some("1".to_string())
        );
        assert_eq!(services.page.reload(), Ok(()));
        assert_eq!(services.host_strategy, "memory");
    }
}
