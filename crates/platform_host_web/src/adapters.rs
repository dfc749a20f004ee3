use std::rc::Rc;

use platform_host::{
    HostServices, NoopPageService, NoopPrefsStore, NoopToneSink, PageService, PrefsStore,
    PrefsStoreFuture,
};

use crate::WebPrefsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters.
    Browser,
    /// In-page shell with storage disabled (`desktop-host-stub` feature).
    Stub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Stub => "stub",
    }
}

/// Adapter enum that erases the concrete store behind [`PrefsStore`].
#[derive(Debug, Clone, Copy)]
pub enum PrefsStoreAdapter {
    /// `localStorage`-backed storage.
    Browser(WebPrefsStore),
    /// Storage disabled.
    Stub(NoopPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::Stub(store) => store.load_pref(key),
        }
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::Stub(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::Stub(store) => store.delete_pref(key),
        }
    }
}

/// Builds the store adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::Stub => PrefsStoreAdapter::Stub(NoopPrefsStore),
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// [`PageService`] backed by `window.location`.
pub struct WebPageService;

impl PageService for WebPageService {
    fn reload(&self) -> Result<(), String> {
        crate::page::reload_page()
    }
}

/// Assembles the host service bundle for the compile-time selected strategy.
pub fn host_services() -> HostServices {
    let page: Rc<dyn PageService> = match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebPageService),
        HostStrategy::Stub => Rc::new(NoopPageService),
    };
    HostServices::new(
        Rc::new(prefs_store()),
        page,
        Rc::new(NoopToneSink),
        host_strategy_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_selects_browser_storage() {
        #[cfg(not(feature = "desktop-host-stub"))]
        {
            assert_eq!(selected_host_strategy(), HostStrategy::Browser);
            assert_eq!(host_strategy_name(), "browser");
            assert!(matches!(prefs_store(), PrefsStoreAdapter::Browser(_)));
        }

        #[cfg(feature = "desktop-host-stub")]
        {
            assert_eq!(host_strategy_name(), "stub");
            assert!(matches!(prefs_store(), PrefsStoreAdapter::Stub(_)));
        }
    }

    #[test]
    fn host_services_report_the_selected_strategy() {
        let services = host_services();
        assert_eq!(services.host_strategy, host_strategy_name());
        assert_eq!(services.page.reload(), Ok(()));
    }
}
