//! Bundled application catalog and app module registry.
//!
//! Manifests, the desktop icon list and the shell configuration are authored in `desktop.toml`,
//! validated by `build.rs`, and embedded here as JSON.

mod placeholders;

use desktop_app_contract::{AppId, AppManifest, AppModule};
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::config::DesktopConfig;

include!(concat!(env!("OUT_DIR"), "/desktop_catalog_generated.rs"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the desktop icon list.
pub struct DesktopIconSpec {
    pub app_id: AppId,
    pub title: String,
    /// Overrides the manifest glyph when set.
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppCatalog {
    manifests: Vec<AppManifest>,
    icons: Vec<DesktopIconSpec>,
}

impl AppCatalog {
    pub fn new(manifests: Vec<AppManifest>, icons: Vec<DesktopIconSpec>) -> Self {
        Self { manifests, icons }
    }

    /// Parses catalog and icon list documents.
    ///
    /// # Errors
    ///
    /// Returns an error when either document is malformed.
    pub fn from_json(apps_json: &str, icons_json: &str) -> Result<Self, String> {
        let manifests = serde_json::from_str::<Vec<AppManifest>>(apps_json)
            .map_err(|e| format!("invalid app catalog: {e}"))?;
        let icons = serde_json::from_str::<Vec<DesktopIconSpec>>(icons_json)
            .map_err(|e| format!("invalid desktop icon list: {e}"))?;
        Ok(Self::new(manifests, icons))
    }

    /// The catalog embedded at build time. Falls back to an empty catalog if it fails to parse.
    pub fn builtin() -> Self {
        match Self::from_json(APP_CATALOG_JSON, DESKTOP_ICONS_JSON) {
            Ok(catalog) => catalog,
            Err(err) => {
                logging::error!("{err}");
                Self::default()
            }
        }
    }

    pub fn manifests(&self) -> &[AppManifest] {
        &self.manifests
    }

    pub fn manifest(&self, app_id: AppId) -> Option<&AppManifest> {
        self.manifests.iter().find(|m| m.app_id == app_id)
    }

    /// Desktop icons in registration order.
    pub fn desktop_icons(&self) -> &[DesktopIconSpec] {
        &self.icons
    }

    /// Glyph for a desktop icon: its own override, the manifest glyph, or `fallback`.
    pub fn icon_glyph(&self, spec: &DesktopIconSpec, fallback: &str) -> String {
        spec.icon
            .clone()
            .or_else(|| self.manifest(spec.app_id).map(|m| m.icon.clone()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Shell configuration embedded at build time. Falls back to defaults if it fails to parse.
pub fn builtin_shell_config() -> DesktopConfig {
    match DesktopConfig::from_json(SHELL_CONFIG_JSON) {
        Ok(config) => config,
        Err(err) => {
            logging::error!("{err}");
            DesktopConfig::default()
        }
    }
}

/// Returns the module that hosts `app_id` inside a window.
pub fn app_module(app_id: AppId) -> AppModule {
    placeholders::module_for(app_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn embedded_catalog_covers_every_app_and_icon() {
        let catalog = AppCatalog::from_json(APP_CATALOG_JSON, DESKTOP_ICONS_JSON)
            .expect("embedded catalog parses");
        assert_eq!(catalog.manifests().len(), AppId::ALL.len());
        for app in AppId::ALL {
            assert!(catalog.manifest(app).is_some(), "missing manifest for {app}");
        }
        let icon_apps: Vec<AppId> = catalog.desktop_icons().iter().map(|i| i.app_id).collect();
        assert_eq!(icon_apps, AppId::ALL.to_vec());
    }

    #[test]
    fn embedded_catalog_keeps_window_metadata() {
        let catalog = AppCatalog::builtin();
        let calc = catalog.manifest(AppId::Calc).expect("calc");
        assert!(!calc.resizable);
        assert!(!calc.has_menu);

        let paint = catalog.manifest(AppId::Paint).expect("paint");
        assert!(paint.resizable);
        assert!(paint.menus.iter().any(|menu| menu.name == "Image"));
    }

    #[test]
    fn embedded_shell_config_matches_defaults_where_unchanged() {
        let config = DesktopConfig::from_json(SHELL_CONFIG_JSON).expect("shell config parses");
        assert_eq!(config.grid, crate::config::GridConfig::default());
        assert_eq!(config.windows.z_base, 100);
        assert_eq!(config.fatal_close.threshold, 3);
        assert_eq!(config.launch.app, AppId::Portfolio);
    }

    #[test]
    fn icon_glyph_prefers_override_then_manifest() {
        let catalog = AppCatalog::builtin();
        let mut spec = DesktopIconSpec {
            app_id: AppId::Notepad,
            title: "Notepad.exe".to_string(),
            icon: None,
        };
        let manifest_icon = catalog.manifest(AppId::Notepad).expect("notepad").icon.clone();
        assert_eq!(catalog.icon_glyph(&spec, "?"), manifest_icon);
        spec.icon = Some("N".to_string());
        assert_eq!(catalog.icon_glyph(&spec, "?"), "N");
        assert_eq!(AppCatalog::default().icon_glyph(&DesktopIconSpec { icon: None, ..spec }, "?"), "?");
    }
}
