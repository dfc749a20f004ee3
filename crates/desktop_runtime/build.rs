use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_WIDTH: i32 = 200;
const DEFAULT_MIN_HEIGHT: i32 = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum MenuEntry {
    Divider,
    Item {
        label: String,
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shortcut: Option<String>,
        #[serde(default)]
        checked: bool,
        #[serde(default)]
        disabled: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MenuSpec {
    name: String,
    entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    app_id: String,
    title: String,
    icon: String,
    default_width: i32,
    default_height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_menu: Option<bool>,
    #[serde(default)]
    menus: Vec<MenuSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DesktopIcon {
    app_id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DesktopCatalog {
    shell: toml::Table,
    app: Vec<AppManifest>,
    desktop_icon: Vec<DesktopIcon>,
}

fn validate_app(app: &AppManifest) -> Result<(), String> {
    if app.title.trim().is_empty() {
        return Err("title is empty".to_string());
    }
    if app.default_width <= 0 || app.default_height <= 0 {
        return Err(format!(
            "default size must be positive, found {}x{}",
            app.default_width, app.default_height
        ));
    }
    let min_width = app.min_width.unwrap_or(DEFAULT_MIN_WIDTH);
    let min_height = app.min_height.unwrap_or(DEFAULT_MIN_HEIGHT);
    if min_width <= 0 || min_height <= 0 {
        return Err("minimum size must be positive".to_string());
    }
    if min_width > app.default_width || min_height > app.default_height {
        return Err(format!(
            "minimum size {min_width}x{min_height} exceeds default {}x{}",
            app.default_width, app.default_height
        ));
    }
    let has_menu = app.has_menu.unwrap_or(true);
    if !has_menu && !app.menus.is_empty() {
        return Err("declares menus but has_menu = false".to_string());
    }
    let mut names = BTreeSet::new();
    for menu in &app.menus {
        if !names.insert(menu.name.as_str()) {
            return Err(format!("duplicate menu `{}`", menu.name));
        }
        if !menu
            .entries
            .iter()
            .any(|entry| matches!(entry, MenuEntry::Item { .. }))
        {
            return Err(format!("menu `{}` has no items", menu.name));
        }
        for entry in &menu.entries {
            if let MenuEntry::Item { label, command, .. } = entry {
                if label.trim().is_empty() || command.trim().is_empty() {
                    return Err(format!("menu `{}` has an unlabeled item", menu.name));
                }
            }
        }
    }
    Ok(())
}

fn shell_app_refs(shell: &toml::Table) -> Vec<(String, String)> {
    let mut refs = Vec::new();
    if let Some(toml::Value::String(app_id)) = shell.get("help_app") {
        refs.push(("help_app".to_string(), app_id.clone()));
    }
    for table in ["fatal_close", "launch"] {
        if let Some(toml::Value::String(app_id)) = shell.get(table).and_then(|t| t.get("app")) {
            refs.push((format!("{table}.app"), app_id.clone()));
        }
    }
    if let Some(toml::Value::Array(entries)) = shell.get("start_menu") {
        for (index, entry) in entries.iter().enumerate() {
            if let toml::Value::String(app_id) = entry {
                refs.push((format!("start_menu[{index}]"), app_id.clone()));
            }
        }
    }
    if let Some(toml::Value::Array(shortcuts)) = shell.get("shortcuts") {
        for (index, shortcut) in shortcuts.iter().enumerate() {
            if let Some(toml::Value::String(app_id)) = shortcut.get("app") {
                refs.push((format!("shortcuts[{index}].app"), app_id.clone()));
            }
        }
    }
    refs
}

fn to_json<T: Serialize>(value: &T, what: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| panic!("serialize {what}: {err}"))
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("desktop.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: DesktopCatalog = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));

    let mut app_ids = BTreeSet::new();
    for app in &catalog.app {
        if !app_ids.insert(app.app_id.as_str()) {
            panic!("duplicate app id `{}` in {}", app.app_id, path.display());
        }
        if let Err(err) = validate_app(app) {
            panic!("invalid app `{}` in {}: {err}", app.app_id, path.display());
        }
    }

    let mut icon_apps = BTreeSet::new();
    for icon in &catalog.desktop_icon {
        if !app_ids.contains(icon.app_id.as_str()) {
            panic!(
                "desktop icon `{}` references unknown app in {}",
                icon.app_id,
                path.display()
            );
        }
        if !icon_apps.insert(icon.app_id.as_str()) {
            panic!(
                "duplicate desktop icon `{}` in {}",
                icon.app_id,
                path.display()
            );
        }
    }

    for (key, app_id) in shell_app_refs(&catalog.shell) {
        if !app_ids.contains(app_id.as_str()) {
            panic!("shell.{key} references unknown app `{app_id}`");
        }
    }

    let generated = format!(
        "/// Build-time generated app manifest catalog JSON.\n\
pub const APP_CATALOG_JSON: &str = r##\"{}\"##;\n\
/// Build-time generated desktop icon list JSON, in registration order.\n\
pub const DESKTOP_ICONS_JSON: &str = r##\"{}\"##;\n\
/// Build-time generated shell configuration JSON.\n\
pub const SHELL_CONFIG_JSON: &str = r##\"{}\"##;\n",
        to_json(&catalog.app, "app catalog"),
        to_json(&catalog.desktop_icon, "desktop icons"),
        to_json(&catalog.shell, "shell config"),
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("desktop_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
