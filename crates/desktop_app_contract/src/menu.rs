//! Window menu-bar model shared by the runtime and hosted apps.

use serde::{Deserialize, Serialize};

/// Commands a window menu item can trigger.
///
/// Serialized tokens are the camelCase variant names (`saveAs`, `goGitHub`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum MenuCommand {
    New,
    Open,
    Save,
    SaveAs,
    Close,
    About,
    HelpTopics,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Delete,
    SelectAll,
    InsertDate,
    PageSetup,
    Print,
    ToggleToolbar,
    ToggleStatusBar,
    ToggleStatus,
    ToggleColors,
    Refresh,
    Stop,
    Fullscreen,
    NewWindow,
    OpenUrl,
    AddFavorite,
    GoWiki,
    GoGoogle,
    GoGitHub,
    NewFolder,
    OpenSelected,
    CopyPath,
    Properties,
    InvertSelection,
    ViewLarge,
    ViewSmall,
    ViewList,
    ViewDetails,
    ShowHidden,
    ClearCanvas,
    ZoomIn,
    ZoomOut,
    FlipH,
    FlipV,
    Rotate90,
    Resize,
    CanvasSize,
    OpenReadme,
    OpenContact,
    ViewSource,
    NewGame,
    Pause,
    HowToPlay,
    Beginner,
    Intermediate,
    Expert,
    BestTimes,
}

impl MenuCommand {
    /// Returns the stable wire token for this command.
    pub const fn token(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::Save => "save",
            Self::SaveAs => "saveAs",
            Self::Close => "close",
            Self::About => "about",
            Self::HelpTopics => "helpTopics",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::Delete => "delete",
            Self::SelectAll => "selectAll",
            Self::InsertDate => "insertDate",
            Self::PageSetup => "pageSetup",
            Self::Print => "print",
            Self::ToggleToolbar => "toggleToolbar",
            Self::ToggleStatusBar => "toggleStatusBar",
            Self::ToggleStatus => "toggleStatus",
            Self::ToggleColors => "toggleColors",
            Self::Refresh => "refresh",
            Self::Stop => "stop",
            Self::Fullscreen => "fullscreen",
            Self::NewWindow => "newWindow",
            Self::OpenUrl => "openUrl",
            Self::AddFavorite => "addFavorite",
            Self::GoWiki => "goWiki",
            Self::GoGoogle => "goGoogle",
            Self::GoGitHub => "goGitHub",
            Self::NewFolder => "newFolder",
            Self::OpenSelected => "openSelected",
            Self::CopyPath => "copyPath",
            Self::Properties => "properties",
            Self::InvertSelection => "invertSelection",
            Self::ViewLarge => "viewLarge",
            Self::ViewSmall => "viewSmall",
            Self::ViewList => "viewList",
            Self::ViewDetails => "viewDetails",
            Self::ShowHidden => "showHidden",
            Self::ClearCanvas => "clearCanvas",
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::FlipH => "flipH",
            Self::FlipV => "flipV",
            Self::Rotate90 => "rotate90",
            Self::Resize => "resize",
            Self::CanvasSize => "canvasSize",
            Self::OpenReadme => "openReadme",
            Self::OpenContact => "openContact",
            Self::ViewSource => "viewSource",
            Self::NewGame => "newGame",
            Self::Pause => "pause",
            Self::HowToPlay => "howToPlay",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::BestTimes => "bestTimes",
        }
    }

    /// Returns `true` for commands the window manager handles itself instead of the app.
    pub const fn is_window_command(self) -> bool {
        matches!(self, Self::Close | Self::About | Self::HelpTopics)
    }
}

impl std::fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A clickable entry in a dropdown menu.
pub struct MenuItem {
    /// Visible label.
    pub label: String,
    /// Command delivered when the item is activated.
    pub command: MenuCommand,
    /// Display-only keyboard shortcut hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    /// Check mark indicator.
    #[serde(default)]
    pub checked: bool,
    /// Disabled items render greyed out and ignore activation.
    #[serde(default)]
    pub disabled: bool,
}

impl MenuItem {
    /// Creates an enabled, unchecked item without a shortcut.
    pub fn new(label: impl Into<String>, command: MenuCommand) -> Self {
        Self {
            label: label.into(),
            command,
            shortcut: None,
            checked: false,
            disabled: false,
        }
    }

    /// Sets the shortcut hint.
    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Marks the item as checked.
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Marks the item as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// One row in a dropdown menu.
pub enum MenuEntry {
    /// Visual separator; never interactive.
    Divider,
    /// Actionable item.
    Item(MenuItem),
}

impl MenuEntry {
    /// Returns the item when this entry is not a divider.
    pub fn as_item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Divider => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A named top-level menu (`File`, `Edit`, ...).
pub struct MenuSpec {
    /// Menu-bar label.
    pub name: String,
    /// Dropdown rows in display order.
    pub entries: Vec<MenuEntry>,
}

impl MenuSpec {
    /// Creates a menu from its entries.
    pub fn new(name: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Finds an enabled-or-disabled item by command.
    pub fn item(&self, command: MenuCommand) -> Option<&MenuItem> {
        self.entries
            .iter()
            .filter_map(MenuEntry::as_item)
            .find(|item| item.command == command)
    }
}

/// Menu bar used by windows that request a menu but declare none.
pub fn default_menus() -> Vec<MenuSpec> {
    use MenuCommand as C;
    use MenuEntry::{Divider, Item};

    vec![
        MenuSpec::new(
            "File",
            vec![
                Item(MenuItem::new("New", C::New).shortcut("Ctrl+N")),
                Item(MenuItem::new("Open...", C::Open).shortcut("Ctrl+O")),
                Item(MenuItem::new("Save", C::Save).shortcut("Ctrl+S")),
                Divider,
                Item(MenuItem::new("Exit", C::Close).shortcut("Alt+F4")),
            ],
        ),
        MenuSpec::new(
            "Edit",
            vec![
                Item(MenuItem::new("Undo", C::Undo).shortcut("Ctrl+Z")),
                Item(MenuItem::new("Redo", C::Redo).shortcut("Ctrl+Y")),
                Divider,
                Item(MenuItem::new("Cut", C::Cut).shortcut("Ctrl+X")),
                Item(MenuItem::new("Copy", C::Copy).shortcut("Ctrl+C")),
                Item(MenuItem::new("Paste", C::Paste).shortcut("Ctrl+V")),
                Divider,
                Item(MenuItem::new("Select All", C::SelectAll).shortcut("Ctrl+A")),
            ],
        ),
        MenuSpec::new(
            "View",
            vec![
                Item(MenuItem::new("Toolbar", C::ToggleToolbar).checked()),
                Item(MenuItem::new("Status Bar", C::ToggleStatusBar).checked()),
                Divider,
                Item(MenuItem::new("Refresh", C::Refresh).shortcut("F5")),
            ],
        ),
        MenuSpec::new(
            "Help",
            vec![
                Item(MenuItem::new("Help Topics", C::HelpTopics).shortcut("F1")),
                Divider,
                Item(MenuItem::new("About...", C::About)),
            ],
        ),
    ]
}

/// Updates check marks in the menu named `menu`.
///
/// With `exclusive`, every item in the divider-delimited group that holds one of `commands` is
/// set to checked exactly when its command is listed (radio behavior). Without it, listed items
/// have their check mark flipped. Returns `true` when the menu exists.
pub fn update_menu_checked(
    menus: &mut [MenuSpec],
    menu: &str,
    commands: &[MenuCommand],
    exclusive: bool,
) -> bool {
    let Some(spec) = menus.iter_mut().find(|spec| spec.name == menu) else {
        return false;
    };

    if !exclusive {
        for entry in &mut spec.entries {
            if let MenuEntry::Item(item) = entry {
                if commands.contains(&item.command) {
                    item.checked = !item.checked;
                }
            }
        }
        return true;
    }

    for group in spec
        .entries
        .split_mut(|entry| matches!(entry, MenuEntry::Divider))
    {
        let targeted = group.iter().any(|entry| {
            entry
                .as_item()
                .is_some_and(|item| commands.contains(&item.command))
        });
        if !targeted {
            continue;
        }
        for entry in group.iter_mut() {
            if let MenuEntry::Item(item) = entry {
                item.checked = commands.contains(&item.command);
            }
        }
    }
    true
}

/// Flips the check mark of a single item.
pub fn toggle_menu_checked(menus: &mut [MenuSpec], menu: &str, command: MenuCommand) -> bool {
    update_menu_checked(menus, menu, &[command], false)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn explorer_view_menu() -> Vec<MenuSpec> {
        use MenuEntry::{Divider, Item};
        vec![MenuSpec::new(
            "View",
            vec![
                Item(MenuItem::new("Large Icons", MenuCommand::ViewLarge)),
                Item(MenuItem::new("Small Icons", MenuCommand::ViewSmall)),
                Item(MenuItem::new("List", MenuCommand::ViewList)),
                Item(MenuItem::new("Details", MenuCommand::ViewDetails).checked()),
                Divider,
                Item(MenuItem::new("Refresh", MenuCommand::Refresh)),
                Divider,
                Item(MenuItem::new("Show Hidden Files", MenuCommand::ShowHidden).checked()),
            ],
        )]
    }

    fn checked(menus: &[MenuSpec]) -> Vec<MenuCommand> {
        menus[0]
            .entries
            .iter()
            .filter_map(MenuEntry::as_item)
            .filter(|item| item.checked)
            .map(|item| item.command)
            .collect()
    }

    #[test]
    fn exclusive_update_only_touches_the_targeted_group() {
        let mut menus = explorer_view_menu();
        assert!(update_menu_checked(
            &mut menus,
            "View",
            &[MenuCommand::ViewList],
            true
        ));
        assert_eq!(
            checked(&menus),
            vec![MenuCommand::ViewList, MenuCommand::ShowHidden]
        );
    }

    #[test]
    fn toggle_flips_a_single_item() {
        let mut menus = explorer_view_menu();
        toggle_menu_checked(&mut menus, "View", MenuCommand::ShowHidden);
        assert_eq!(checked(&menus), vec![MenuCommand::ViewDetails]);
        toggle_menu_checked(&mut menus, "View", MenuCommand::ShowHidden);
        assert_eq!(
            checked(&menus),
            vec![MenuCommand::ViewDetails, MenuCommand::ShowHidden]
        );
    }

    #[test]
    fn unknown_menu_is_reported() {
        let mut menus = explorer_view_menu();
        assert!(!update_menu_checked(
            &mut menus,
            "Image",
            &[MenuCommand::FlipH],
            true
        ));
    }

    #[test]
    fn command_tokens_match_serde_names() {
        for command in [
            MenuCommand::SaveAs,
            MenuCommand::GoGitHub,
            MenuCommand::FlipH,
            MenuCommand::Rotate90,
            MenuCommand::HelpTopics,
        ] {
            let encoded = serde_json::to_value(command).expect("serialize command");
            assert_eq!(encoded, serde_json::json!(command.token()));
        }
    }

    #[test]
    fn menu_entries_use_tagged_json_shape() {
        let raw = r#"[{"kind":"item","label":"Exit","command":"close","shortcut":"Alt+F4"},{"kind":"divider"}]"#;
        let entries: Vec<MenuEntry> = serde_json::from_str(raw).expect("parse entries");
        assert_eq!(
            entries,
            vec![
                MenuEntry::Item(MenuItem::new("Exit", MenuCommand::Close).shortcut("Alt+F4")),
                MenuEntry::Divider,
            ]
        );
    }

    #[test]
    fn window_commands_are_close_about_and_help() {
        assert!(MenuCommand::Close.is_window_command());
        assert!(MenuCommand::About.is_window_command());
        assert!(MenuCommand::HelpTopics.is_window_command());
        assert!(!MenuCommand::Refresh.is_window_command());
    }
}
