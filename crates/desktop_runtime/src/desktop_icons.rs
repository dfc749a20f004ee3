//! Desktop icon records and pointer gesture rules.

use crate::{
    apps::AppCatalog,
    dialog::InfoRow,
    model::{DesktopIconRecord, DesktopState, IconId, PendingIconClick, PointerPosition},
};

/// Builds the icon records for the catalog's desktop icon list, all unplaced.
pub fn icon_records(catalog: &AppCatalog, fallback_icon: &str) -> Vec<DesktopIconRecord> {
    catalog
        .desktop_icons()
        .iter()
        .map(|spec| DesktopIconRecord {
            id: IconId::for_app(spec.app_id),
            app_id: spec.app_id,
            title: spec.title.clone(),
            icon: catalog.icon_glyph(spec, fallback_icon),
            cell: None,
        })
        .collect()
}

/// Copies grid occupancy into the icon records.
pub fn sync_icon_cells(state: &mut DesktopState) {
    let grid = &state.grid;
    for icon in &mut state.icons {
        icon.cell = grid.cell_of(&icon.id);
    }
}

/// Whether the pointer moved far enough from `start` to count as a drag.
pub fn exceeds_drag_threshold(start: PointerPosition, now: PointerPosition, threshold: i32) -> bool {
    (now.x - start.x).abs() > threshold || (now.y - start.y).abs() > threshold
}

/// Whether a click on `icon_id` at `at_ms` completes a double click.
pub fn is_double_click(
    pending: Option<&PendingIconClick>,
    icon_id: &IconId,
    at_ms: u64,
    window_ms: u32,
) -> bool {
    pending.is_some_and(|click| {
        &click.icon_id == icon_id && at_ms.saturating_sub(click.at_ms) < u64::from(window_ms)
    })
}

/// Icon ids ordered by title, ignoring case. Ties keep registration order.
pub fn sort_by_name_order(icons: &[DesktopIconRecord]) -> Vec<IconId> {
    let mut sorted: Vec<&DesktopIconRecord> = icons.iter().collect();
    sorted.sort_by_cached_key(|icon| icon.title.to_lowercase());
    sorted.into_iter().map(|icon| icon.id.clone()).collect()
}

/// Rows of the icon Properties dialog.
pub fn icon_properties(state: &DesktopState, icon: &DesktopIconRecord) -> Vec<InfoRow> {
    let (width, height) = state
        .manifest(icon.app_id)
        .map(|m| (m.default_width, m.default_height))
        .unwrap_or((
            state.config.windows.default_width,
            state.config.windows.default_height,
        ));
    vec![
        InfoRow::new("Name", icon.title.clone()),
        InfoRow::new("Type", "Application"),
        InfoRow::new("App ID", icon.app_id.as_str()),
        InfoRow::new("Window Size", format!("{width} × {height}")),
    ]
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn records_follow_catalog_order() {
        let records = icon_records(&AppCatalog::builtin(), "?");
        assert_eq!(records.len(), AppId::ALL.len());
        assert_eq!(records[0].id, IconId("icon-portfolio".to_string()));
        assert!(records.iter().all(|r| r.cell.is_none()));
    }

    #[test]
    fn drag_threshold_is_strict() {
        let start = PointerPosition::new(100, 100);
        assert!(!exceeds_drag_threshold(start, PointerPosition::new(105, 95), 5));
        assert!(exceeds_drag_threshold(start, PointerPosition::new(106, 100), 5));
        assert!(exceeds_drag_threshold(start, PointerPosition::new(100, 94), 5));
    }

    #[test]
    fn double_click_needs_the_same_icon_inside_the_window() {
        let icon = IconId("icon-calc".to_string());
        let pending = PendingIconClick {
            icon_id: icon.clone(),
            token: 1,
            at_ms: 1_000,
        };
        assert!(is_double_click(Some(&pending), &icon, 1_200, 250));
        assert!(!is_double_click(Some(&pending), &icon, 1_250, 250));
        assert!(!is_double_click(
            Some(&pending),
            &IconId("icon-paint".to_string()),
            1_100,
            250
        ));
        assert!(!is_double_click(None, &icon, 1_100, 250));
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let make = |app: AppId, title: &str| DesktopIconRecord {
            id: IconId::for_app(app),
            app_id: app,
            title: title.to_string(),
            icon: String::new(),
            cell: None,
        };
        let icons = vec![
            make(AppId::Paint, "paint.exe"),
            make(AppId::Calc, "Calculator"),
            make(AppId::Readme, "README.TXT"),
        ];
        assert_eq!(
            sort_by_name_order(&icons),
            vec![
                IconId::for_app(AppId::Calc),
                IconId::for_app(AppId::Paint),
                IconId::for_app(AppId::Readme),
            ]
        );
    }

    #[test]
    fn properties_report_manifest_window_size() {
        let state = DesktopState::default();
        let icon = icon_records(&state.catalog, "?")
            .into_iter()
            .find(|i| i.app_id == AppId::Notepad)
            .expect("notepad icon");
        let rows = icon_properties(&state, &icon);
        assert_eq!(rows[2], InfoRow::new("App ID", "notepad"));
        assert_eq!(rows[3], InfoRow::new("Window Size", "500 × 400"));
    }
}
