//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{update_menu_checked, AppCommand, AppId, AppMenuEvent, MenuCommand};
use leptos::logging;
use thiserror::Error;

use crate::{
    desktop_icons::{
        exceeds_drag_threshold, icon_properties, is_double_click, sort_by_name_order,
        sync_icon_cells,
    },
    dialog::InfoRow,
    grid::GridError,
    model::{
        AboutInfo, ContextMenuCommand, ContextMenuState, ContextMenuTarget, DesktopState,
        DragSession, GridCell, IconDragSession, IconId, IconPositionMap, InteractionState,
        OpenMenu, OpenWindowEntry, PendingIconClick, PointerPosition, ResizeSession, Viewport,
        WindowGeometryMap, WindowId, WindowOptions, WindowRecord,
    },
    sound::SoundCue,
    window_manager::{
        bring_to_front, build_window_record, clamp_drag, initial_rect, next_window_id,
        persisted_rect, resize_from, toggle_maximize, top_visible_window,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an app, or surface the existing one.
    CreateWindow {
        app_id: AppId,
        options: WindowOptions,
    },
    /// Close a window (subject to the repeated-close overlay).
    CloseWindow { window_id: WindowId },
    /// Drop a window whose close animation finished.
    FinishClosing { window_id: WindowId },
    /// Clear the opening animation flag.
    FinishOpening { window_id: WindowId },
    /// Raise and focus a window.
    FocusWindow { window_id: WindowId },
    /// Remove focus from every window (bare desktop click).
    DeactivateAll,
    MinimizeWindow { window_id: WindowId },
    RestoreWindow { window_id: WindowId },
    ToggleMaximize { window_id: WindowId },
    /// Taskbar entry click: restore, minimize or focus depending on current state.
    ToggleTaskbarWindow { window_id: WindowId },
    ToggleStartMenu,
    CloseStartMenu,
    BeginDrag {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    UpdateDrag { pointer: PointerPosition },
    EndDrag,
    BeginResize {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    UpdateResize { pointer: PointerPosition },
    EndResize,
    /// Open a menu-bar dropdown, or close it if it is already open.
    ToggleMenu { window_id: WindowId, menu: String },
    /// Switch dropdowns while one is open.
    HoverMenu { window_id: WindowId, menu: String },
    CloseMenus,
    ActivateMenuItem {
        window_id: WindowId,
        menu: String,
        command: MenuCommand,
    },
    /// Request sent by the app hosted in `window_id`.
    ApplyAppCommand {
        window_id: WindowId,
        command: AppCommand,
    },
    CloseAbout,
    /// Allow the fatal-error overlay to be dismissed.
    ArmFatalError,
    DismissFatalError,
    /// Seed remembered window geometry from storage.
    HydrateGeometry { geometry: WindowGeometryMap },
    /// Lay the desktop icons out using saved positions.
    HydrateIconPositions { positions: IconPositionMap },
    /// Reopen a saved session, or launch the default app when nothing could be restored.
    RestoreSession { entries: Vec<OpenWindowEntry> },
    IconPointerDown {
        icon_id: IconId,
        pointer: PointerPosition,
    },
    IconPointerMove { pointer: PointerPosition },
    IconPointerUp { pointer: PointerPosition },
    IconPointerCancel,
    /// Click on an icon at a monotonic timestamp in ms.
    IconClick { icon_id: IconId, at_ms: u64 },
    /// Double-click window for a pending single click elapsed.
    ResolveIconClick { token: u64 },
    /// Open the app behind an icon.
    ActivateIcon { icon_id: IconId },
    SelectIcon { icon_id: IconId },
    ClearSelection,
    OpenContextMenu {
        target: ContextMenuTarget,
        position: PointerPosition,
    },
    CloseContextMenu,
    RunContextMenuCommand { command: ContextMenuCommand },
    AutoArrange,
    SortByName,
    PlaceIcon { icon_id: IconId, cell: GridCell },
    ViewportResized { viewport: Viewport },
    ToggleSound,
    /// Play a cue if sound is enabled.
    PlayCue { cue: SoundCue },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute in order.
pub enum RuntimeEffect {
    /// Save the open-window list as it is when the effect runs.
    PersistOpenWindows,
    PersistWindowGeometry,
    PersistIconPositions,
    PlaySound(SoundCue),
    /// Run the app module's init hook.
    InitApp { window_id: WindowId, app_id: AppId },
    /// Run the app module's close hook.
    CloseApp { window_id: WindowId, app_id: AppId },
    /// Hand a menu command to the app hosted in the window.
    DeliverMenuCommand { app_id: AppId, event: AppMenuEvent },
    /// Dispatch `action` after `delay_ms`.
    Schedule {
        delay_ms: u32,
        action: Box<DesktopAction>,
    },
    ShowInfoDialog { title: String, rows: Vec<InfoRow> },
    ReloadPage,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference missing state.
pub enum ReducerError {
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    #[error("no manifest for app `{0}`")]
    UnknownApp(AppId),
    #[error("desktop icon `{0}` not found")]
    IconNotFound(IconId),
    #[error("cell ({row}, {col}) is outside the desktop grid")]
    CellOutOfBounds { row: usize, col: usize },
}

impl From<GridError> for ReducerError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnknownIcon(icon_id) => Self::IconNotFound(icon_id),
            GridError::OutOfBounds { row, col, .. } => Self::CellOutOfBounds { row, col },
        }
    }
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// # Errors
///
/// Returns a [`ReducerError`] when an action references a window, app or icon that does not
/// exist. State is left consistent; the caller logs and drops the action.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::CreateWindow { app_id, options } => {
            create_window(state, interaction, app_id, options, &mut effects)?;
        }
        DesktopAction::CloseWindow { window_id } => {
            close_window(state, interaction, &window_id, &mut effects)?;
        }
        DesktopAction::FinishClosing { window_id } => {
            state.closing.retain(|w| w.id != window_id);
        }
        DesktopAction::FinishOpening { window_id } => {
            if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
                window.opening = false;
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            interaction.context_menu = None;
            if focus(state, &window_id)? {
                effects.push(RuntimeEffect::PersistOpenWindows);
            }
        }
        DesktopAction::DeactivateAll => {
            state.focused = None;
            interaction.open_menu = None;
            interaction.start_menu_open = false;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = window_mut(state, &window_id)?;
            window.minimized = true;
            if state.is_focused(&window_id) {
                state.focused = None;
            }
            forget_window_sessions(interaction, &window_id);
            effects.push(RuntimeEffect::PersistOpenWindows);
        }
        DesktopAction::RestoreWindow { window_id } => {
            window_mut(state, &window_id)?.minimized = false;
            focus(state, &window_id)?;
            effects.push(RuntimeEffect::PersistOpenWindows);
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let work_area = state.viewport.work_area(state.config.taskbar_height);
            toggle_maximize(window_mut(state, &window_id)?, work_area);
            forget_window_sessions(interaction, &window_id);
            focus(state, &window_id)?;
            effects.push(RuntimeEffect::PersistOpenWindows);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let minimized = window_mut(state, &window_id)?.minimized;
            let next = if minimized {
                DesktopAction::RestoreWindow { window_id }
            } else if state.is_focused(&window_id) {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            nested(state, interaction, next, &mut effects)?;
        }
        DesktopAction::ToggleStartMenu => {
            interaction.start_menu_open = !interaction.start_menu_open;
            interaction.open_menu = None;
            interaction.context_menu = None;
            play(state, &mut effects, SoundCue::Click);
        }
        DesktopAction::CloseStartMenu => {
            interaction.start_menu_open = false;
        }
        DesktopAction::BeginDrag { window_id, pointer } => {
            let window = window_mut(state, &window_id)?;
            if window.can_drag() {
                let rect_start = window.rect;
                focus(state, &window_id)?;
                interaction.open_menu = None;
                interaction.dragging = Some(DragSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateDrag { pointer } => {
            if let Some(session) = interaction.dragging.clone() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let moved = clamp_drag(
                    session.rect_start.offset(dx, dy),
                    state.viewport,
                    &state.config,
                );
                match state.windows.iter_mut().find(|w| w.id == session.window_id) {
                    Some(window) if window.can_drag() => window.rect = moved,
                    Some(_) => {}
                    None => interaction.dragging = None,
                }
            }
        }
        DesktopAction::EndDrag => {
            if let Some(session) = interaction.dragging.take() {
                if remember_geometry(state, &session.window_id) {
                    effects.push(RuntimeEffect::PersistWindowGeometry);
                }
            }
        }
        DesktopAction::BeginResize { window_id, pointer } => {
            let window = window_mut(state, &window_id)?;
            if window.can_resize() {
                let rect_start = window.rect;
                focus(state, &window_id)?;
                interaction.open_menu = None;
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.clone() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                match state.windows.iter_mut().find(|w| w.id == session.window_id) {
                    Some(window) if window.can_resize() => {
                        window.rect = resize_from(
                            session.rect_start,
                            dx,
                            dy,
                            window.min_width,
                            window.min_height,
                        );
                    }
                    Some(_) => {}
                    None => interaction.resizing = None,
                }
            }
        }
        DesktopAction::EndResize => {
            if let Some(session) = interaction.resizing.take() {
                if remember_geometry(state, &session.window_id) {
                    effects.push(RuntimeEffect::PersistWindowGeometry);
                }
            }
        }
        DesktopAction::ToggleMenu { window_id, menu } => {
            let window = window_mut(state, &window_id)?;
            if window.menus.iter().any(|spec| spec.name == menu) {
                let target = OpenMenu { window_id, menu };
                interaction.open_menu = if interaction.open_menu.as_ref() == Some(&target) {
                    None
                } else {
                    Some(target)
                };
            }
        }
        DesktopAction::HoverMenu { window_id, menu } => {
            let switchable = interaction
                .open_menu
                .as_ref()
                .is_some_and(|open| open.window_id == window_id && open.menu != menu);
            let known = state
                .window(&window_id)
                .is_some_and(|w| w.menus.iter().any(|spec| spec.name == menu));
            if switchable && known {
                interaction.open_menu = Some(OpenMenu { window_id, menu });
            }
        }
        DesktopAction::CloseMenus => {
            interaction.open_menu = None;
        }
        DesktopAction::ActivateMenuItem {
            window_id,
            menu,
            command,
        } => {
            activate_menu_item(state, interaction, window_id, menu, command, &mut effects)?;
        }
        DesktopAction::ApplyAppCommand { window_id, command } => {
            apply_app_command(state, interaction, window_id, command, &mut effects)?;
        }
        DesktopAction::CloseAbout => {
            state.about = None;
        }
        DesktopAction::ArmFatalError => {
            if state.fatal_error.visible {
                state.fatal_error.armed = true;
            }
        }
        DesktopAction::DismissFatalError => {
            if state.fatal_error.visible && state.fatal_error.armed {
                state.fatal_error = Default::default();
            }
        }
        DesktopAction::HydrateGeometry { geometry } => {
            state.geometry = geometry;
        }
        DesktopAction::HydrateIconPositions { positions } => {
            let ids: Vec<IconId> = state.icons.iter().map(|icon| icon.id.clone()).collect();
            state.grid.register_icons(&ids, &positions);
            sync_icon_cells(state);
        }
        DesktopAction::RestoreSession { entries } => {
            let restored = restore_session(state, interaction, entries, &mut effects)?;
            if !restored {
                let launch = state.config.launch;
                nested(
                    state,
                    interaction,
                    DesktopAction::CreateWindow {
                        app_id: launch.app,
                        options: WindowOptions::at(launch.x, launch.y),
                    },
                    &mut effects,
                )?;
            }
        }
        DesktopAction::IconPointerDown { icon_id, pointer } => {
            if state.icon(&icon_id).is_none() {
                return Err(ReducerError::IconNotFound(icon_id));
            }
            let origin = state
                .grid
                .cell_of(&icon_id)
                .map(|cell| state.grid.position_from_cell(cell))
                .unwrap_or(pointer);
            interaction.context_menu = None;
            // Touch drags end without a trailing click; each gesture starts unsuppressed.
            interaction.suppress_icon_click = false;
            interaction.icon_drag = Some(IconDragSession {
                icon_id,
                pointer_start: pointer,
                pointer,
                grab_offset: PointerPosition::new(pointer.x - origin.x, pointer.y - origin.y),
                active: false,
                preview: None,
            });
        }
        DesktopAction::IconPointerMove { pointer } => {
            let threshold = state.config.input.drag_threshold_px;
            if let Some(session) = interaction.icon_drag.as_mut() {
                session.pointer = pointer;
                if !session.active
                    && exceeds_drag_threshold(session.pointer_start, pointer, threshold)
                {
                    session.active = true;
                }
                if session.active {
                    session.preview = Some(state.grid.cell_from_position(pointer));
                }
            }
        }
        DesktopAction::IconPointerUp { pointer } => {
            if let Some(session) = interaction.icon_drag.take() {
                if session.active {
                    interaction.suppress_icon_click = true;
                    interaction.pending_click = None;
                    let cell = state.grid.cell_from_position(pointer);
                    state.grid.place_icon(&session.icon_id, cell)?;
                    sync_icon_cells(state);
                    play(state, &mut effects, SoundCue::Click);
                    effects.push(RuntimeEffect::PersistIconPositions);
                }
            }
        }
        DesktopAction::IconPointerCancel => {
            interaction.icon_drag = None;
        }
        DesktopAction::IconClick { icon_id, at_ms } => {
            if std::mem::take(&mut interaction.suppress_icon_click) {
                return Ok(effects);
            }
            if state.icon(&icon_id).is_none() {
                return Err(ReducerError::IconNotFound(icon_id));
            }
            let window_ms = state.config.input.double_click_ms;
            if is_double_click(interaction.pending_click.as_ref(), &icon_id, at_ms, window_ms) {
                interaction.pending_click = None;
                nested(
                    state,
                    interaction,
                    DesktopAction::ActivateIcon { icon_id },
                    &mut effects,
                )?;
            } else {
                interaction.next_click_token += 1;
                let token = interaction.next_click_token;
                interaction.pending_click = Some(PendingIconClick {
                    icon_id,
                    token,
                    at_ms,
                });
                effects.push(RuntimeEffect::Schedule {
                    delay_ms: window_ms,
                    action: Box::new(DesktopAction::ResolveIconClick { token }),
                });
            }
        }
        DesktopAction::ResolveIconClick { token } => {
            let due = interaction
                .pending_click
                .as_ref()
                .is_some_and(|click| click.token == token);
            if due {
                if let Some(click) = interaction.pending_click.take() {
                    nested(
                        state,
                        interaction,
                        DesktopAction::SelectIcon {
                            icon_id: click.icon_id,
                        },
                        &mut effects,
                    )?;
                }
            }
        }
        DesktopAction::ActivateIcon { icon_id } => {
            let app_id = state
                .icon(&icon_id)
                .map(|icon| icon.app_id)
                .ok_or_else(|| ReducerError::IconNotFound(icon_id.clone()))?;
            interaction.context_menu = None;
            nested(
                state,
                interaction,
                DesktopAction::CreateWindow {
                    app_id,
                    options: WindowOptions::default(),
                },
                &mut effects,
            )?;
        }
        DesktopAction::SelectIcon { icon_id } => {
            if state.icon(&icon_id).is_none() {
                return Err(ReducerError::IconNotFound(icon_id));
            }
            state.selected_icon = Some(icon_id);
            play(state, &mut effects, SoundCue::Click);
        }
        DesktopAction::ClearSelection => {
            state.selected_icon = None;
            interaction.pending_click = None;
        }
        DesktopAction::OpenContextMenu { target, position } => {
            if let ContextMenuTarget::Icon(icon_id) = &target {
                nested(
                    state,
                    interaction,
                    DesktopAction::SelectIcon {
                        icon_id: icon_id.clone(),
                    },
                    &mut effects,
                )?;
            }
            interaction.open_menu = None;
            interaction.start_menu_open = false;
            interaction.context_menu = Some(ContextMenuState { target, position });
        }
        DesktopAction::CloseContextMenu => {
            interaction.context_menu = None;
        }
        DesktopAction::RunContextMenuCommand { command } => {
            if let Some(menu) = interaction.context_menu.take() {
                run_context_command(state, interaction, menu.target, command, &mut effects)?;
            }
        }
        DesktopAction::AutoArrange => {
            state.grid.auto_arrange();
            sync_icon_cells(state);
            effects.push(RuntimeEffect::PersistIconPositions);
        }
        DesktopAction::SortByName => {
            let order = sort_by_name_order(&state.icons);
            state.grid.arrange(&order);
            sync_icon_cells(state);
            effects.push(RuntimeEffect::PersistIconPositions);
        }
        DesktopAction::PlaceIcon { icon_id, cell } => {
            state.grid.place_icon(&icon_id, cell)?;
            sync_icon_cells(state);
            effects.push(RuntimeEffect::PersistIconPositions);
        }
        DesktopAction::ViewportResized { viewport } => {
            state.viewport = viewport;
            let work_area = viewport.work_area(state.config.taskbar_height);
            for window in state.windows.iter_mut().filter(|w| w.maximized) {
                window.rect = work_area;
            }
            if state.grid.resize(viewport) {
                sync_icon_cells(state);
                effects.push(RuntimeEffect::PersistIconPositions);
            }
        }
        DesktopAction::ToggleSound => {
            state.sound_enabled = !state.sound_enabled;
            play(state, &mut effects, SoundCue::Click);
        }
        DesktopAction::PlayCue { cue } => {
            play(state, &mut effects, cue);
        }
    }

    Ok(coalesce_persist_effects(effects))
}

/// Replays saved open windows bottom to top. Returns whether any window was restored.
///
/// Entries naming unknown apps are skipped with a warning.
///
/// # Errors
///
/// Propagates reducer errors from the replayed actions.
pub fn restore_session(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    mut entries: Vec<OpenWindowEntry>,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    entries.sort_by_key(|entry| entry.z_index);
    let mut restored = false;
    for entry in entries {
        let app_id = match entry.id.as_str().parse::<AppId>() {
            Ok(app_id) => app_id,
            Err(err) => {
                logging::warn!("skipping saved window: {err}");
                continue;
            }
        };
        if state.manifest(app_id).is_none() || state.window(&entry.id).is_some() {
            continue;
        }
        nested(
            state,
            interaction,
            DesktopAction::CreateWindow {
                app_id,
                options: WindowOptions::default(),
            },
            effects,
        )?;
        // A window can be saved both maximized and minimized; maximize first.
        if entry.maximized {
            nested(
                state,
                interaction,
                DesktopAction::ToggleMaximize {
                    window_id: entry.id.clone(),
                },
                effects,
            )?;
        }
        if entry.minimized {
            nested(
                state,
                interaction,
                DesktopAction::MinimizeWindow { window_id: entry.id },
                effects,
            )?;
        }
        restored = true;
    }
    Ok(restored)
}

fn create_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    app_id: AppId,
    options: WindowOptions,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    interaction.context_menu = None;
    interaction.start_menu_open = false;
    let primary = WindowId::for_app(app_id);
    if !options.allow_multiple {
        if let Some(window) = state.windows.iter_mut().find(|w| w.id == primary) {
            let was_minimized = std::mem::replace(&mut window.minimized, false);
            let raised = focus(state, &primary)?;
            if was_minimized || raised {
                effects.push(RuntimeEffect::PersistOpenWindows);
            }
            return Ok(());
        }
    }

    let manifest = state
        .manifest(app_id)
        .cloned()
        .ok_or(ReducerError::UnknownApp(app_id))?;
    let (window_id, transient) = next_window_id(state, app_id, options.allow_multiple);
    let saved = if transient {
        None
    } else {
        state.geometry.get(&window_id).copied()
    };
    let rect = initial_rect(
        &state.config.windows,
        &manifest,
        saved,
        &options,
        state.windows.len(),
    );
    let record = build_window_record(window_id.clone(), &manifest, rect, options.title, transient);
    state.windows.push(record);
    focus(state, &window_id)?;

    effects.push(RuntimeEffect::InitApp {
        window_id: window_id.clone(),
        app_id,
    });
    play(state, effects, SoundCue::Open);
    effects.push(RuntimeEffect::PersistOpenWindows);
    effects.push(RuntimeEffect::Schedule {
        delay_ms: state.config.timing.opening_ms,
        action: Box::new(DesktopAction::FinishOpening { window_id }),
    });
    Ok(())
}

fn close_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let index = state
        .windows
        .iter()
        .position(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;

    let fatal = state.config.fatal_close;
    if state.windows[index].app_id == fatal.app {
        state.fatal_error.close_attempts += 1;
        if state.fatal_error.close_attempts >= fatal.threshold {
            state.fatal_error.visible = true;
            state.fatal_error.armed = false;
            forget_window_sessions(interaction, window_id);
            play(state, effects, SoundCue::Error);
            effects.push(RuntimeEffect::Schedule {
                delay_ms: state.config.timing.fatal_arm_ms,
                action: Box::new(DesktopAction::ArmFatalError),
            });
            return Ok(());
        }
    }

    let mut record = state.windows.remove(index);
    record.opening = false;
    let app_id = record.app_id;
    state.closing.push(record);
    forget_window_sessions(interaction, window_id);
    if state.about.as_ref().is_some_and(|about| &about.window_id == window_id) {
        state.about = None;
    }
    if state.is_focused(window_id) {
        state.focused = None;
        if let Some(next) = top_visible_window(state) {
            focus(state, &next)?;
        }
    }

    effects.push(RuntimeEffect::CloseApp {
        window_id: window_id.clone(),
        app_id,
    });
    play(state, effects, SoundCue::Close);
    effects.push(RuntimeEffect::Schedule {
        delay_ms: state.config.timing.closing_ms,
        action: Box::new(DesktopAction::FinishClosing {
            window_id: window_id.clone(),
        }),
    });
    effects.push(RuntimeEffect::PersistOpenWindows);
    Ok(())
}

fn activate_menu_item(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: WindowId,
    menu: String,
    command: MenuCommand,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let window = window_mut(state, &window_id)?;
    let enabled = window
        .menus
        .iter()
        .find(|spec| spec.name == menu)
        .and_then(|spec| spec.item(command))
        .is_some_and(|item| !item.disabled);
    interaction.open_menu = None;
    if !enabled {
        return Ok(());
    }
    let app_id = window.app_id;
    let about = AboutInfo {
        window_id: window_id.clone(),
        title: window.title.clone(),
        icon: window.icon.clone(),
    };

    play(state, effects, SoundCue::Click);
    match command {
        MenuCommand::Close => {
            nested(
                state,
                interaction,
                DesktopAction::CloseWindow { window_id },
                effects,
            )?;
        }
        MenuCommand::About => {
            state.about = if state.about.as_ref() == Some(&about) {
                None
            } else {
                Some(about)
            };
        }
        MenuCommand::HelpTopics => {
            let help_app = state.config.help_app;
            nested(
                state,
                interaction,
                DesktopAction::CreateWindow {
                    app_id: help_app,
                    options: WindowOptions::default(),
                },
                effects,
            )?;
        }
        _ => effects.push(RuntimeEffect::DeliverMenuCommand {
            app_id,
            event: AppMenuEvent {
                window_id: window_id.0,
                menu,
                command,
            },
        }),
    }
    Ok(())
}

fn apply_app_command(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: WindowId,
    command: AppCommand,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let window = window_mut(state, &window_id)?;
    match command {
        AppCommand::SetWindowTitle { title } => {
            window.title = title;
        }
        AppCommand::SetMenuChecked {
            menu,
            commands,
            exclusive,
        } => {
            if !update_menu_checked(&mut window.menus, &menu, &commands, exclusive) {
                logging::warn!("window `{window_id}` has no menu `{menu}`");
            }
        }
        AppCommand::OpenApp { app_id } => {
            nested(
                state,
                interaction,
                DesktopAction::CreateWindow {
                    app_id,
                    options: WindowOptions::default(),
                },
                effects,
            )?;
        }
        AppCommand::CloseWindow => {
            nested(
                state,
                interaction,
                DesktopAction::CloseWindow { window_id },
                effects,
            )?;
        }
    }
    Ok(())
}

fn run_context_command(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    target: ContextMenuTarget,
    command: ContextMenuCommand,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let next = match (command, target) {
        (ContextMenuCommand::Open, ContextMenuTarget::Icon(icon_id)) => {
            DesktopAction::ActivateIcon { icon_id }
        }
        (ContextMenuCommand::Properties, ContextMenuTarget::Icon(icon_id)) => {
            let icon = state
                .icon(&icon_id)
                .ok_or_else(|| ReducerError::IconNotFound(icon_id.clone()))?;
            effects.push(RuntimeEffect::ShowInfoDialog {
                title: "Properties".to_string(),
                rows: icon_properties(state, icon),
            });
            return Ok(());
        }
        (ContextMenuCommand::Refresh, _) => {
            effects.push(RuntimeEffect::ReloadPage);
            return Ok(());
        }
        (ContextMenuCommand::AutoArrange, _) => DesktopAction::AutoArrange,
        (ContextMenuCommand::SortByName, _) => DesktopAction::SortByName,
        (ContextMenuCommand::Settings, _) => DesktopAction::CreateWindow {
            app_id: AppId::Control,
            options: WindowOptions::default(),
        },
        (ContextMenuCommand::SystemInfo, _) => DesktopAction::CreateWindow {
            app_id: AppId::SysInfo,
            options: WindowOptions::default(),
        },
        (ContextMenuCommand::Open | ContextMenuCommand::Properties, ContextMenuTarget::Desktop) => {
            return Ok(());
        }
    };
    nested(state, interaction, next, effects)
}

fn nested(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    effects.extend(reduce_desktop(state, interaction, action)?);
    Ok(())
}

fn window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

fn focus(state: &mut DesktopState, window_id: &WindowId) -> Result<bool, ReducerError> {
    bring_to_front(state, window_id).ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

/// Records the window's current geometry. Extra instances are never remembered.
fn remember_geometry(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.window(window_id) else {
        return false;
    };
    if window.transient {
        return false;
    }
    let rect = persisted_rect(window);
    state.geometry.insert(window_id.clone(), rect);
    true
}

fn forget_window_sessions(interaction: &mut InteractionState, window_id: &WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.resizing = None;
    }
    if interaction
        .open_menu
        .as_ref()
        .is_some_and(|m| &m.window_id == window_id)
    {
        interaction.open_menu = None;
    }
}

fn play(state: &DesktopState, effects: &mut Vec<RuntimeEffect>, cue: SoundCue) {
    if state.sound_enabled {
        effects.push(RuntimeEffect::PlaySound(cue));
    }
}

/// Persist effects read state when they run, so repeats within one batch are redundant.
fn coalesce_persist_effects(effects: Vec<RuntimeEffect>) -> Vec<RuntimeEffect> {
    let mut out: Vec<RuntimeEffect> = Vec::with_capacity(effects.len());
    for effect in effects {
        let persist = matches!(
            effect,
            RuntimeEffect::PersistOpenWindows
                | RuntimeEffect::PersistWindowGeometry
                | RuntimeEffect::PersistIconPositions
        );
        if persist && out.contains(&effect) {
            continue;
        }
        out.push(effect);
    }
    out
}
