//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, per-window app
//! sessions and host bootstrap wiring. UI composition stays in [`crate::components`].

use std::rc::Rc;

use leptos::*;
use platform_host::HostServices;

use crate::{
    app_runtime::{sync_runtime_sessions, AppRuntimeState},
    apps::{builtin_shell_config, AppCatalog},
    dialog::DialogManager,
    effect_executor,
    host::DesktopHostContext,
    model::{DesktopState, InteractionState},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Long-lived reactive owner for signals that must outlive transient views.
    pub owner: Owner,
    pub state: RwSignal<DesktopState>,
    /// Pointer, menu and click-timer state.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the host.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Per-window app inboxes.
    pub app_runtime: StoredValue<AppRuntimeState>,
    pub dialogs: DialogManager,
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    let debounce_ms = runtime
        .state
        .with_untracked(|state| state.config.timing.grid_resize_debounce_ms);
    host.install_boot_hydration(runtime.dispatch);
    host.install_viewport_listener(runtime.dispatch, debounce_ms);
    effect_executor::install(runtime);
}

#[component]
/// Provides [`DesktopRuntimeContext`] and [`DialogManager`] to descendants and restores the
/// saved desktop.
pub fn DesktopProvider(
    /// Injected browser host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let config = Rc::new(builtin_shell_config());
    let catalog = Rc::new(AppCatalog::builtin());
    let host = DesktopHostContext::new(host_services, config.sound.volume);
    let viewport = host.desktop_viewport();
    logging::log!(
        "desktop runtime starting on `{}` host at {}x{}",
        host.host_strategy_name(),
        viewport.width,
        viewport.height
    );

    let host = store_value(host);
    let owner = Owner::current().expect("DesktopProvider owner");
    let state = create_rw_signal(DesktopState::new(config, catalog, viewport));
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let app_runtime = store_value(AppRuntimeState::default());
    let dialogs = DialogManager::new();

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop.windows != previous_desktop.windows {
                    sync_runtime_sessions(app_runtime, &desktop.windows);
                }
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        owner,
        state,
        interaction,
        effects,
        app_runtime,
        dialogs,
        dispatch,
    };

    provide_context(runtime);
    provide_context(dialogs);

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
