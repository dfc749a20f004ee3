//! Drains the reducer effect queue through the host.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the effect executor that runs queued runtime effects in emission order.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        // Effects may dispatch; they must land in a fresh batch.
        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
