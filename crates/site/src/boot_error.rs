//! Last-resort screen shown when the desktop panics.
//!
//! The hook runs after `console_error_panic_hook` has logged the panic and replaces the page body
//! with a Restart / Reset & Restart prompt. Reset forgets the saved session and window geometry
//! first, so a session that keeps crashing on boot is not replayed.

use std::sync::Once;

const MAX_DETAIL_CHARS: usize = 300;

static INSTALL: Once = Once::new();

/// Installs the console panic logger followed by the boot error screen. Idempotent.
pub fn install_boot_error_hook() {
    INSTALL.call_once(|| {
        console_error_panic_hook::set_once();
        let log_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log_panic(info);
            render_boot_error(&boot_error_detail(&info.to_string()));
        }));
    });
}

/// First line of the panic message, shortened for display.
fn boot_error_detail(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default().trim();
    if first_line.chars().count() <= MAX_DETAIL_CHARS {
        return first_line.to_string();
    }
    let mut short: String = first_line.chars().take(MAX_DETAIL_CHARS).collect();
    short.push('…');
    short
}

#[cfg(target_arch = "wasm32")]
fn render_boot_error(detail: &str) {
    use wasm_bindgen::{closure::Closure, JsCast};

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };

    let element = |tag: &str, class: &str, text: &str| {
        let node = document.create_element(tag).ok()?;
        node.set_class_name(class);
        node.set_text_content(Some(text));
        Some(node)
    };
    let button = |label: &str, action: fn() -> Result<(), String>| {
        let node = element("button", "dialog-button", label)?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()?;
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = action() {
                leptos::logging::error!("restart failed: {err}");
            }
        });
        node.set_onclick(Some(on_click.as_ref().unchecked_ref()));
        on_click.forget();
        Some(node)
    };

    let Some(screen) = element("div", "boot-error-screen", "") else {
        return;
    };
    let parts = [
        element("h1", "boot-error-title", "Portfolio OS could not start"),
        element("p", "boot-error-detail", detail),
        button("Restart", platform_host_web::reload_page).map(Into::into),
        button("Reset & Restart", reset_session_and_reload).map(Into::into),
    ];
    for part in parts.into_iter().flatten() {
        let _ = screen.append_child(&part);
    }
    body.set_inner_html("");
    let _ = body.append_child(&screen);
}

#[cfg(target_arch = "wasm32")]
fn reset_session_and_reload() -> Result<(), String> {
    leptos::spawn_local(async {
        let prefs = platform_host_web::prefs_store();
        if let Err(err) = desktop_runtime::clear_saved_state(&prefs).await {
            leptos::logging::warn!("clearing the saved session failed: {err}");
        }
        if let Err(err) = platform_host_web::reload_page() {
            leptos::logging::error!("restart failed: {err}");
        }
    });
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn render_boot_error(detail: &str) {
    leptos::logging::error!("boot error: {detail}");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn detail_keeps_the_first_line_only() {
        assert_eq!(
            boot_error_detail("panicked at src/lib.rs:1:1:\nboom\n"),
            "panicked at src/lib.rs:1:1:"
        );
    }

    #[test]
    fn long_details_are_shortened() {
        let detail = boot_error_detail(&"x".repeat(MAX_DETAIL_CHARS + 10));
        assert_eq!(detail.chars().count(), MAX_DETAIL_CHARS + 1);
        assert!(detail.ends_with('…'));
    }
}
