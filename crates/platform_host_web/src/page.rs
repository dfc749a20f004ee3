//! Page-level browser helpers used by the boot error screen and the desktop Refresh command.

/// Reloads the current page.
///
/// # Errors
///
/// Returns an error when no window is available or the browser refuses the reload.
pub fn reload_page() -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        window
            .location()
            .reload()
            .map_err(|e| describe_js_error(&e))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn describe_js_error(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
