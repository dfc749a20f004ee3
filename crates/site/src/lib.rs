mod boot_error;
mod web_app;

pub use boot_error::install_boot_error_hook;
pub use web_app::{DesktopEntry, SiteApp};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    install_boot_error_hook();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
