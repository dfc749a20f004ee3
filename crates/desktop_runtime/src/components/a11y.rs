//! DOM focus helpers and arrow-key navigation for dropdown and context menus.

use wasm_bindgen::JsCast;

const MENU_ITEM_SELECTOR: &str = r#"[role="menuitem"], [role="menuitemcheckbox"]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuStep {
    Next,
    Previous,
    First,
    Last,
}

impl MenuStep {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Self::Next),
            "ArrowUp" => Some(Self::Previous),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            _ => None,
        }
    }

    /// Index to focus among `len` items when `current` has focus.
    fn target(self, current: Option<usize>, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match (self, current) {
            (Self::First, _) | (Self::Next, None) => 0,
            (Self::Last, _) | (Self::Previous, None) => last,
            (Self::Next, Some(index)) => (index + 1) % len,
            (Self::Previous, Some(index)) => (index + len - 1) % len,
        }
    }
}

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|window| window.document())
}

pub(super) fn focus_element_by_id(id: &str) -> bool {
    let Some(element) = document()
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };
    let _ = element.focus();
    true
}

/// Enabled items of the menu container `menu_id`, in document order.
fn menu_items(menu_id: &str) -> Vec<web_sys::HtmlElement> {
    let Some(nodes) = document()
        .and_then(|document| document.get_element_by_id(menu_id))
        .and_then(|menu| menu.query_selector_all(MENU_ITEM_SELECTOR).ok())
    else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .filter(|item| item.get_attribute("aria-disabled").as_deref() != Some("true"))
        .collect()
}

pub(super) fn focus_first_menu_item(menu_id: &str) -> bool {
    match menu_items(menu_id).first() {
        Some(first) => {
            let _ = first.focus();
            true
        }
        None => false,
    }
}

/// Moves focus inside a menu for arrow, Home and End keys. Returns whether the key was used.
pub(super) fn handle_menu_roving_keydown(ev: &web_sys::KeyboardEvent, menu_id: &str) -> bool {
    let Some(step) = MenuStep::from_key(&ev.key()) else {
        return false;
    };
    let items = menu_items(menu_id);
    if items.is_empty() {
        return false;
    }

    let active = document().and_then(|document| document.active_element());
    let current = active.and_then(|active| {
        items
            .iter()
            .position(|item| AsRef::<web_sys::Element>::as_ref(item) == &active)
    });
    let _ = items[step.target(current, items.len())].focus();
    ev.prevent_default();
    ev.stop_propagation();
    true
}
