//! Small web-sys helpers shared by the page components.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::services::logging::Logger;

/// First element matching `selector`, logging when the page lacks it
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    let found = document.query_selector(selector).ok().flatten();
    if found.is_none() {
        Logger::debug_with_component(
            "dom",
            &format!("No element for {}, feature disabled", selector),
        );
    }
    found
}

pub fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
    query(document, selector).and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

/// All elements matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Add or remove a single class
pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}
