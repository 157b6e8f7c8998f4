use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use shared::NotificationEvent;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::dom::query;
use crate::config::PageConfig;
use crate::services::bootstrap::{call_method, component_class, get_or_create_instance, options};
use crate::services::logging::Logger;
use crate::services::traits::Notifier;

/// Stacks dismissible Bootstrap toasts in the page's toast container
pub struct ToastHost {
    container: Option<Element>,
    delay_ms: u32,
}

impl ToastHost {
    pub fn locate(document: &Document, config: &PageConfig) -> Self {
        Self {
            container: query(document, &config.selectors.toast_container),
            delay_ms: config.notification_delay_ms,
        }
    }

    fn build(document: &Document, notification: &NotificationEvent) -> Result<Element, JsValue> {
        let wrapper = document.create_element("div")?;
        wrapper.set_class_name("toast align-items-center show border-0 mb-2");
        wrapper.set_attribute("role", "alert")?;
        wrapper.set_attribute("aria-live", "assertive")?;
        wrapper.set_attribute("aria-atomic", "true")?;

        let body = document.create_element("div")?;
        let severity = notification.severity.toast_classes();
        body.set_class_name(&format!("toast-body {} rounded", severity));
        body.set_text_content(Some(&notification.message));

        let close = document.create_element("button")?;
        close.set_attribute("type", "button")?;
        close.set_class_name("btn-close btn-close-white ms-2 float-end");
        close.set_attribute("data-bs-dismiss", "toast")?;
        close.set_attribute("aria-label", "Close")?;

        body.append_child(&close)?;
        wrapper.append_child(&body)?;
        Ok(wrapper)
    }

    /// Hand the toast to `bootstrap.Toast`; without the bundle, remove it on a timer
    fn start(&self, wrapper: Element) -> Result<(), JsValue> {
        let Some(class) = component_class("Toast") else {
            Timeout::new(self.delay_ms, move || wrapper.remove()).forget();
            return Ok(());
        };

        let toast_options = options(&[("delay", JsValue::from(self.delay_ms))])?;
        let toast = get_or_create_instance(&class, &wrapper, &toast_options)?;
        remove_when_hidden(&wrapper);
        call_method(&toast, "show")
    }
}

/// Detach the toast once Bootstrap reports it hidden
fn remove_when_hidden(wrapper: &Element) {
    let toast = wrapper.clone();
    EventListener::once(wrapper, "hidden.bs.toast", move |_| toast.remove()).forget();
}

impl Notifier for ToastHost {
    fn show(&self, notification: &NotificationEvent) {
        let Some(container) = &self.container else {
            return;
        };
        let Some(document) = container.owner_document() else {
            return;
        };

        let result = Self::build(&document, notification).and_then(|wrapper| {
            container.append_child(&wrapper)?;
            self.start(wrapper)
        });
        if let Err(e) = result {
            Logger::warn_with_component(
                "toast-host",
                &format!("Failed to show notification: {:?}", e),
            );
        }
    }
}
