use gloo::timers::callback::Timeout;
use shared::messages;
use shared::FeedbackMessage;
use web_sys::{Document, Element};

use super::dom::{query, set_class};
use crate::config::PageConfig;
use crate::services::logging::Logger;
use crate::services::traits::OrderView;

const HIDDEN: &str = "d-none";
const FADE_IN: [&str; 2] = ["animate__animated", "animate__fadeIn"];

/// The order regions of the page: promotion indicator, clear control,
/// feedback slot and summary. Missing elements are skipped silently.
pub struct OrderPanel {
    selected_promo: Option<Element>,
    clear_button: Option<Element>,
    feedback: Option<Element>,
    summary: Option<Element>,
    summary_text: Option<Element>,
    promo_animation_ms: u32,
}

impl OrderPanel {
    pub fn locate(document: &Document, config: &PageConfig) -> Self {
        let selectors = &config.selectors;
        Self {
            selected_promo: query(document, &selectors.selected_promo),
            clear_button: query(document, &selectors.clear_promo_button),
            feedback: query(document, &selectors.order_feedback),
            summary: query(document, &selectors.order_summary),
            summary_text: query(document, &selectors.order_summary_text),
            promo_animation_ms: config.promo_animation_ms,
        }
    }

    fn play_fade_in(&self, indicator: &Element) {
        let _ = indicator.class_list().add_2(FADE_IN[0], FADE_IN[1]);
        let indicator = indicator.clone();
        Timeout::new(self.promo_animation_ms, move || {
            let _ = indicator.class_list().remove_2(FADE_IN[0], FADE_IN[1]);
        })
        .forget();
    }
}

impl OrderView for OrderPanel {
    fn show_promotion(&self, promotion: Option<&str>, animate: bool) {
        let Some(indicator) = &self.selected_promo else {
            return;
        };
        let text = promotion.map(messages::promotion_indicator).unwrap_or_default();
        indicator.set_text_content(Some(&text));
        if animate {
            self.play_fade_in(indicator);
        }
    }

    fn set_clear_visible(&self, visible: bool) {
        if let Some(button) = &self.clear_button {
            set_class(button, HIDDEN, !visible);
        }
    }

    fn show_feedback(&self, feedback: &FeedbackMessage) {
        let Some(container) = &self.feedback else {
            return;
        };
        self.clear_feedback();

        let Some(document) = container.owner_document() else {
            return;
        };
        let result = document.create_element("div").and_then(|alert| {
            alert.set_class_name(&feedback.severity.alert_classes());
            alert.set_attribute("role", "alert")?;
            alert.set_text_content(Some(&feedback.message));
            container.append_child(&alert)
        });
        if let Err(e) = result {
            Logger::warn_with_component(
                "order-panel",
                &format!("Failed to show feedback: {:?}", e),
            );
        }
    }

    fn clear_feedback(&self) {
        if let Some(container) = &self.feedback {
            container.set_inner_html("");
        }
    }

    fn show_summary(&self, line: &str) {
        if let Some(summary) = &self.summary {
            set_class(summary, HIDDEN, false);
        }
        if let Some(text) = &self.summary_text {
            text.set_text_content(Some(line));
        }
    }
}
