//! User-facing text for the order page.

use crate::{FeedbackMessage, NotificationEvent, OrderType, Severity};

/// Text of the promotion indicator shown next to the order controls
pub fn promotion_indicator(promotion: &str) -> String {
    format!("Promo dipilih: {}", promotion)
}

pub fn promotion_selected(promotion: &str) -> NotificationEvent {
    NotificationEvent::new(promotion_indicator(promotion), Severity::Info)
}

pub fn promotion_removed_feedback(promotion: &str) -> FeedbackMessage {
    FeedbackMessage::new(format!("Promo \"{}\" dihapus.", promotion), Severity::Warning)
}

pub fn promotion_removed() -> NotificationEvent {
    NotificationEvent::new("Promo dihapus", Severity::Warning)
}

pub fn order_type_feedback(order_type: OrderType, promotion: Option<&str>) -> FeedbackMessage {
    let with_promo = promotion
        .map(|promo| format!(" dengan promo \"{}\"", promo))
        .unwrap_or_default();
    FeedbackMessage::new(
        format!("Anda memilih: {}{}.", order_type, with_promo),
        Severity::Success,
    )
}

pub fn order_type_chosen(order_type: OrderType, promotion: Option<&str>) -> NotificationEvent {
    let with_promo = promotion
        .map(|promo| format!(" + Promo: {}", promo))
        .unwrap_or_default();
    NotificationEvent::new(format!("Pesanan: {}{}", order_type, with_promo), Severity::Success)
}
