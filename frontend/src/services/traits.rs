//! # Page capabilities
//!
//! The controller talks to the browser only through these traits, so tests
//! can drive it with in-memory doubles and no UI runtime.

use chrono::NaiveDateTime;
use shared::{FeedbackMessage, NotificationEvent, OrderType};
use thiserror::Error;

/// Errors from the origin-scoped key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available in this context")]
    Unavailable,

    #[error("storage rejected the operation: {0}")]
    Rejected(String),
}

/// Durable string key-value storage (localStorage in the browser)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Order-related page regions: promotion indicator, feedback slot and summary
pub trait OrderView {
    /// Show the promotion indicator, or empty it when `promotion` is `None`.
    /// `animate` plays the fade-in used for a fresh selection.
    fn show_promotion(&self, promotion: Option<&str>, animate: bool);

    fn set_clear_visible(&self, visible: bool);

    /// Replace whatever feedback is shown with `feedback`
    fn show_feedback(&self, feedback: &FeedbackMessage);

    fn clear_feedback(&self);

    fn show_summary(&self, line: &str);
}

/// Page chrome that reacts to scrolling, visibility and pointer hover
pub trait PageChrome {
    fn set_navbar_compact(&self, compact: bool);

    fn set_back_to_top_visible(&self, visible: bool);

    fn scroll_to_top(&self);

    fn card_count(&self) -> usize;

    /// Whether the browser can report card visibility
    fn observer_available(&self) -> bool;

    fn reveal_card(&self, card: usize);

    /// Stop watching a card's visibility
    fn release_card(&self, card: usize);

    fn set_order_button_shadow(&self, order_type: OrderType, shadow: bool);
}

/// The modal in which the order type is confirmed
pub trait SelectionDialog {
    /// Hide the dialog. Must tolerate a dialog that is already closed or has
    /// never been instantiated.
    fn close(&self);
}

/// Host for stacked transient notifications
pub trait Notifier {
    fn show(&self, notification: &NotificationEvent);
}

pub trait Clock {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// One-shot deferred tasks. There is no cancellation.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}
