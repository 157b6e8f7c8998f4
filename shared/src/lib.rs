use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod layout;
pub mod messages;

pub use layout::{shortcut_for, CardVisibility, RevealTracker, ScrollEffects, ScrollThresholds};

/// Storage key used for the persisted selection record
pub const PREFERENCE_KEY: &str = "selfServiceState";

/// Placeholder shown in the summary when no promotion is selected
pub const NO_PROMOTION_LABEL: &str = "Tidak Ada";

/// How the customer wants to receive the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Eat at the restaurant ("Makan di Tempat")
    DineIn,
    /// Take the order home ("Bawa Pulang")
    TakeAway,
}

impl OrderType {
    pub const ALL: [OrderType; 2] = [OrderType::DineIn, OrderType::TakeAway];

    /// Display label, also used as the persisted value
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::DineIn => "Makan di Tempat",
            OrderType::TakeAway => "Bawa Pulang",
        }
    }

    /// Parse a persisted label back into an order type
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order_type| order_type.label() == label)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two pieces of session state tracked by the order page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    promotion: Option<String>,
    order_type: Option<OrderType>,
}

impl SelectionState {
    pub fn new(promotion: Option<String>, order_type: Option<OrderType>) -> Self {
        Self { promotion, order_type }
    }

    pub fn promotion(&self) -> Option<&str> {
        self.promotion.as_deref()
    }

    pub fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    /// True when both a promotion and an order type are chosen
    pub fn is_complete(&self) -> bool {
        self.promotion.is_some() && self.order_type.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.promotion.is_none() && self.order_type.is_none()
    }

    pub fn set_promotion(&mut self, promotion: impl Into<String>) {
        self.promotion = Some(promotion.into());
    }

    /// Remove the current promotion, returning it if one was set
    pub fn take_promotion(&mut self) -> Option<String> {
        self.promotion.take()
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = Some(order_type);
    }
}

/// Errors raised while decoding or encoding the persisted record
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("persisted record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("persisted record is not a JSON object")]
    NotAnObject,

    #[error("unknown order type {0:?}")]
    UnknownOrderType(String),
}

/// Wire form of [`SelectionState`] kept in origin-scoped storage.
///
/// Mirrors the page's historical JSON shape: `{"promo": .., "orderType": ..}`
/// with explicit `null`s for unset fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedPreference {
    pub promo: Option<String>,
    #[serde(rename = "orderType")]
    pub order_type: Option<String>,
}

impl PersistedPreference {
    pub fn from_state(state: &SelectionState) -> Self {
        Self {
            promo: state.promotion().map(str::to_string),
            order_type: state.order_type().map(|order_type| order_type.label().to_string()),
        }
    }

    /// Decode a raw stored value. A missing value is the empty record.
    pub fn decode(raw: Option<&str>) -> Result<Self, PreferenceError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(PreferenceError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn encode(&self) -> Result<String, PreferenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Convert into session state. Empty strings count as unset.
    pub fn into_state(self) -> Result<SelectionState, PreferenceError> {
        let promotion = self.promo.filter(|promo| !promo.is_empty());
        let order_type = match self.order_type.filter(|label| !label.is_empty()) {
            Some(label) => Some(
                OrderType::from_label(&label).ok_or(PreferenceError::UnknownOrderType(label))?,
            ),
            None => None,
        };
        Ok(SelectionState::new(promotion, order_type))
    }
}

/// Restore session state from a raw stored value
pub fn restore_state(raw: Option<&str>) -> Result<SelectionState, PreferenceError> {
    PersistedPreference::decode(raw)?.into_state()
}

/// Severity of a feedback message or notification, matching Bootstrap's contextual names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }

    /// Classes applied to a toast body of this severity
    pub fn toast_classes(&self) -> &'static str {
        match self {
            Severity::Success => "bg-success text-white",
            Severity::Info => "bg-info text-white",
            Severity::Warning => "bg-warning",
            Severity::Danger => "bg-danger text-white",
        }
    }

    /// Classes applied to a feedback alert of this severity
    pub fn alert_classes(&self) -> String {
        format!("alert alert-{} py-2 px-3 fade show", self.as_str())
    }
}

/// A transient, auto-dismissing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub message: String,
    pub severity: Severity,
}

impl NotificationEvent {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// The single-slot outcome message for the user's last action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub message: String,
    pub severity: Severity,
}

impl FeedbackMessage {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Format a local timestamp the way id-ID renders 2-digit date and time parts
pub fn format_order_timestamp(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H.%M").to_string()
}

/// Compose the order summary line, or `None` when no order type is chosen
pub fn summary_line(state: &SelectionState, at: &NaiveDateTime) -> Option<String> {
    let order_type = state.order_type()?;
    Some(format!(
        "Tipe Pesanan: {} | Promo: {} | Waktu: {}",
        order_type,
        state.promotion().unwrap_or(NO_PROMOTION_LABEL),
        format_order_timestamp(at)
    ))
}
