use shared::{ScrollThresholds, PREFERENCE_KEY};

/// CSS selectors for the elements the page script hooks into
#[derive(Debug, Clone, PartialEq)]
pub struct PageSelectors {
    pub promo_buttons: String,
    pub selected_promo: String,
    pub clear_promo_button: String,
    pub dine_in_button: String,
    pub take_away_button: String,
    pub order_feedback: String,
    pub order_summary: String,
    pub order_summary_text: String,
    pub selection_modal: String,
    pub toast_container: String,
    pub back_to_top: String,
    pub navbar: String,
    pub cards: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            promo_buttons: ".promo-btn".to_string(),
            selected_promo: "#selectedPromo".to_string(),
            clear_promo_button: "#clearPromoBtn".to_string(),
            dine_in_button: "#dineInBtn".to_string(),
            take_away_button: "#takeAwayBtn".to_string(),
            order_feedback: "#orderFeedback".to_string(),
            order_summary: "#orderSummary".to_string(),
            order_summary_text: "#orderSummaryText".to_string(),
            selection_modal: "#pesanModal".to_string(),
            toast_container: "#toastContainer".to_string(),
            back_to_top: "#backToTop".to_string(),
            navbar: ".navbar".to_string(),
            cards: ".card".to_string(),
        }
    }
}

/// Configuration for the order page
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// localStorage key holding the last selection
    pub storage_key: String,
    /// Auto-dismiss delay for notifications
    pub notification_delay_ms: u32,
    /// Delay before the selection modal closes after an order type is chosen
    pub dialog_close_delay_ms: u32,
    /// Length of the promotion indicator's fade-in
    pub promo_animation_ms: u32,
    pub scroll: ScrollThresholds,
    /// Fraction of a card that must be visible before it is revealed
    pub reveal_ratio: f64,
    pub selectors: PageSelectors,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            storage_key: PREFERENCE_KEY.to_string(),
            notification_delay_ms: 3500,
            dialog_close_delay_ms: 1100,
            promo_animation_ms: 800,
            scroll: ScrollThresholds::default(),
            reveal_ratio: 0.15,
            selectors: PageSelectors::default(),
        }
    }
}
