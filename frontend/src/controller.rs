use std::rc::Rc;

use shared::messages;
use shared::{
    restore_state, summary_line, CardVisibility, OrderType, PersistedPreference, RevealTracker,
    ScrollEffects, SelectionState,
};

use crate::config::PageConfig;
use crate::services::logging::Logger;
use crate::services::traits::{
    Clock, KeyValueStore, Notifier, OrderView, PageChrome, Scheduler, SelectionDialog,
};

const COMPONENT: &str = "order-controller";

/// Everything the controller needs from the page
pub struct PageHandles {
    pub store: Box<dyn KeyValueStore>,
    pub view: Box<dyn OrderView>,
    pub chrome: Box<dyn PageChrome>,
    pub dialog: Rc<dyn SelectionDialog>,
    pub notifier: Box<dyn Notifier>,
    pub clock: Box<dyn Clock>,
    pub scheduler: Box<dyn Scheduler>,
}

/// Page events routed to the controller by the subscription table
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    PromotionChosen(String),
    PromotionCleared,
    OrderTypeChosen(OrderType),
    DialogShown,
    Scrolled(f64),
    BackToTop,
    PointerEntered(OrderType),
    PointerLeft(OrderType),
    CardsIntersected(Vec<CardVisibility>),
}

/// Owns the selection state of the order page and everything derived from it.
///
/// State is private and every mutation writes through to the store before
/// the handler returns, so the persisted record never lags behind.
pub struct OrderSelectionController {
    state: SelectionState,
    reveal: RevealTracker,
    config: PageConfig,
    handles: PageHandles,
}

impl OrderSelectionController {
    pub fn new(config: PageConfig, handles: PageHandles) -> Self {
        Self {
            state: SelectionState::default(),
            reveal: RevealTracker::new(),
            config,
            handles,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Restore the previous session and reveal cards up front when the
    /// browser cannot report their visibility.
    pub fn start(&mut self) {
        self.restore();

        if !self.handles.chrome.observer_available() {
            let count = self.handles.chrome.card_count();
            Logger::debug_with_component(
                COMPONENT,
                &format!("IntersectionObserver unavailable, revealing {} cards", count),
            );
            for card in 0..count {
                if self.reveal.mark(card) {
                    self.handles.chrome.reveal_card(card);
                }
            }
        }
    }

    pub fn handle(&mut self, event: PageEvent) {
        match event {
            PageEvent::PromotionChosen(promotion) => self.select_promotion(&promotion),
            PageEvent::PromotionCleared => self.clear_promotion(),
            PageEvent::OrderTypeChosen(order_type) => self.choose_order_type(order_type),
            PageEvent::DialogShown => self.on_dialog_shown(),
            PageEvent::Scrolled(offset) => self.on_scroll(offset),
            PageEvent::BackToTop => self.handles.chrome.scroll_to_top(),
            PageEvent::PointerEntered(order_type) => {
                self.handles.chrome.set_order_button_shadow(order_type, true)
            }
            PageEvent::PointerLeft(order_type) => {
                self.handles.chrome.set_order_button_shadow(order_type, false)
            }
            PageEvent::CardsIntersected(entries) => self.on_cards_intersected(&entries),
        }
    }

    /// Load the persisted selection. Anything unreadable counts as no selection.
    pub fn restore(&mut self) {
        let raw = match self.handles.store.get_item(&self.config.storage_key) {
            Ok(raw) => raw,
            Err(e) => {
                Logger::warn_with_component(
                    COMPONENT,
                    &format!("Cannot read saved selection: {}", e),
                );
                None
            }
        };

        self.state = match restore_state(raw.as_deref()) {
            Ok(state) => state,
            Err(e) => {
                Logger::warn_with_component(COMPONENT, &format!("Ignoring saved selection: {}", e));
                SelectionState::default()
            }
        };

        if self.state.is_complete() {
            self.render_summary();
        }
    }

    pub fn select_promotion(&mut self, promotion: &str) {
        if promotion.is_empty() {
            Logger::debug_with_component(
                COMPONENT,
                "Promotion control has no identifier, ignoring",
            );
            return;
        }

        self.state.set_promotion(promotion);
        self.handles.view.show_promotion(Some(promotion), true);
        self.handles.view.set_clear_visible(true);
        self.persist();
        self.handles.notifier.show(&messages::promotion_selected(promotion));
        Logger::info_with_component(COMPONENT, &format!("Promotion selected: {}", promotion));
    }

    /// Drop the current promotion. Does nothing when none is selected.
    pub fn clear_promotion(&mut self) {
        let Some(removed) = self.state.take_promotion() else {
            return;
        };

        self.handles.view.show_promotion(None, false);
        self.handles.view.set_clear_visible(false);
        self.handles.view.show_feedback(&messages::promotion_removed_feedback(&removed));
        self.persist();
        if self.state.order_type().is_some() {
            self.render_summary();
        }
        self.handles.notifier.show(&messages::promotion_removed());
        Logger::info_with_component(COMPONENT, &format!("Promotion cleared: {}", removed));
    }

    pub fn choose_order_type(&mut self, order_type: OrderType) {
        self.state.set_order_type(order_type);

        let promotion = self.state.promotion();
        self.handles.view.show_feedback(&messages::order_type_feedback(order_type, promotion));
        self.persist();
        self.render_summary();

        let dialog = Rc::clone(&self.handles.dialog);
        self.handles.scheduler.schedule(
            self.config.dialog_close_delay_ms,
            Box::new(move || dialog.close()),
        );

        self.handles
            .notifier
            .show(&messages::order_type_chosen(order_type, self.state.promotion()));
        Logger::info_with_component(COMPONENT, &format!("Order type chosen: {}", order_type));
    }

    /// Write a point-in-time summary line. Needs an order type.
    pub fn render_summary(&self) {
        let now = self.handles.clock.now();
        if let Some(line) = summary_line(&self.state, &now) {
            self.handles.view.show_summary(&line);
        }
    }

    /// Resynchronize the modal contents whenever it opens
    pub fn on_dialog_shown(&self) {
        let promotion = self.state.promotion();
        self.handles.view.clear_feedback();
        self.handles.view.show_promotion(promotion, false);
        self.handles.view.set_clear_visible(promotion.is_some());
    }

    pub fn on_scroll(&self, offset: f64) {
        let effects = ScrollEffects::at(offset, &self.config.scroll);
        self.handles.chrome.set_navbar_compact(effects.compact_navbar);
        self.handles.chrome.set_back_to_top_visible(effects.show_back_to_top);
    }

    pub fn on_cards_intersected(&mut self, entries: &[CardVisibility]) {
        let revealed = self.reveal.observe(entries);
        if revealed.is_empty() {
            return;
        }
        for &card in &revealed {
            self.handles.chrome.reveal_card(card);
            self.handles.chrome.release_card(card);
        }
        Logger::debug_with_component(
            COMPONENT,
            &format!(
                "Revealed {} cards, {} of {} shown",
                revealed.len(),
                self.reveal.revealed_count(),
                self.handles.chrome.card_count()
            ),
        );
    }

    fn persist(&self) {
        let encoded = match PersistedPreference::from_state(&self.state).encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                Logger::error_with_component(COMPONENT, &format!("Cannot encode selection: {}", e));
                return;
            }
        };
        if let Err(e) = self.handles.store.set_item(&self.config.storage_key, &encoded) {
            Logger::warn_with_component(COMPONENT, &format!("Selection not saved: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::traits::StorageError;
    use chrono::{NaiveDate, NaiveDateTime};
    use shared::{FeedbackMessage, NotificationEvent, Severity};
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Write(String),
        Promotion(Option<String>, bool),
        ClearVisible(bool),
        Feedback(FeedbackMessage),
        ClearFeedback,
        Summary(String),
        Navbar(bool),
        BackToTopVisible(bool),
        ScrollTop,
        Reveal(usize),
        Release(usize),
        Shadow(OrderType, bool),
        CloseDialog,
        Notify(NotificationEvent),
    }

    type Pending = Vec<(u32, Box<dyn FnOnce()>)>;

    /// In-memory stand-in for every page capability
    #[derive(Clone)]
    struct FakePage {
        calls: Rc<RefCell<Vec<Call>>>,
        stored: Rc<RefCell<Option<String>>>,
        pending: Rc<RefCell<Pending>>,
        storage_broken: bool,
        observer: bool,
        cards: usize,
    }

    impl FakePage {
        fn new() -> Self {
            Self {
                calls: Rc::default(),
                stored: Rc::default(),
                pending: Rc::default(),
                storage_broken: false,
                observer: true,
                cards: 3,
            }
        }

        fn with_stored(self, raw: &str) -> Self {
            *self.stored.borrow_mut() = Some(raw.to_string());
            self
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn reset(&self) {
            self.calls.borrow_mut().clear();
        }

        fn stored(&self) -> Option<String> {
            self.stored.borrow().clone()
        }

        fn summaries(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Summary(line) => Some(line),
                    _ => None,
                })
                .collect()
        }

        fn notifications(&self) -> Vec<NotificationEvent> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Notify(event) => Some(event),
                    _ => None,
                })
                .collect()
        }

        fn run_pending(&self) -> Vec<u32> {
            let tasks: Pending = self.pending.borrow_mut().drain(..).collect();
            tasks
                .into_iter()
                .map(|(delay, task)| {
                    task();
                    delay
                })
                .collect()
        }

        fn controller(&self) -> OrderSelectionController {
            let handles = PageHandles {
                store: Box::new(self.clone()),
                view: Box::new(self.clone()),
                chrome: Box::new(self.clone()),
                dialog: Rc::new(self.clone()),
                notifier: Box::new(self.clone()),
                clock: Box::new(self.clone()),
                scheduler: Box::new(self.clone()),
            };
            OrderSelectionController::new(PageConfig::default(), handles)
        }
    }

    impl KeyValueStore for FakePage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            assert_eq!(key, "selfServiceState");
            if self.storage_broken {
                return Err(StorageError::Unavailable);
            }
            Ok(self.stored())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            assert_eq!(key, "selfServiceState");
            *self.stored.borrow_mut() = Some(value.to_string());
            self.record(Call::Write(value.to_string()));
            Ok(())
        }
    }

    impl OrderView for FakePage {
        fn show_promotion(&self, promotion: Option<&str>, animate: bool) {
            self.record(Call::Promotion(promotion.map(str::to_string), animate));
        }

        fn set_clear_visible(&self, visible: bool) {
            self.record(Call::ClearVisible(visible));
        }

        fn show_feedback(&self, feedback: &FeedbackMessage) {
            self.record(Call::Feedback(feedback.clone()));
        }

        fn clear_feedback(&self) {
            self.record(Call::ClearFeedback);
        }

        fn show_summary(&self, line: &str) {
            self.record(Call::Summary(line.to_string()));
        }
    }

    impl PageChrome for FakePage {
        fn set_navbar_compact(&self, compact: bool) {
            self.record(Call::Navbar(compact));
        }

        fn set_back_to_top_visible(&self, visible: bool) {
            self.record(Call::BackToTopVisible(visible));
        }

        fn scroll_to_top(&self) {
            self.record(Call::ScrollTop);
        }

        fn card_count(&self) -> usize {
            self.cards
        }

        fn observer_available(&self) -> bool {
            self.observer
        }

        fn reveal_card(&self, card: usize) {
            self.record(Call::Reveal(card));
        }

        fn release_card(&self, card: usize) {
            self.record(Call::Release(card));
        }

        fn set_order_button_shadow(&self, order_type: OrderType, shadow: bool) {
            self.record(Call::Shadow(order_type, shadow));
        }
    }

    impl SelectionDialog for FakePage {
        fn close(&self) {
            self.record(Call::CloseDialog);
        }
    }

    impl Notifier for FakePage {
        fn show(&self, notification: &NotificationEvent) {
            self.record(Call::Notify(notification.clone()));
        }
    }

    impl Clock for FakePage {
        fn now(&self) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 8, 17)
                .unwrap()
                .and_hms_opt(19, 4, 0)
                .unwrap()
        }
    }

    impl Scheduler for FakePage {
        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
            self.pending.borrow_mut().push((delay_ms, task));
        }
    }

    #[test]
    fn test_restore_without_saved_record() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.start();

        assert!(controller.state().is_empty());
        assert!(page.summaries().is_empty());
        assert_eq!(page.stored(), None);
    }

    #[test]
    fn test_restore_complete_record_renders_summary() {
        let page =
            FakePage::new().with_stored(r#"{"promo":"Paket Hemat","orderType":"Bawa Pulang"}"#);
        let mut controller = page.controller();
        controller.start();

        assert_eq!(controller.state().promotion(), Some("Paket Hemat"));
        assert_eq!(controller.state().order_type(), Some(OrderType::TakeAway));
        assert_eq!(
            page.summaries(),
            ["Tipe Pesanan: Bawa Pulang | Promo: Paket Hemat | Waktu: 17/08/2025, 19.04"]
        );
    }

    #[test]
    fn test_restore_partial_record_waits_for_both_fields() {
        let page = FakePage::new().with_stored(r#"{"promo":null,"orderType":"Makan di Tempat"}"#);
        let mut controller = page.controller();
        controller.start();

        assert_eq!(controller.state().order_type(), Some(OrderType::DineIn));
        assert!(page.summaries().is_empty());
    }

    #[test]
    fn test_restore_malformed_record_falls_back_to_empty() {
        for raw in ["{not json", "null", "[1,2]", r#"{"orderType":"Drive Thru"}"#] {
            let page = FakePage::new().with_stored(raw);
            let mut controller = page.controller();
            controller.start();

            assert!(controller.state().is_empty(), "record {:?} should be ignored", raw);
            assert!(page.calls().is_empty());
        }
    }

    #[test]
    fn test_restore_when_storage_unavailable() {
        let mut page = FakePage::new().with_stored(r#"{"promo":"P1","orderType":"Bawa Pulang"}"#);
        page.storage_broken = true;
        let mut controller = page.controller();
        controller.start();

        assert!(controller.state().is_empty());
    }

    #[test]
    fn test_select_promotion() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.handle(PageEvent::PromotionChosen("P1".to_string()));

        assert_eq!(controller.state().promotion(), Some("P1"));
        assert_eq!(
            page.calls(),
            vec![
                Call::Promotion(Some("P1".to_string()), true),
                Call::ClearVisible(true),
                Call::Write(r#"{"promo":"P1","orderType":null}"#.to_string()),
                Call::Notify(NotificationEvent::new("Promo dipilih: P1", Severity::Info)),
            ]
        );
    }

    #[test]
    fn test_select_promotion_without_identifier_is_ignored() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.select_promotion("");

        assert!(controller.state().is_empty());
        assert!(page.calls().is_empty());
    }

    #[test]
    fn test_select_then_clear_promotion() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.select_promotion("P1");
        page.reset();

        controller.clear_promotion();

        assert_eq!(controller.state().promotion(), None);
        assert_eq!(
            page.calls(),
            vec![
                Call::Promotion(None, false),
                Call::ClearVisible(false),
                Call::Feedback(FeedbackMessage::new("Promo \"P1\" dihapus.", Severity::Warning)),
                Call::Write(r#"{"promo":null,"orderType":null}"#.to_string()),
                Call::Notify(NotificationEvent::new("Promo dihapus", Severity::Warning)),
            ]
        );
    }

    #[test]
    fn test_clear_without_promotion_is_noop() {
        let page = FakePage::new().with_stored(r#"{"promo":null,"orderType":"Bawa Pulang"}"#);
        let mut controller = page.controller();
        controller.start();
        page.reset();

        controller.handle(PageEvent::PromotionCleared);

        assert!(page.calls().is_empty());
        assert_eq!(controller.state().order_type(), Some(OrderType::TakeAway));
    }

    #[test]
    fn test_clear_refreshes_summary_when_order_type_chosen() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.select_promotion("P1");
        controller.choose_order_type(OrderType::DineIn);
        page.reset();

        controller.clear_promotion();

        let summaries = page.summaries();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].contains("Promo: Tidak Ada"));
    }

    #[test]
    fn test_choose_order_type_with_promotion() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.select_promotion("P1");
        page.reset();

        controller.handle(PageEvent::OrderTypeChosen(OrderType::DineIn));

        let calls = page.calls();
        assert_eq!(
            calls[0],
            Call::Feedback(FeedbackMessage::new(
                "Anda memilih: Makan di Tempat dengan promo \"P1\".",
                Severity::Success
            ))
        );
        assert_eq!(
            calls[1],
            Call::Write(r#"{"promo":"P1","orderType":"Makan di Tempat"}"#.to_string())
        );
        let summary = &page.summaries()[0];
        assert!(summary.contains("Makan di Tempat"));
        assert!(summary.contains("P1"));
        assert_eq!(
            page.notifications(),
            vec![NotificationEvent::new("Pesanan: Makan di Tempat + Promo: P1", Severity::Success)]
        );
    }

    #[test]
    fn test_choose_order_type_without_promotion_uses_placeholder() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.choose_order_type(OrderType::TakeAway);

        assert_eq!(
            page.summaries(),
            ["Tipe Pesanan: Bawa Pulang | Promo: Tidak Ada | Waktu: 17/08/2025, 19.04"]
        );
        assert_eq!(
            page.notifications(),
            vec![NotificationEvent::new("Pesanan: Bawa Pulang", Severity::Success)]
        );
    }

    #[test]
    fn test_choose_order_type_closes_dialog_later() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.choose_order_type(OrderType::DineIn);

        assert!(!page.calls().contains(&Call::CloseDialog));
        assert_eq!(page.run_pending(), vec![1100]);
        assert_eq!(page.calls().last(), Some(&Call::CloseDialog));
    }

    #[test]
    fn test_render_summary_without_order_type() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.select_promotion("P1");
        controller.render_summary();

        assert!(page.summaries().is_empty());
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let page = FakePage::new();
        let mut controller = page.controller();
        let encoded = |controller: &OrderSelectionController| {
            PersistedPreference::from_state(controller.state()).encode().unwrap()
        };

        controller.select_promotion("P1");
        assert_eq!(page.stored(), Some(encoded(&controller)));
        controller.choose_order_type(OrderType::TakeAway);
        assert_eq!(page.stored(), Some(encoded(&controller)));
        controller.clear_promotion();
        assert_eq!(page.stored(), Some(encoded(&controller)));
    }

    #[test]
    fn test_persisted_selection_survives_reload() {
        let page = FakePage::new();
        let mut first = page.controller();
        first.select_promotion("P1");
        first.choose_order_type(OrderType::DineIn);
        first.select_promotion("Diskon Kopi");
        first.choose_order_type(OrderType::TakeAway);

        let reloaded = FakePage::new().with_stored(&page.stored().unwrap());
        let mut second = reloaded.controller();
        second.start();

        assert_eq!(second.state(), first.state());
    }

    #[test]
    fn test_dialog_shown_resyncs_indicator() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.handle(PageEvent::DialogShown);
        assert_eq!(
            page.calls(),
            vec![Call::ClearFeedback, Call::Promotion(None, false), Call::ClearVisible(false)]
        );

        controller.select_promotion("P1");
        page.reset();
        controller.handle(PageEvent::DialogShown);
        assert_eq!(
            page.calls(),
            vec![
                Call::ClearFeedback,
                Call::Promotion(Some("P1".to_string()), false),
                Call::ClearVisible(true),
            ]
        );
    }

    #[test]
    fn test_scroll_toggles_chrome() {
        let page = FakePage::new();
        let mut controller = page.controller();

        controller.handle(PageEvent::Scrolled(100.0));
        controller.handle(PageEvent::Scrolled(500.0));
        controller.handle(PageEvent::Scrolled(0.0));

        assert_eq!(
            page.calls(),
            vec![
                Call::Navbar(true),
                Call::BackToTopVisible(false),
                Call::Navbar(true),
                Call::BackToTopVisible(true),
                Call::Navbar(false),
                Call::BackToTopVisible(false),
            ]
        );
    }

    #[test]
    fn test_back_to_top() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.handle(PageEvent::BackToTop);
        assert_eq!(page.calls(), vec![Call::ScrollTop]);
    }

    #[test]
    fn test_cards_revealed_once() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.start();

        let entries = vec![
            CardVisibility { card: 0, intersecting: true },
            CardVisibility { card: 1, intersecting: false },
        ];
        controller.handle(PageEvent::CardsIntersected(entries.clone()));
        controller.handle(PageEvent::CardsIntersected(entries));

        assert_eq!(page.calls(), vec![Call::Reveal(0), Call::Release(0)]);
        assert_eq!(controller.reveal.revealed_count(), 1);
    }

    #[test]
    fn test_cards_revealed_at_start_without_observer() {
        let mut page = FakePage::new();
        page.observer = false;
        let mut controller = page.controller();
        controller.start();

        assert_eq!(page.calls(), vec![Call::Reveal(0), Call::Reveal(1), Call::Reveal(2)]);
    }

    #[test]
    fn test_hover_shadow() {
        let page = FakePage::new();
        let mut controller = page.controller();
        controller.handle(PageEvent::PointerEntered(OrderType::DineIn));
        controller.handle(PageEvent::PointerLeft(OrderType::DineIn));

        assert_eq!(
            page.calls(),
            vec![
                Call::Shadow(OrderType::DineIn, true),
                Call::Shadow(OrderType::DineIn, false),
            ]
        );
        assert!(controller.state().is_empty());
    }
}
