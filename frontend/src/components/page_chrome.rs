use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use shared::OrderType;
use wasm_bindgen::JsValue;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, ScrollBehavior, ScrollToOptions,
};

use super::dom::{query, query_all, query_html, set_class};
use crate::config::PageConfig;
use crate::services::logging::Logger;
use crate::services::traits::PageChrome;

const NAVBAR_COMPACT: &str = "navbar-scrolled";
const BACK_TO_TOP_VISIBLE: &str = "show";
const CARD_REVEALED: &str = "card-reveal";
const BUTTON_SHADOW: &str = "shadow";

/// True when the browser provides `IntersectionObserver`
pub fn observer_supported() -> bool {
    web_sys::window()
        .and_then(|window| Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).ok())
        .unwrap_or(false)
}

/// The dine-in and take-away controls
#[derive(Clone, Default)]
pub struct OrderButtons {
    dine_in: Option<HtmlElement>,
    take_away: Option<HtmlElement>,
}

impl OrderButtons {
    pub fn locate(document: &Document, config: &PageConfig) -> Self {
        Self {
            dine_in: query_html(document, &config.selectors.dine_in_button),
            take_away: query_html(document, &config.selectors.take_away_button),
        }
    }

    pub fn get(&self, order_type: OrderType) -> Option<&HtmlElement> {
        match order_type {
            OrderType::DineIn => self.dine_in.as_ref(),
            OrderType::TakeAway => self.take_away.as_ref(),
        }
    }

    /// Focus the control, then click it as if the user had
    pub fn activate(&self, order_type: OrderType) {
        if let Some(button) = self.get(order_type) {
            let _ = button.focus();
            button.click();
        }
    }
}

/// Reveal-candidate cards plus the observer watching them
#[derive(Default)]
pub struct CardDeck {
    cards: Vec<Element>,
    observer: RefCell<Option<IntersectionObserver>>,
}

impl CardDeck {
    pub fn new(cards: Vec<Element>) -> Self {
        Self {
            cards,
            observer: RefCell::new(None),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, card: usize) -> Option<&Element> {
        self.cards.get(card)
    }

    pub fn index_of(&self, element: &Element) -> Option<usize> {
        self.cards.iter().position(|card| card == element)
    }

    /// Start watching every card with `observer`
    pub fn attach(&self, observer: IntersectionObserver) {
        for card in &self.cards {
            observer.observe(card);
        }
        *self.observer.borrow_mut() = Some(observer);
    }

    pub fn release(&self, card: usize) {
        if let (Some(observer), Some(element)) = (self.observer.borrow().as_ref(), self.get(card)) {
            observer.unobserve(element);
        }
    }
}

/// Navbar, back-to-top control, reveal cards and order-button hover
pub struct PageChromeDom {
    navbar: Option<Element>,
    back_to_top: Option<Element>,
    buttons: OrderButtons,
    deck: Rc<CardDeck>,
}

impl PageChromeDom {
    pub fn locate(
        document: &Document,
        config: &PageConfig,
        buttons: OrderButtons,
        deck: Rc<CardDeck>,
    ) -> Self {
        Self {
            navbar: query(document, &config.selectors.navbar),
            back_to_top: query(document, &config.selectors.back_to_top),
            buttons,
            deck,
        }
    }
}

impl PageChrome for PageChromeDom {
    fn set_navbar_compact(&self, compact: bool) {
        if let Some(navbar) = &self.navbar {
            set_class(navbar, NAVBAR_COMPACT, compact);
        }
    }

    fn set_back_to_top_visible(&self, visible: bool) {
        if let Some(button) = &self.back_to_top {
            set_class(button, BACK_TO_TOP_VISIBLE, visible);
        }
    }

    fn scroll_to_top(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }

    fn card_count(&self) -> usize {
        self.deck.len()
    }

    fn observer_available(&self) -> bool {
        observer_supported()
    }

    fn reveal_card(&self, card: usize) {
        match self.deck.get(card) {
            Some(element) => set_class(element, CARD_REVEALED, true),
            None => Logger::warn_with_component("page-chrome", &format!("Unknown card {}", card)),
        }
    }

    fn release_card(&self, card: usize) {
        self.deck.release(card);
    }

    fn set_order_button_shadow(&self, order_type: OrderType, shadow: bool) {
        if let Some(button) = self.buttons.get(order_type) {
            set_class(button, BUTTON_SHADOW, shadow);
        }
    }
}

/// Collect the page's reveal-candidate cards
pub fn locate_cards(document: &Document, config: &PageConfig) -> CardDeck {
    CardDeck::new(query_all(document, &config.selectors.cards))
}
