//! # Event subscription table
//!
//! Every DOM hook the page uses is declared here as one row: a target, an
//! event name and a handler. Most handlers only translate the DOM event into
//! a [`PageEvent`] for the controller, which keeps the controller free of
//! web-sys types and lets tests call it directly.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::Array;
use shared::{shortcut_for, CardVisibility, OrderType};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, Window,
};

use crate::components::dom::{query, query_all};
use crate::components::page_chrome::{CardDeck, OrderButtons};
use crate::config::PageConfig;
use crate::controller::{OrderSelectionController, PageEvent};
use crate::services::logging::Logger;

const COMPONENT: &str = "subscriptions";

pub type SharedController = Rc<RefCell<OrderSelectionController>>;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Elements that emit events the page reacts to
pub struct PageElements {
    pub window: Window,
    pub document: Document,
    pub promo_buttons: Vec<Element>,
    pub clear_button: Option<Element>,
    pub modal: Option<Element>,
    pub back_to_top: Option<Element>,
    pub order_buttons: OrderButtons,
}

impl PageElements {
    pub fn locate(window: Window, document: Document, config: &PageConfig) -> Self {
        let selectors = &config.selectors;
        Self {
            promo_buttons: query_all(&document, &selectors.promo_buttons),
            clear_button: query(&document, &selectors.clear_promo_button),
            modal: query(&document, &selectors.selection_modal),
            back_to_top: query(&document, &selectors.back_to_top),
            order_buttons: OrderButtons::locate(&document, config),
            window,
            document,
        }
    }
}

/// One row of the table
pub struct Subscription {
    target: EventTarget,
    event: &'static str,
    handler: Box<dyn FnMut(&Event)>,
}

impl Subscription {
    pub fn new(target: &EventTarget, event: &'static str, handler: Box<dyn FnMut(&Event)>) -> Self {
        Self {
            target: target.clone(),
            event,
            handler,
        }
    }
}

/// Hand an event to the controller. Handlers run to completion, so a busy
/// controller means a synchronous re-entry; the event is dropped.
pub fn dispatch(controller: &SharedController, event: PageEvent) {
    match controller.try_borrow_mut() {
        Ok(mut controller) => controller.handle(event),
        Err(_) => Logger::warn_with_component(
            COMPONENT,
            &format!("Controller busy, dropping {:?}", event),
        ),
    }
}

fn dispatching(
    controller: &SharedController,
    translate: impl Fn(&Event) -> Option<PageEvent> + 'static,
) -> Box<dyn FnMut(&Event)> {
    let controller = Rc::clone(controller);
    Box::new(move |event: &Event| {
        if let Some(page_event) = translate(event) {
            dispatch(&controller, page_event);
        }
    })
}

/// Build the full table. Rows whose element is missing are left out.
pub fn subscription_table(page: &PageElements, controller: &SharedController) -> Vec<Subscription> {
    let mut table = Vec::new();

    for button in &page.promo_buttons {
        let source = button.clone();
        table.push(Subscription::new(
            button,
            "click",
            dispatching(controller, move |_| {
                let promotion = source.get_attribute("data-promo").unwrap_or_default();
                Some(PageEvent::PromotionChosen(promotion))
            }),
        ));
    }

    if let Some(clear) = &page.clear_button {
        table.push(Subscription::new(
            clear,
            "click",
            dispatching(controller, |_| Some(PageEvent::PromotionCleared)),
        ));
    }

    for order_type in OrderType::ALL {
        let Some(button) = page.order_buttons.get(order_type) else {
            continue;
        };
        table.push(Subscription::new(
            button,
            "click",
            dispatching(controller, move |_| Some(PageEvent::OrderTypeChosen(order_type))),
        ));
        table.push(Subscription::new(
            button,
            "mouseenter",
            dispatching(controller, move |_| Some(PageEvent::PointerEntered(order_type))),
        ));
        table.push(Subscription::new(
            button,
            "mouseleave",
            dispatching(controller, move |_| Some(PageEvent::PointerLeft(order_type))),
        ));
    }

    if let Some(modal) = &page.modal {
        table.push(Subscription::new(
            modal,
            "show.bs.modal",
            dispatching(controller, |_| Some(PageEvent::DialogShown)),
        ));
    }

    let window = page.window.clone();
    table.push(Subscription::new(
        &page.window,
        "scroll",
        dispatching(controller, move |_| {
            Some(PageEvent::Scrolled(window.scroll_y().unwrap_or(0.0)))
        }),
    ));

    if let Some(back_to_top) = &page.back_to_top {
        table.push(Subscription::new(
            back_to_top,
            "click",
            dispatching(controller, |_| Some(PageEvent::BackToTop)),
        ));
    }

    // Shortcuts click the real control, whose own row then reaches the controller
    let buttons = page.order_buttons.clone();
    table.push(Subscription::new(
        &page.document,
        "keydown",
        Box::new(move |event: &Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(order_type) = shortcut_for(key_event.alt_key(), &key_event.key()) {
                buttons.activate(order_type);
            }
        }),
    ));

    table
}

/// Live registrations. Dropping this removes every listener.
#[derive(Default)]
pub struct Subscriptions {
    listeners: Vec<EventListener>,
    observer_callback: Option<ObserverCallback>,
}

impl Subscriptions {
    pub fn register(table: Vec<Subscription>) -> Self {
        let listeners = table
            .into_iter()
            .map(|row| EventListener::new(&row.target, row.event, row.handler))
            .collect();
        Self {
            listeners,
            observer_callback: None,
        }
    }

    pub fn keep_observer_callback(&mut self, callback: ObserverCallback) {
        self.observer_callback = Some(callback);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Keep every listener for the lifetime of the page
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
        if let Some(callback) = self.observer_callback {
            callback.forget();
        }
    }
}

/// Watch `deck` and report card visibility to the controller.
///
/// The returned callback must outlive the observer.
pub fn observe_cards(
    deck: &Rc<CardDeck>,
    controller: &SharedController,
    reveal_ratio: f64,
) -> Result<ObserverCallback, JsValue> {
    let cards = Rc::clone(deck);
    let controller = Rc::clone(controller);
    let callback = ObserverCallback::new(move |entries: Array, _observer: IntersectionObserver| {
        let visibility: Vec<CardVisibility> = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|entry| {
                cards.index_of(&entry.target()).map(|card| CardVisibility {
                    card,
                    intersecting: entry.is_intersecting(),
                })
            })
            .collect();
        if !visibility.is_empty() {
            dispatch(&controller, PageEvent::CardsIntersected(visibility));
        }
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(reveal_ratio));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    deck.attach(observer);
    Ok(callback)
}
