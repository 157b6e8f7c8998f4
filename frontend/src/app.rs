use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use shared::CardVisibility;

use crate::components::order_panel::OrderPanel;
use crate::components::page_chrome::{locate_cards, observer_supported, PageChromeDom};
use crate::components::toast_host::ToastHost;
use crate::config::PageConfig;
use crate::controller::{OrderSelectionController, PageEvent, PageHandles};
use crate::services::bootstrap::BootstrapModal;
use crate::services::date_utils::LocalClock;
use crate::services::logging::Logger;
use crate::services::storage::LocalStore;
use crate::services::timers::TimeoutScheduler;
use crate::subscriptions::{
    dispatch, observe_cards, subscription_table, PageElements, Subscriptions,
};

const COMPONENT: &str = "app";

/// Wire the order page: restore the saved selection, then register every
/// subscription for the lifetime of the page.
pub fn start() -> Result<()> {
    start_with_config(PageConfig::default())
}

pub fn start_with_config(config: PageConfig) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;
    let document = window.document().ok_or_else(|| anyhow!("window has no document"))?;

    let page = PageElements::locate(window, document.clone(), &config);
    let deck = Rc::new(locate_cards(&document, &config));

    let handles = PageHandles {
        store: Box::new(LocalStore),
        view: Box::new(OrderPanel::locate(&document, &config)),
        chrome: Box::new(PageChromeDom::locate(
            &document,
            &config,
            page.order_buttons.clone(),
            Rc::clone(&deck),
        )),
        dialog: Rc::new(BootstrapModal::new(page.modal.clone())),
        notifier: Box::new(ToastHost::locate(&document, &config)),
        clock: Box::new(LocalClock),
        scheduler: Box::new(TimeoutScheduler),
    };

    let controller = Rc::new(RefCell::new(OrderSelectionController::new(config.clone(), handles)));
    controller.borrow_mut().start();
    {
        let controller = controller.borrow();
        let state = controller.state();
        if state.is_empty() {
            Logger::debug_with_component(COMPONENT, "No saved selection");
        } else {
            Logger::info_with_component(
                COMPONENT,
                &format!(
                    "Restored selection: promo {:?}, order type {:?}",
                    state.promotion(),
                    state.order_type()
                ),
            );
        }
    }

    let mut subscriptions = Subscriptions::register(subscription_table(&page, &controller));

    if observer_supported() && !deck.is_empty() {
        match observe_cards(&deck, &controller, config.reveal_ratio) {
            Ok(callback) => subscriptions.keep_observer_callback(callback),
            Err(e) => {
                Logger::warn_with_component(
                    COMPONENT,
                    &format!("Card observer failed ({:?}), revealing all cards", e),
                );
                let everything = (0..deck.len())
                    .map(|card| CardVisibility { card, intersecting: true })
                    .collect();
                dispatch(&controller, PageEvent::CardsIntersected(everything));
            }
        }
    }

    Logger::info_with_component(
        COMPONENT,
        &format!(
            "Order page ready: {} listeners, {} cards, {} promotions",
            subscriptions.len(),
            deck.len(),
            page.promo_buttons.len()
        ),
    );
    subscriptions.forget();
    Ok(())
}
