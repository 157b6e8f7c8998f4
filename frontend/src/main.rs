mod app;
mod components;
mod config;
mod controller;
mod services;
mod subscriptions;

use services::logging::Logger;

fn main() {
    if let Err(e) = app::start() {
        Logger::error_with_component("app", &format!("Order page not started: {:#}", e));
    }
}
