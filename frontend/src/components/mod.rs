pub mod dom;
pub mod order_panel;
pub mod page_chrome;
pub mod toast_host;
