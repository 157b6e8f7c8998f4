/// Component-tagged logging.
///
/// In the browser lines go to the developer console through `gloo::console`;
/// native builds (unit tests) forward to the `log` facade instead.
pub struct Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        Self::log(Level::Debug, component, message);
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log(Level::Info, component, message);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log(Level::Warn, component, message);
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log(Level::Error, component, message);
    }

    #[cfg(target_arch = "wasm32")]
    fn log(level: Level, component: &str, message: &str) {
        let line = format!("[{}] {}", component, message);
        match level {
            Level::Debug => gloo::console::debug!(line),
            Level::Info => gloo::console::info!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Error => gloo::console::error!(line),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn log(level: Level, component: &str, message: &str) {
        let level = match level {
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error => log::Level::Error,
        };
        log::log!(target: "self_service", level, "[{}] {}", component, message);
    }
}
