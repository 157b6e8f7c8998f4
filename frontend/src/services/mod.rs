pub mod bootstrap;
pub mod date_utils;
pub mod logging;
pub mod storage;
pub mod timers;
pub mod traits;
