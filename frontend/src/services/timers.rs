use gloo::timers::callback::Timeout;

use super::traits::Scheduler;

/// [`Scheduler`] backed by `setTimeout`. Timers are detached on creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }
}
