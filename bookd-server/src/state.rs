use std::sync::Arc;

use bookd_core::Scheduler;

/// Shared application state: the scheduler with its injected collaborators.
#[derive(Clone)]
pub struct AppState {
    scheduler: Arc<Scheduler>,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        AppState { scheduler }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
