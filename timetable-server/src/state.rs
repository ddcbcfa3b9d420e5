use std::sync::Arc;

use timetable_core::config::TimetableConfig;
use timetable_core::store::Store;
use timetable_core::view::ViewOptions;
use timetable_core::TimetableResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<TimetableConfig>,
    // The store reads from disk on every call, so fresh imports show up
    // without a restart
    store: Store,
}

impl AppState {
    pub fn new(config: TimetableConfig) -> TimetableResult<Self> {
        let store = config.store()?;
        Ok(AppState {
            config: Arc::new(config),
            store,
        })
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn view_options(&self) -> TimetableResult<ViewOptions> {
        self.config.view_options()
    }
}
