use crate::models::AppData;
use crate::storage::KvStore;
use crate::suggestions::{SuggestionClient, SuggestionTracker};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    pub data: Arc<Mutex<AppData>>,
    pub suggestions: Arc<SuggestionClient>,
    pub tracker: Arc<SuggestionTracker>,
}

impl AppState {
    pub fn new(store: KvStore, data: AppData, suggestions: SuggestionClient) -> Self {
        Self {
            store,
            data: Arc::new(Mutex::new(data)),
            suggestions: Arc::new(suggestions),
            tracker: Arc::new(SuggestionTracker::default()),
        }
    }
}
