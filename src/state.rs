use crate::errors::StoreError;
use crate::preferences::Preferences;
use crate::storage::SharedBackend;
use crate::tasks::TaskStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<Mutex<TaskStore>>,
    pub preferences: Arc<Mutex<Preferences>>,
}

impl AppState {
    pub fn new(tasks: TaskStore, preferences: Preferences) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
            preferences: Arc::new(Mutex::new(preferences)),
        }
    }

    pub fn open(backend: SharedBackend, prefers_dark: bool) -> Result<Self, StoreError> {
        let tasks = TaskStore::open(backend.clone())?;
        let preferences = Preferences::open(backend, prefers_dark)?;
        Ok(Self::new(tasks, preferences))
    }
}
