pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod persisted;
pub mod preferences;
pub mod storage;
pub mod tasks;
pub mod week;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{Backend, FileBackend, MemoryBackend, SharedBackend, resolve_data_path};
pub use tasks::TaskStore;
