pub mod app;
pub mod backup;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod rollover;
pub mod state;
pub mod stats;
pub mod storage;
pub mod suggestions;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{KvStore, load_data};
