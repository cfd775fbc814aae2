pub mod app;
pub mod calendar;
pub mod config;
pub mod consumption;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{open_store, DrinkStore, FileStore};
