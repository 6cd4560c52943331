pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use app_state::AppState;
pub use config::Config;
pub use error::RelayError;
