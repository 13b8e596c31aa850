pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod mood;
pub mod orientation;
pub mod state;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Config;
pub use gateway::Gateway;
pub use state::AppState;
