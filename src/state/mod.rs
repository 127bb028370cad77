pub mod app_settings;
pub mod app_state;
pub mod export;
pub mod loader;
pub mod messages;
pub mod refresher;
pub mod snapshot;
