pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod preview;
pub mod settings;
pub mod source;
pub mod state;
pub mod store;
pub mod ui;
