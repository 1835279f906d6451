pub mod app;
pub mod config;
pub mod editors;
pub mod fuzzy;
pub mod history;
pub mod input;
pub mod launch;
pub mod logging;
pub mod ui;
