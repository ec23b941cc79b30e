// Library interface for the inkwell binary and its integration tests
pub mod api;
pub mod app;
pub mod auth;
pub mod config;

#[macro_use]
pub mod logging;

pub mod media;
pub mod notify;
pub mod session;
pub mod terminal;
pub mod thread;
pub mod ui;
