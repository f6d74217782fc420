// File: src/lib.rs
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod logging;
pub mod model;
pub mod notify;
pub mod paths;
pub mod screen;

#[cfg(feature = "tui")]
pub mod tui;
