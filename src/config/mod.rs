// src/config/mod.rs
//! Configuration system for keyring-rekey
//!
//! Optional TOML settings describing the keyring layout and the default log
//! filter, with built-in defaults when no file is present.

pub use app::{load, load_from, Layout, Logging, Settings};

mod app;
mod defaults;
