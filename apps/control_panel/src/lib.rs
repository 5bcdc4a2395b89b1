//! Dashboard and settings pages for the screen automation backend, driven
//! through an injectable view and notifier.

pub mod config;
pub mod controller;
pub mod ui;
