//! Controller layer: event bindings, page sessions, and per-page handlers.

pub mod dashboard;
pub mod events;
pub mod session;
pub mod settings;

pub use dashboard::DashboardController;
pub use events::{Binding, DashboardAction, SettingsAction, Trigger};
pub use session::{DashboardSession, SettingsSession};
pub use settings::SettingsController;

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
