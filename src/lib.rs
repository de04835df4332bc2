//! Startie groups applications and launches them together, optionally at
//! login and after a per-group delay.

pub mod app;
pub mod logging;

pub use app::models::{AppGroup, AppState, Application, OsServices};
pub use app::{LaunchSource, Settings, StartieError};
