pub mod auto_start;
pub mod config;
pub mod error;
pub mod launch_source;
pub mod launcher;
pub mod login_item;
pub mod models;

pub use auto_start::{AutoStartCoordinator, StartupReport};
pub use config::Settings;
pub use error::{Result, StartieError};
pub use launch_source::LaunchSource;
pub use launcher::{LaunchSummary, Launcher};
pub use login_item::LoginItemRegistrar;
