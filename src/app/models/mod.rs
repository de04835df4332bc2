/// Central application state management
mod app_state;
/// A named, ordered collection of applications
mod app_group;
/// One launchable program
pub mod application;
/// Auto-launch membership and per-group delays
pub mod auto_start_config;
/// Persistent storage of the group list
pub mod group_store;
/// Atomic JSON document helpers shared by the stores
mod json_file;
mod meta;
/// Key-value user preferences
pub mod preferences;

// Public re-exports of key structures for use in other modules
pub use app_group::AppGroup;
pub use app_state::{AppState, OsServices};
pub use application::Application;
pub use auto_start_config::AutoStartConfig;
pub use group_store::GroupStore;
pub use meta::APP_VERSION;
pub use preferences::Preferences;
