
mod process;
pub use process::{AppLauncher, FileSystem, LaunchTarget, LoginItemService, LoginItemStatus};

#[cfg(feature = "mock")]
pub use process::{MockAppLauncher, MockFileSystem, MockLoginItemService};

mod common_os;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "linux")]
mod linux;

// Platform implementation behind one name
#[cfg(target_os = "macos")]
pub use macos::OS;
#[cfg(target_os = "linux")]
pub use linux::OS;

/// Command line flag the login item passes to the program it starts.
pub const LOGIN_SENTINEL_ARG: &str = "--launched-at-login";
