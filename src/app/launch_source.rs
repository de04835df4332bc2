//! Tells whether this process was started by the login item.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::app::models::Preferences;

/// One-shot flag armed when the login item is registered.
pub const LAUNCHED_AT_LOGIN_KEY: &str = "LaunchedAtLogin";

/// Process serial number argument older launchers pass to bundled apps.
static LEGACY_PSN_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-psn_\d+_\d+$").expect("valid psn pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSource {
    LoginItem,
    User,
}

impl LaunchSource {
    /// Detects how this process was started.
    ///
    /// The `LaunchedAtLogin` flag decides whenever it is present and is
    /// cleared on read. Only when it is absent are the process arguments
    /// checked for the login sentinel.
    pub fn detect<I, S>(prefs: &Preferences, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let flag = prefs.take_bool(LAUNCHED_AT_LOGIN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Could not clear the launched-at-login flag");
            prefs.bool(LAUNCHED_AT_LOGIN_KEY)
        });
        if let Some(flag) = flag {
            debug!(flag, "Launch source decided by preference flag");
            return Self::from_flag(flag);
        }

        let from_login = args.into_iter().skip(1).any(|arg| {
            let arg = arg.as_ref();
            arg == os_api::LOGIN_SENTINEL_ARG || LEGACY_PSN_ARG.is_match(arg)
        });
        debug!(from_login, "Launch source decided by process arguments");
        Self::from_flag(from_login)
    }

    fn from_flag(from_login: bool) -> Self {
        if from_login {
            LaunchSource::LoginItem
        } else {
            LaunchSource::User
        }
    }

    /// Arms the one-shot flag so the next start reports `LoginItem`.
    pub fn arm(prefs: &Preferences) {
        if let Err(e) = prefs.set(LAUNCHED_AT_LOGIN_KEY, true) {
            warn!(error = %e, "Could not arm the launched-at-login flag");
        }
    }

    pub fn is_login(self) -> bool {
        self == LaunchSource::LoginItem
    }
}
