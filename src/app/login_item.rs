//! Keeps the OS login item in line with the auto-launch configuration.
//!
//! The OS registration is external state. It is never mirrored locally:
//! every change recomputes the desired state and reconciles against what the
//! OS reports.

use std::sync::Arc;

use os_api::{LoginItemService, LoginItemStatus};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::app::error::{Result, StartieError};
use crate::app::launch_source::LaunchSource;
use crate::app::models::AutoStartConfig;

/// Standalone user preference to run at login without any flagged group.
pub const LAUNCH_AT_STARTUP_KEY: &str = "LaunchAtStartup";

#[derive(Clone)]
pub struct LoginItemRegistrar {
    service: Arc<dyn LoginItemService>,
    config: AutoStartConfig,
}

impl LoginItemRegistrar {
    pub fn new(service: Arc<dyn LoginItemService>, config: AutoStartConfig) -> Self {
        Self { service, config }
    }

    pub fn launch_at_startup(&self) -> bool {
        self.config
            .preferences()
            .bool(LAUNCH_AT_STARTUP_KEY)
            .unwrap_or(false)
    }

    /// Enabled iff some group auto-launches or the user asked to run at login.
    pub fn desired_state(&self) -> bool {
        self.config.has_auto_launch_groups() || self.launch_at_startup()
    }

    /// Whether the OS currently has the login item registered.
    pub fn is_enabled(&self) -> bool {
        match self.service.status() {
            Ok(status) => status.is_enabled(),
            Err(e) => {
                error!(error = %e, "Could not query login item status");
                false
            }
        }
    }

    /// Brings the OS registration to `desired`, touching it only when it differs.
    pub fn reconcile(&self, desired: bool) -> Result<LoginItemStatus> {
        let current = self.service.status().map_err(StartieError::login_item)?;

        match (desired, current.is_enabled()) {
            (true, false) => {
                self.service.register().map_err(StartieError::login_item)?;
                LaunchSource::arm(self.config.preferences());
                info!("Registered as login item");
                Ok(LoginItemStatus::Enabled)
            }
            (false, true) => {
                self.service.unregister().map_err(StartieError::login_item)?;
                info!("Unregistered as login item");
                Ok(LoginItemStatus::NotRegistered)
            }
            _ => {
                debug!(?current, "Login item already in desired state");
                Ok(current)
            }
        }
    }

    /// Reconciles against the current configuration. Safe to call at any time;
    /// failures are logged.
    pub fn refresh_registration(&self) -> Option<LoginItemStatus> {
        let desired = self.desired_state();
        match self.reconcile(desired) {
            Ok(status) => {
                debug!(desired, ?status, "Login item refreshed");
                Some(status)
            }
            Err(e) => {
                error!(error = %e, desired, "Failed to refresh login item");
                None
            }
        }
    }

    /// Adds or removes a group from the auto-launch set, then reconciles.
    ///
    /// The login item is only unregistered once no flagged group is left and
    /// the standalone preference is off.
    pub fn set_launch_at_login(&self, group_id: Uuid, enabled: bool) -> Result<()> {
        self.config.set_auto_launch(group_id, enabled)?;
        self.refresh_registration();
        Ok(())
    }

    /// Sets the standalone preference. It is stored only after the OS accepted
    /// the matching change.
    pub fn set_launch_at_startup(&self, enabled: bool) -> Result<()> {
        let desired = enabled || self.config.has_auto_launch_groups();
        self.reconcile(desired)?;
        self.config.preferences().set(LAUNCH_AT_STARTUP_KEY, enabled)
    }

    /// Registers even if the OS already reports the item as enabled.
    pub fn force_register(&self) -> Result<()> {
        self.service.register().map_err(StartieError::login_item)?;
        LaunchSource::arm(self.config.preferences());
        info!("Force-registered as login item");
        self.config.preferences().set(LAUNCH_AT_STARTUP_KEY, true)
    }
}
