//! Launch orchestration: opens every enabled application of a group and
//! tallies how many launch requests the OS accepted.

use std::sync::Arc;

use os_api::{AppLauncher, FileSystem};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::error::{Result, StartieError};
use crate::app::models::{AppGroup, Application};

/// One application that could not be launched.
#[derive(Debug)]
pub struct LaunchFailure {
    pub application_id: Uuid,
    pub name: String,
    pub error: StartieError,
}

/// Outcome of launching one group.
#[derive(Debug, Default)]
pub struct LaunchSummary {
    /// Number of enabled applications attempted
    pub total: usize,
    /// Number of launch requests the OS accepted
    pub succeeded: usize,
    pub failures: Vec<LaunchFailure>,
}

impl LaunchSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded == self.total
    }
}

#[derive(Clone)]
pub struct Launcher {
    os_launcher: Arc<dyn AppLauncher>,
    fs: Arc<dyn FileSystem>,
}

impl Launcher {
    pub fn new(os_launcher: Arc<dyn AppLauncher>, fs: Arc<dyn FileSystem>) -> Self {
        Self { os_launcher, fs }
    }

    /// Asks the OS to open one application.
    ///
    /// A missing path fails with `ApplicationNotFound` before the OS is
    /// involved. `Ok` means the request was accepted, not that the program
    /// finished starting.
    pub fn launch(&self, application: &Application) -> Result<()> {
        if !self.fs.exists(&application.path) {
            return Err(StartieError::application_not_found(&application.path));
        }

        self.os_launcher
            .open_application(&application.launch_target())
            .map_err(|reason| StartieError::launch_rejected(&application.name, reason))
    }

    /// Launches the enabled applications of `group` in order. A failure is
    /// recorded and the batch carries on.
    pub fn run_group(&self, group: &AppGroup) -> LaunchSummary {
        let mut summary = LaunchSummary::default();

        for application in group.enabled_applications() {
            summary.total += 1;
            match self.launch(application) {
                Ok(()) => {
                    summary.succeeded += 1;
                    info!(group = %group.name, app = %application.display(), "Launched");
                }
                Err(error) => {
                    warn!(group = %group.name, app = %application.name, %error, "Launch failed");
                    summary.failures.push(LaunchFailure {
                        application_id: application.id,
                        name: application.name.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            group = %group.name,
            succeeded = summary.succeeded,
            total = summary.total,
            "Launched {} of {} applications",
            summary.succeeded,
            summary.total
        );
        summary
    }

    /// Schedules `run_group` on the current `LocalSet` and hands the summary
    /// to `on_complete`; the caller is never blocked on OS launch calls.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub fn launch_group<F>(&self, group: AppGroup, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(LaunchSummary) + 'static,
    {
        let launcher = self.clone();
        tokio::task::spawn_local(async move {
            let summary = launcher.run_group(&group);
            on_complete(summary);
        })
    }
}
