use std::sync::Arc;

use mimalloc::MiMalloc;
use os_api::OS;
use startie::app::models::APP_VERSION;
use startie::{logging, AppState, LaunchSource, OsServices, Settings};
use tokio::task::LocalSet;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    logging::init();

    // Everything runs on this one thread; deferred work uses spawn_local
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start runtime");
            std::process::exit(1);
        }
    };

    LocalSet::new().block_on(&runtime, run());
}

async fn run() {
    let settings = Settings::from_env();
    info!(version = APP_VERSION, data_dir = %settings.data_dir.display(), "Startie starting");

    let os = Arc::new(OS::new(settings.login_item_label.clone()));
    let state = AppState::new(&settings, OsServices::from_platform(os));

    let source = LaunchSource::detect(state.auto_start_config().preferences(), std::env::args());
    info!(?source, groups = state.groups().len(), "Launch source detected");

    let report = state.auto_start().run(source, Some(state.groups()));
    info!(
        immediate = report.immediate.len(),
        deferred = report.deferred.len(),
        skipped = report.skipped.len(),
        "Auto-start pass finished"
    );

    let registrar = state.login_items().clone();
    let refresh_delay = settings.login_refresh_delay;
    tokio::task::spawn_local(async move {
        tokio::time::sleep(refresh_delay).await;
        registrar.refresh_registration();
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Startie stopping");
}
