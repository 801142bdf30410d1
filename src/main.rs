//! Focus Timer - a single-timer focus daemon
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use focus_timer::{
    api::create_router,
    clock::SystemClock,
    config::{Config, NotifierKind},
    services::{check_notify_send_available, DesktopNotifier, LogNotifier, Notifier},
    state::{AppState, FocusTimer, Resume},
    storage::{FileStore, KeyValueStore, MemoryStore},
    utils::{format_clock, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, focus={}min",
          config.host, config.port, config.focus_minutes);

    let store: Arc<dyn KeyValueStore> = if config.ephemeral {
        info!("Ephemeral mode, nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        let dir = config.resolved_data_dir();
        info!("Storing focus data in {}", dir.display());
        Arc::new(FileStore::new(dir))
    };

    let notifier: Arc<dyn Notifier> = match config.notifier {
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Desktop => {
            if let Err(e) = check_notify_send_available().await {
                warn!("{}", e);
            }
            Arc::new(DesktopNotifier::new("focus-timer"))
        }
    };

    // Resume a countdown interrupted by the last exit before serving anything
    let timer = Arc::new(FocusTimer::new(
        config.focus_minutes,
        store,
        notifier,
        Arc::new(SystemClock),
    ));
    if let Resume::Resumed(seconds_left) = timer.restore().await {
        info!("Focus session resumed at {}", format_clock(seconds_left));
    }

    let state = Arc::new(AppState::new(Arc::clone(&timer), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /start          - Start a focus session");
    info!("  POST   /stop           - Stop the running session and save it");
    info!("  PUT    /focus-minutes  - Set the session length while idle");
    info!("  GET    /status         - Timer state and today's total");
    info!("  GET    /sessions       - Session history");
    info!("  DELETE /sessions       - Clear session history");
    info!("  GET    /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // A running countdown keeps its snapshot and resumes on the next launch
    timer.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
