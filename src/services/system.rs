//! Host tooling checks

use tokio::process::Command;
use tracing::info;

/// Check that `notify-send` can be executed
pub async fn check_notify_send_available() -> Result<(), String> {
    Command::new("notify-send")
        .arg("--version")
        .output()
        .await
        .map_err(|_| "notify-send is not available; desktop notifications need libnotify.".to_string())?;

    info!("notify-send is available");
    Ok(())
}
