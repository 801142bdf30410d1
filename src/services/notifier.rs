//! User-visible notifications

use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fire-and-forget title/body message to the user.
///
/// Nothing is consumed from the user's response.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(title, body, "notification");
    }
}

/// Desktop notifications through `notify-send`
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    /// Spawns the command on the current tokio runtime; falls back to the log without one.
    fn notify(&self, title: &str, body: &str) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No runtime for desktop notification, logging instead");
            LogNotifier.notify(title, body);
            return;
        };

        let app_name = self.app_name.clone();
        let title = title.to_string();
        let body = body.to_string();
        runtime.spawn(async move {
            if let Err(e) = send_desktop_notification(&app_name, &title, &body).await {
                warn!("Desktop notification failed: {}", e);
                LogNotifier.notify(&title, &body);
            }
        });
    }
}

async fn send_desktop_notification(app_name: &str, title: &str, body: &str) -> Result<(), String> {
    debug!("Sending desktop notification: {}", title);

    let output = Command::new("notify-send")
        .args(["--app-name", app_name, title, body])
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("notify-send failed: {}", stderr));
    }

    Ok(())
}
