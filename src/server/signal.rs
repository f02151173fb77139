// Signal handling module
//
// Supported signals:
// - SIGTERM: stop accepting and exit
// - SIGINT:  stop accepting and exit (Ctrl+C)

use crate::logger;

/// Resolves when the process is asked to terminate.
///
/// If a handler cannot be registered the failure is logged and that signal
/// is simply never observed; the default disposition still ends the process.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
            None
        }
    };

    let terminate = async {
        match sigterm.as_mut() {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for SIGINT: {e}"));
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = interrupt => logger::log_debug("SIGINT received"),
        () = terminate => logger::log_debug("SIGTERM received"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
