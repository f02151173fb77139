// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` and hand each to its own task.
///
/// The loop never waits on a connection. It returns once `shutdown`
/// completes; tasks still in flight are left to the runtime, which drops
/// them when it shuts down.
pub async fn run<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        // Per-connection failures such as EMFILE; keep accepting
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown("Shutdown signal received");
                return Ok(());
            }
        }
    }
}
