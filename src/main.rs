use clap::Parser;
use coi_serve::cli::CliArgs;
use coi_serve::config::{AppState, Config};
use coi_serve::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let cfg = Config::load(&args)?;
    cfg.validate()?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sizing worker threads from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let listener = server::create_listener(addr, cfg.performance.backlog).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;

    let state = Arc::new(AppState::new(cfg)?);
    logger::log_server_start(&addr, &state.root, &state.config);

    server::run(listener, state, server::shutdown_signal()).await?;
    Ok(())
}
