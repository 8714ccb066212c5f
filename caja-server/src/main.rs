use caja_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    // File logging only in production; stdout everywhere else
    let log_dir = config.is_production().then(|| config.logs_dir());
    init_logger_with_file(Some(&config.log_level), log_dir.as_deref());

    tracing::info!("Caja server starting...");

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
