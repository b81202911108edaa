use depot_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, then real env wins)
    dotenv::dotenv().ok();

    print_banner();

    // 2. Configuration and logging
    let config = Config::from_env();
    let log_dir = format!("{}/logs", config.work_dir);
    depot_server::init_logger_with_file(&config.log_level, config.is_production(), Some(&log_dir))?;

    tracing::info!(environment = %config.environment, "Depot server starting...");

    // 3. State (store + orders manager)
    let state = ServerState::initialize(&config);

    // 4. Serve (background tasks start inside run())
    let server = Server::with_state(config, state);
    server.run().await
}
