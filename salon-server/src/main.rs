use salon_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. dotenv, config, logging
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        "Salon server starting..."
    );

    // 2. Database and shared state
    let state = ServerState::initialize(&config).await?;

    // 3. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
