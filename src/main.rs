use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};

use api_gateway::cli::{Cli, Commands, render_policies};
use api_gateway::gateway_config::ServerConfig;
use api_gateway::logging::init_tracing;
use api_gateway::metrics::{init_metrics, metrics_app};
use api_gateway::policy::PolicyTable;
use api_gateway::router::init_router;
use api_gateway::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let server = ServerConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(server).await,
        Commands::CheckPolicies { file } => {
            let path = file.or(server.policy_file);
            let table = PolicyTable::load(path.as_deref()).context("policy table is invalid")?;
            println!("{}", render_policies(&table));
            println!("\n✅ {} policies valid", table.len());
            Ok(())
        }
    }
}

async fn serve(server: ServerConfig) -> anyhow::Result<()> {
    init_tracing().context("failed to initialize logging")?;

    if let Some(handle) = init_metrics().context("failed to install metrics recorder")? {
        let metrics_listener = tokio::net::TcpListener::bind(server.metrics_address())
            .await
            .with_context(|| format!("failed to bind {}", server.metrics_address()))?;
        info!(address = %server.metrics_address(), "Metrics available at /metrics");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                warn!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state(&server).await?;
    info!(
        connections = state.registry.connection_count(),
        operations = state.dispatchers.len(),
        "Backend registry ready"
    );

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(server.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", server.bind_address()))?;

    info!("🚀 Server running on http://{}", server.bind_address());
    info!("📚 Swagger UI available at http://{}/swagger-ui", server.bind_address());
    info!("📖 Scalar UI available at http://{}/scalar", server.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
