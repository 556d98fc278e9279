use anyhow::{Context, Result};
use rmcp::ServiceExt;
use slack_gateway::SlackGateway;
use slack_mcp_server::{Config, SlackMcpServer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(error) = run().await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let gateway = SlackGateway::new(config.bot_token, config.team_id)
        .context("failed to construct slack gateway")?;

    // Fail fast on bad credentials before the transport opens.
    let auth = gateway
        .get_auth_info()
        .await
        .context("Unable to authenticate with Slack. Please check your token.")?;
    tracing::info!(
        user_id = %auth.user_id,
        team_id = %auth.team_id,
        "connected to slack"
    );

    let server = SlackMcpServer::new(gateway);
    let service = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .context("failed to start MCP server on stdio")?;
    tracing::info!("slack mcp server running on stdio transport");

    tokio::select! {
        result = service.waiting() => {
            result.context("mcp service terminated abnormally")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutting down slack mcp server");
        }
    }
    Ok(())
}

/// stdout carries MCP framing, so diagnostics go to stderr only.
fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(error) => {
                tracing::warn!(%error, "failed to install sigterm handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
