//! devbot entry point

use anyhow::Context;
use devbot::config::AppConfig;
use devbot::gitlab::{GitLabClient, GitLabGateway};
use devbot::jenkins::JenkinsClient;
use devbot::merge::MergeOrchestrator;
use devbot::server::DevbotServer;
use devbot::tapd::TapdClient;
use devbot::types::PollPolicy;
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP protocol; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Arc::new(AppConfig::from_env().context("loading configuration")?);

    let gitlab: Arc<dyn GitLabGateway> = Arc::new(GitLabClient::new(
        &config.gitlab_base_url,
        config.gitlab_access_token.clone(),
    )?);
    let orchestrator = Arc::new(MergeOrchestrator::new(
        Arc::clone(&gitlab),
        PollPolicy::default(),
    ));
    let jenkins = Arc::new(JenkinsClient::new(
        &config.jenkins_base_url,
        config.jenkins_access_token.clone(),
    )?);
    let tapd = Arc::new(TapdClient::new(
        &config.tapd_base_url,
        config.tapd_access_token.clone(),
    )?);

    let server = DevbotServer::new(config, orchestrator, jenkins, tapd);

    tracing::info!("devbot MCP server running on stdio");
    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {e}"))?;
    service.waiting().await?;

    Ok(())
}
