use std::sync::Arc;

use academix_core::Aggregator;
use academix_mcp::AcademixMcp;
use rmcp::ServiceExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let email = std::env::var("ACADEMIC_MCP_EMAIL").ok();
    let semantic_scholar_api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
    let aggregator = Arc::new(Aggregator::new(email, semantic_scholar_api_key));

    let server = AcademixMcp::new(aggregator.clone());
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    aggregator.close().await;
    Ok(())
}
