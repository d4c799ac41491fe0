use anyhow::Result;
use subgraph_snapshots::{config::AppConfig, report::UserReport, subgraph::SubgraphClient, utils};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    let since = utils::window_start(config.lookback_days);
    tracing::info!(
        endpoint = %config.subgraph_url,
        token_id = %config.token_id,
        users = ?config.user_addresses,
        lookback_days = config.lookback_days,
        "[INIT] user-snapshots starting"
    );
    if config.user_addresses.is_empty() {
        tracing::warn!("[INIT] USER_ADDRESSES is empty, reporting every user");
    }

    let client = SubgraphClient::new(
        config.subgraph_url.clone(),
        config.page_size,
        config.max_pages,
    )?;
    match UserReport::fetch(&client, &config.token_id, &config.user_addresses, since).await {
        Ok(report) => println!("{report}"),
        Err(e) => tracing::error!(error = %e, "[REPORT] user report failed"),
    }
    Ok(())
}
