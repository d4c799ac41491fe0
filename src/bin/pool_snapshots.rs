use anyhow::Result;
use subgraph_snapshots::{config::AppConfig, report::PoolReport, subgraph::SubgraphClient, utils};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    let since = utils::window_start(config.lookback_days);
    tracing::info!(
        endpoint = %config.subgraph_url,
        pool_id = %config.pool_id,
        lookback_days = config.lookback_days,
        "[INIT] pool-snapshots starting"
    );

    let client = SubgraphClient::new(
        config.subgraph_url.clone(),
        config.page_size,
        config.max_pages,
    )?;
    match PoolReport::fetch(&client, &config.pool_id, since).await {
        Ok(report) => println!("{report}"),
        Err(e) => tracing::error!(error = %e, "[REPORT] pool report failed"),
    }
    Ok(())
}
