//! Single-pool report: pool header, positions table and snapshots by owner.

use super::{
    symbols, write_pool_header, write_snapshot_line, write_stats, write_title, write_window,
};
use crate::errors::Result;
use crate::format::{format_timestamp, format_token_amount, short_address};
use crate::models::{Pool, Position, PositionSnapshot};
use crate::snapshots::{SnapshotStats, group_by_pool_and_owner};
use crate::subgraph::SubgraphClient;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PoolReport {
    pub pool: Pool,
    pub positions: Vec<Position>,
    pub snapshots: Vec<PositionSnapshot>,
    pub since: i64,
}

impl PoolReport {
    /// Issue the pool, positions and snapshot queries concurrently and wait for all three.
    pub async fn fetch(client: &SubgraphClient, pool_id: &str, since: i64) -> Result<Self> {
        let pool_ids = vec![pool_id.to_string()];
        let (pool, positions, snapshots) = futures::join!(
            client.fetch_pool(pool_id),
            client.fetch_positions(pool_id),
            client.fetch_snapshots(&pool_ids, since),
        );
        let report = Self {
            pool: pool?,
            positions: positions?,
            snapshots: snapshots?,
            since,
        };
        info!(
            pool_id,
            positions = report.positions.len(),
            snapshots = report.snapshots.len(),
            "[REPORT] pool data ready"
        );
        Ok(report)
    }

    pub fn active_positions(&self) -> usize {
        self.positions.iter().filter(|p| p.is_active()).count()
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sym0, sym1) = symbols(Some(&self.pool));

        write_title(f, "📈 Pool Snapshot Report")?;
        write_window(f, self.since)?;
        writeln!(f)?;
        write_pool_header(f, &self.pool)?;

        writeln!(f)?;
        writeln!(
            f,
            "📍 Positions: {} ({} active)",
            self.positions.len(),
            self.active_positions()
        )?;
        for p in &self.positions {
            writeln!(
                f,
                "   #{} owner {} | liq {} | ticks [{}, {}]",
                p.id,
                short_address(&p.owner),
                p.liquidity,
                p.tick_lower.index,
                p.tick_upper.index
            )?;
            writeln!(
                f,
                "      deposited {} {} / {} {} | withdrawn {} {} / {} {} | fees {} {} / {} {}",
                format_token_amount(&p.deposited_token0),
                sym0,
                format_token_amount(&p.deposited_token1),
                sym1,
                format_token_amount(&p.withdrawn_token0),
                sym0,
                format_token_amount(&p.withdrawn_token1),
                sym1,
                format_token_amount(&p.collected_fees_token0),
                sym0,
                format_token_amount(&p.collected_fees_token1),
                sym1,
            )?;
        }

        writeln!(f)?;
        writeln!(f, "🕒 Snapshots by user: {}", self.snapshots.len())?;
        if self.snapshots.is_empty() {
            writeln!(f, "   no snapshots in window")?;
        }
        for group in group_by_pool_and_owner(&self.snapshots) {
            for owner in &group.owners {
                let latest = &owner.snapshots[0];
                writeln!(
                    f,
                    "   👤 {} - {} snapshots, {} positions, latest {}",
                    owner.owner,
                    owner.snapshots.len(),
                    owner.positions().len(),
                    format_timestamp(latest.timestamp)
                )?;
                write_snapshot_line(f, "      ", latest, (sym0, sym1))?;
            }
        }

        write_stats(f, &SnapshotStats::from_snapshots(&self.snapshots))
    }
}
