use crate::models::PositionSnapshot;
use bigdecimal::BigDecimal;

/// Snapshots of one pool, split by owner.
#[derive(Debug, Clone)]
pub struct PoolGroup {
    pub pool_id: String,
    pub owners: Vec<OwnerGroup>,
}

impl PoolGroup {
    pub fn snapshot_count(&self) -> usize {
        self.owners.iter().map(|o| o.snapshots.len()).sum()
    }
}

/// Snapshots of one owner within a pool, newest first.
#[derive(Debug, Clone)]
pub struct OwnerGroup {
    pub owner: String,
    pub snapshots: Vec<PositionSnapshot>,
}

impl OwnerGroup {
    /// Third grouping level: this owner's snapshots by position, most active first.
    pub fn positions(&self) -> Vec<PositionGroup> {
        super::group_by_position(&self.snapshots)
    }
}

/// Snapshots of one position, newest first.
#[derive(Debug, Clone)]
pub struct PositionGroup {
    pub position_id: String,
    pub snapshots: Vec<PositionSnapshot>,
}

/// Totals over all snapshots of one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSummary {
    pub position_id: String,
    pub owner: String,
    pub pool_id: String,
    pub snapshot_count: usize,
    pub total_deposited0: BigDecimal,
    pub total_deposited1: BigDecimal,
    pub total_withdrawn0: BigDecimal,
    pub total_withdrawn1: BigDecimal,
    pub total_fees0: BigDecimal,
    pub total_fees1: BigDecimal,
    pub max_liquidity: u128,
    /// Liquidity reported by the newest snapshot.
    pub current_liquidity: u128,
    pub first_seen: i64,
    pub last_seen: i64,
}

impl PositionSummary {
    pub fn net0(&self) -> BigDecimal {
        &self.total_deposited0 - &self.total_withdrawn0
    }

    pub fn net1(&self) -> BigDecimal {
        &self.total_deposited1 - &self.total_withdrawn1
    }
}

/// Truncated list of significant events.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub events: Vec<PositionSnapshot>,
    /// Significant events left out by the limit.
    pub remaining: usize,
}

/// Footer statistics for a set of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub snapshots: usize,
    pub pools: usize,
    pub owners: usize,
    pub positions: usize,
    pub earliest: Option<i64>,
    pub latest: Option<i64>,
    /// Owner with the most snapshots and their count.
    pub most_active_owner: Option<(String, usize)>,
}
