use super::types::{
    OwnerGroup, PoolGroup, PositionGroup, PositionSummary, SnapshotStats, Timeline,
};
use crate::models::{PositionSnapshot, parse_amount};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::collections::HashMap;

/// Number of significant events shown per position.
pub const TIMELINE_LIMIT: usize = 10;

/// Group items by key, keeping first-seen key order and input order inside each group.
fn group_in_order<'a, F>(
    snapshots: impl IntoIterator<Item = &'a PositionSnapshot>,
    key: F,
) -> Vec<(String, Vec<PositionSnapshot>)>
where
    F: Fn(&PositionSnapshot) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<PositionSnapshot>)> = Vec::new();
    for snap in snapshots {
        let k = key(snap);
        match index.get(k) {
            Some(&i) => groups[i].1.push(snap.clone()),
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push((k.to_string(), vec![snap.clone()]));
            }
        }
    }
    groups
}

/// Partition snapshots by pool, then by owner.
pub fn group_by_pool_and_owner(snapshots: &[PositionSnapshot]) -> Vec<PoolGroup> {
    group_in_order(snapshots, |s| s.pool.id.as_str())
        .into_iter()
        .map(|(pool_id, pool_snaps)| PoolGroup {
            pool_id,
            owners: group_in_order(&pool_snaps, |s| s.owner.as_str())
                .into_iter()
                .map(|(owner, snapshots)| OwnerGroup { owner, snapshots })
                .collect(),
        })
        .collect()
}

/// Group by position id, most snapshots first. Ties keep first-seen order.
pub fn group_by_position(snapshots: &[PositionSnapshot]) -> Vec<PositionGroup> {
    let mut groups: Vec<PositionGroup> = group_in_order(snapshots, |s| s.position.id.as_str())
        .into_iter()
        .map(|(position_id, snapshots)| PositionGroup {
            position_id,
            snapshots,
        })
        .collect();
    // sort_by is stable
    groups.sort_by(|a, b| b.snapshots.len().cmp(&a.snapshots.len()));
    groups
}

/// Totals for one position. `snapshots` must be newest first.
pub fn summarize_position(position_id: &str, snapshots: &[PositionSnapshot]) -> PositionSummary {
    let mut summary = PositionSummary {
        position_id: position_id.to_string(),
        owner: snapshots.first().map(|s| s.owner.clone()).unwrap_or_default(),
        pool_id: snapshots
            .first()
            .map(|s| s.pool.id.clone())
            .unwrap_or_default(),
        snapshot_count: snapshots.len(),
        total_deposited0: BigDecimal::zero(),
        total_deposited1: BigDecimal::zero(),
        total_withdrawn0: BigDecimal::zero(),
        total_withdrawn1: BigDecimal::zero(),
        total_fees0: BigDecimal::zero(),
        total_fees1: BigDecimal::zero(),
        max_liquidity: 0,
        current_liquidity: snapshots.first().map(|s| s.liquidity).unwrap_or(0),
        first_seen: snapshots.last().map(|s| s.timestamp).unwrap_or(0),
        last_seen: snapshots.first().map(|s| s.timestamp).unwrap_or(0),
    };

    for snap in snapshots {
        summary.total_deposited0 += parse_amount(&snap.deposited_token0);
        summary.total_deposited1 += parse_amount(&snap.deposited_token1);
        summary.total_withdrawn0 += parse_amount(&snap.withdrawn_token0);
        summary.total_withdrawn1 += parse_amount(&snap.withdrawn_token1);
        summary.total_fees0 += parse_amount(&snap.collected_fees_token0);
        summary.total_fees1 += parse_amount(&snap.collected_fees_token1);
        summary.max_liquidity = summary.max_liquidity.max(snap.liquidity);
        summary.first_seen = summary.first_seen.min(snap.timestamp);
        summary.last_seen = summary.last_seen.max(snap.timestamp);
    }
    summary
}

impl PositionGroup {
    pub fn summary(&self) -> PositionSummary {
        summarize_position(&self.position_id, &self.snapshots)
    }
}

/// A snapshot is significant when any deposit, withdrawal or fee amount is non-zero.
pub fn is_significant(snap: &PositionSnapshot) -> bool {
    [
        &snap.deposited_token0,
        &snap.deposited_token1,
        &snap.withdrawn_token0,
        &snap.withdrawn_token1,
        &snap.collected_fees_token0,
        &snap.collected_fees_token1,
    ]
    .iter()
    .any(|raw| !parse_amount(raw).is_zero())
}

/// First `limit` significant events, in input order, plus how many were cut.
pub fn significant_events(snapshots: &[PositionSnapshot], limit: usize) -> Timeline {
    let significant: Vec<&PositionSnapshot> =
        snapshots.iter().filter(|s| is_significant(s)).collect();
    let remaining = significant.len().saturating_sub(limit);
    Timeline {
        events: significant.into_iter().take(limit).cloned().collect(),
        remaining,
    }
}

impl SnapshotStats {
    pub fn from_snapshots(snapshots: &[PositionSnapshot]) -> Self {
        if snapshots.is_empty() {
            return Self::default();
        }
        let owners = group_in_order(snapshots, |s| s.owner.as_str());
        let most_active_owner = owners
            .iter()
            .fold(None::<(&str, usize)>, |best, (owner, snaps)| match best {
                Some((_, n)) if n >= snaps.len() => best,
                _ => Some((owner.as_str(), snaps.len())),
            })
            .map(|(owner, n)| (owner.to_string(), n));

        Self {
            snapshots: snapshots.len(),
            pools: group_in_order(snapshots, |s| s.pool.id.as_str()).len(),
            owners: owners.len(),
            positions: group_in_order(snapshots, |s| s.position.id.as_str()).len(),
            earliest: snapshots.iter().map(|s| s.timestamp).min(),
            latest: snapshots.iter().map(|s| s.timestamp).max(),
            most_active_owner,
        }
    }
}
