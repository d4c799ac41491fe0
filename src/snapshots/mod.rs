pub mod filter;
pub mod grouping;
pub mod types;

pub use filter::filter_by_owners;
pub use grouping::{
    TIMELINE_LIMIT, group_by_pool_and_owner, group_by_position, is_significant,
    significant_events, summarize_position,
};
pub use types::{
    OwnerGroup, PoolGroup, PositionGroup, PositionSummary, SnapshotStats, Timeline,
};
