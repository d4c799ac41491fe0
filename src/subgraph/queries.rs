//! GraphQL documents sent to the subgraph.

const POOL_FIELDS: &str = r"
    id
    token0 { id name symbol decimals }
    token1 { id name symbol decimals }
    feeTier
    liquidity
    tick
    volumeUSD
    totalValueLockedUSD
    txCount
";

const AMOUNT_FIELDS: &str = r"
    depositedToken0
    depositedToken1
    withdrawnToken0
    withdrawnToken1
    collectedFeesToken0
    collectedFeesToken1
";

pub fn pool_by_id() -> String {
    format!(
        "query PoolById($id: ID!) {{
  pool(id: $id) {{ {POOL_FIELDS} }}
}}"
    )
}

/// Pools holding the token on either side, fetched as two aliased selections.
pub fn pools_by_token() -> String {
    format!(
        "query PoolsByToken($token: String!, $first: Int!) {{
  asToken0: pools(first: $first, where: {{ token0: $token }}, orderBy: totalValueLockedUSD, orderDirection: desc) {{ {POOL_FIELDS} }}
  asToken1: pools(first: $first, where: {{ token1: $token }}, orderBy: totalValueLockedUSD, orderDirection: desc) {{ {POOL_FIELDS} }}
}}"
    )
}

pub fn positions_by_pool() -> String {
    format!(
        "query PositionsByPool($pool: String!, $first: Int!) {{
  positions(first: $first, where: {{ pool: $pool }}, orderBy: liquidity, orderDirection: desc) {{
    id
    owner
    liquidity
    {AMOUNT_FIELDS}
    tickLower {{ tickIdx }}
    tickUpper {{ tickIdx }}
    pool {{ id }}
  }}
}}"
    )
}

pub fn snapshots_by_pools() -> String {
    format!(
        "query SnapshotsByPools($pools: [String!]!, $since: BigInt!, $first: Int!, $skip: Int!) {{
  positionSnapshots(first: $first, skip: $skip, where: {{ pool_in: $pools, timestamp_gte: $since }}, orderBy: timestamp, orderDirection: desc) {{
    id
    owner
    pool {{ id }}
    position {{ id }}
    blockNumber
    timestamp
    liquidity
    {AMOUNT_FIELDS}
  }}
}}"
    )
}
