use crate::config::MAX_SKIP;
use crate::errors::{AppError, Result};
use crate::models::{Pool, Position, PositionSnapshot};
use crate::subgraph::queries;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};
use url::Url;

const ACCEPT_GRAPHQL: &str = "application/graphql-response+json, application/json";

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

/// Decode a GraphQL response body into the shape of its `data` object.
///
/// A non-empty `errors` array wins over any `data` that came with it.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let resp: GraphQlResponse = serde_json::from_str(body)?;
    if let Some(errors) = resp.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(AppError::GraphQl(messages.join("; ")));
    }
    match resp.data {
        Some(Value::Null) | None => Err(AppError::MissingData),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}

#[derive(Debug, Deserialize)]
struct PoolData {
    pool: Option<Pool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolsByTokenData {
    #[serde(default)]
    as_token0: Vec<Pool>,
    #[serde(default)]
    as_token1: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
struct PositionsData {
    positions: Vec<Position>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotsData {
    position_snapshots: Vec<PositionSnapshot>,
}

/// Handle for querying one subgraph endpoint.
#[derive(Clone)]
pub struct SubgraphClient {
    http: Client,
    endpoint: Url,
    page_size: u32,
    max_pages: u32,
}

impl SubgraphClient {
    pub fn new(endpoint: Url, page_size: u32, max_pages: u32) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            endpoint,
            page_size,
            max_pages,
        })
    }

    /// POST one GraphQL document and decode its `data`. Single attempt, no retry.
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });
        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_GRAPHQL))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            // graphql-response+json servers report query errors with a 4xx status
            return match decode_response::<Value>(&text) {
                Err(e @ AppError::GraphQl(_)) => Err(e),
                _ => Err(AppError::Http {
                    status: status.as_u16(),
                    body: text,
                }),
            };
        }
        decode_response(&text)
    }

    /// Fetch one pool by id. A null pool is an error.
    pub async fn fetch_pool(&self, pool_id: &str) -> Result<Pool> {
        let data: PoolData = self
            .query(&queries::pool_by_id(), json!({ "id": pool_id }))
            .await
            .inspect_err(|e| error!(error = %e, pool_id, "[SUBGRAPH] pool query failed"))?;
        match data.pool {
            Some(pool) => {
                info!(pool_id, pair = %pool.pair(), "[SUBGRAPH] pool loaded");
                Ok(pool)
            }
            None => {
                error!(pool_id, "[SUBGRAPH] pool not found");
                Err(AppError::MissingEntity {
                    kind: "pool",
                    id: pool_id.to_string(),
                })
            }
        }
    }

    /// Pools that hold `token_id` as token0 or token1, by TVL descending.
    pub async fn fetch_pools_for_token(&self, token_id: &str) -> Result<Vec<Pool>> {
        let token_id = token_id.to_lowercase();
        let data: PoolsByTokenData = self
            .query(
                &queries::pools_by_token(),
                json!({ "token": token_id, "first": self.page_size }),
            )
            .await
            .inspect_err(|e| {
                error!(error = %e, token_id = %token_id, "[SUBGRAPH] pool discovery failed")
            })?;
        let pools = merge_pools(data.as_token0, data.as_token1);
        info!(token_id = %token_id, pools = pools.len(), "[SUBGRAPH] pools discovered");
        Ok(pools)
    }

    /// Positions of a pool by liquidity descending, one page.
    pub async fn fetch_positions(&self, pool_id: &str) -> Result<Vec<Position>> {
        let data: PositionsData = self
            .query(
                &queries::positions_by_pool(),
                json!({ "pool": pool_id, "first": self.page_size }),
            )
            .await
            .inspect_err(|e| error!(error = %e, pool_id, "[SUBGRAPH] positions query failed"))?;
        info!(pool_id, positions = data.positions.len(), "[SUBGRAPH] positions loaded");
        Ok(data.positions)
    }

    /// Snapshots of any of `pool_ids` at or after `since`, newest first.
    ///
    /// Pages with `first`/`skip` until a short page, `max_pages`, or the
    /// subgraph's skip limit.
    pub async fn fetch_snapshots(
        &self,
        pool_ids: &[String],
        since: i64,
    ) -> Result<Vec<PositionSnapshot>> {
        if pool_ids.is_empty() {
            return Ok(Vec::new());
        }
        let document = queries::snapshots_by_pools();
        let mut all = Vec::new();
        for page in 0..self.max_pages {
            let Some(skip) = page_offset(page, self.page_size) else {
                break;
            };
            let data: SnapshotsData = self
                .query(
                    &document,
                    json!({
                        "pools": pool_ids,
                        "since": since.to_string(),
                        "first": self.page_size,
                        "skip": skip,
                    }),
                )
                .await
                .inspect_err(|e| {
                    error!(error = %e, ?pool_ids, since, skip, "[SUBGRAPH] snapshot query failed")
                })?;
            let fetched = data.position_snapshots.len();
            debug!(page, fetched, "[SUBGRAPH] snapshot page");
            all.extend(data.position_snapshots);
            if fetched < self.page_size as usize {
                info!(snapshots = all.len(), since, "[SUBGRAPH] snapshots loaded");
                return Ok(all);
            }
        }
        warn!(
            snapshots = all.len(),
            max_pages = self.max_pages,
            "[SUBGRAPH] page cap reached, older snapshots omitted"
        );
        Ok(all)
    }
}

/// `skip` for a zero-based page, or `None` once it would pass [`MAX_SKIP`].
fn page_offset(page: u32, page_size: u32) -> Option<u32> {
    page.checked_mul(page_size).filter(|skip| *skip <= MAX_SKIP)
}

/// Merge both sides of a token lookup, dropping duplicates, TVL descending.
fn merge_pools(as_token0: Vec<Pool>, as_token1: Vec<Pool>) -> Vec<Pool> {
    let mut seen = HashSet::new();
    let mut pools: Vec<Pool> = as_token0
        .into_iter()
        .chain(as_token1)
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    pools.sort_by(|a, b| {
        let tvl_a = crate::models::parse_amount(&a.total_value_locked_usd);
        let tvl_b = crate::models::parse_amount(&b.total_value_locked_usd);
        tvl_b.cmp(&tvl_a)
    });
    pools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::subgraph::test_server::TestServer;

    #[test]
    fn decode_returns_data_field() {
        let body = r#"{"data":{"positions":[]}}"#;
        let data: PositionsData = decode_response(body).unwrap();
        assert!(data.positions.is_empty());
    }

    #[test]
    fn decode_reports_graphql_errors_even_with_data() {
        let body = r#"{"data":{"pool":null},"errors":[{"message":"bad field"},{"message":"again"}]}"#;
        let err = decode_response::<PoolData>(body).unwrap_err();
        match err {
            AppError::GraphQl(msg) => assert_eq!(msg, "bad field; again"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn decode_ignores_empty_errors_array() {
        let body = r#"{"data":{"positions":[]},"errors":[]}"#;
        assert!(decode_response::<PositionsData>(body).is_ok());
    }

    #[test]
    fn decode_rejects_missing_or_null_data() {
        assert!(matches!(
            decode_response::<PoolData>(r#"{}"#),
            Err(AppError::MissingData)
        ));
        assert!(matches!(
            decode_response::<PoolData>(r#"{"data":null}"#),
            Err(AppError::MissingData)
        ));
    }

    #[test]
    fn decode_surfaces_malformed_json() {
        assert!(matches!(
            decode_response::<PoolData>("<html>"),
            Err(AppError::SerdeJson(_))
        ));
    }

    #[test]
    fn null_pool_decodes_to_none() {
        let data: PoolData = decode_response(r#"{"data":{"pool":null}}"#).unwrap();
        assert!(data.pool.is_none());
    }

    #[test]
    fn merge_dedups_and_orders_by_tvl() {
        let mut small = fixtures::pool("0xsmall");
        small.total_value_locked_usd = "10".into();
        let mut big = fixtures::pool("0xbig");
        big.total_value_locked_usd = "1000".into();
        let dup = fixtures::pool("0xsmall");

        let merged = merge_pools(vec![small], vec![big, dup]);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["0xbig", "0xsmall"]);
    }

    fn local_client() -> SubgraphClient {
        SubgraphClient::new(Url::parse("http://127.0.0.1:9/").unwrap(), 10, 1).unwrap()
    }

    #[tokio::test]
    async fn empty_pool_list_skips_the_network() {
        let client = local_client();
        let snaps = client.fetch_snapshots(&[], 0).await.unwrap();
        assert!(snaps.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        // nothing listens on the discard port
        let client = local_client();
        let err = client.fetch_pool("0xpool").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[test]
    fn page_offsets_stop_at_skip_limit() {
        assert_eq!(page_offset(0, 1000), Some(0));
        assert_eq!(page_offset(5, 1000), Some(5000));
        assert_eq!(page_offset(6, 1000), None);
        assert_eq!(page_offset(u32::MAX, 2), None);
    }

    #[tokio::test]
    async fn query_posts_json_envelope_with_graphql_accept() {
        let server = TestServer::start(|_| (200, r#"{"data":{"pool":null}}"#.into())).await;
        let client = SubgraphClient::new(server.url.clone(), 10, 1).unwrap();

        let data: PoolData = client
            .query(&queries::pool_by_id(), json!({ "id": "0xp" }))
            .await
            .unwrap();
        assert!(data.pool.is_none());

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert!(req.head.starts_with("POST / "));
        assert_eq!(req.header("accept"), Some(ACCEPT_GRAPHQL));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body = req.json();
        assert_eq!(body["query"], json!(queries::pool_by_id()));
        assert_eq!(body["variables"], json!({ "id": "0xp" }));
    }

    #[tokio::test]
    async fn error_status_with_graphql_errors_is_a_graphql_error() {
        let server =
            TestServer::start(|_| (400, r#"{"errors":[{"message":"bad"}]}"#.into())).await;
        let client = SubgraphClient::new(server.url.clone(), 10, 1).unwrap();
        let err = client
            .query::<PoolData>(&queries::pool_by_id(), json!({ "id": "0xp" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GraphQl(ref msg) if msg == "bad"), "{err:?}");
    }

    #[tokio::test]
    async fn other_error_status_is_an_http_error() {
        let server = TestServer::start(|_| (500, "oops".into())).await;
        let client = SubgraphClient::new(server.url.clone(), 10, 1).unwrap();
        let err = client
            .query::<PoolData>(&queries::pool_by_id(), json!({ "id": "0xp" }))
            .await
            .unwrap_err();
        match err {
            AppError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_pool_is_reported_by_id() {
        let server = TestServer::start(|_| (200, r#"{"data":{"pool":null}}"#.into())).await;
        let client = SubgraphClient::new(server.url.clone(), 10, 1).unwrap();
        let err = client.fetch_pool("0xgone").await.unwrap_err();
        match err {
            AppError::MissingEntity { kind, id } => {
                assert_eq!(kind, "pool");
                assert_eq!(id, "0xgone");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn snapshots_page_until_a_short_page() {
        let server = TestServer::start(|req| {
            let skip = req.json()["variables"]["skip"].as_u64().unwrap();
            let count = if skip == 0 { 2 } else { 1 };
            let page: Vec<_> = (0..count)
                .map(|i| {
                    let id = format!("s{}", skip + i);
                    fixtures::snapshot_json(&id, "0xpool", "0xowner", "1", 100, "1", "0")
                })
                .collect();
            (200, json!({ "data": { "positionSnapshots": page } }).to_string())
        })
        .await;
        let client = SubgraphClient::new(server.url.clone(), 2, 10).unwrap();

        let snaps = client
            .fetch_snapshots(&["0xpool".to_string()], 50)
            .await
            .unwrap();
        let ids: Vec<&str> = snaps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1", "s2"]);

        let mut skips: Vec<Value> = server
            .requests()
            .iter()
            .map(|r| r.json()["variables"]["skip"].clone())
            .collect();
        skips.sort_by_key(|v| v.as_u64());
        assert_eq!(skips, vec![json!(0), json!(2)]);
        let vars = server.requests()[0].json()["variables"].clone();
        assert_eq!(vars["pools"], json!(["0xpool"]));
        assert_eq!(vars["since"], json!("50"));
        assert_eq!(vars["first"], json!(2));
    }
}
