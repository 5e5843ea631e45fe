//! # Redis
//!
//! RAM-side of the read path.
//!
//! Core purpose is the cache-aside article listing plus atomic pageview
//! counters.
//!
//! ## Keys
//!
//! - `articles:all` (**string**, JSON listing): repopulated on every cache
//!   miss, expires after [`ARTICLES_CACHE_TTL_SECS`]
//! - `pageviews:article:{id}` (**int**): atomic INCR per view, no expiry
//!
//! ## Failure policy
//!
//! Cache reads and writes are best-effort. A failed read falls through to
//! Postgres with a warning, a failed write is logged and swallowed, and an
//! undecodable cached value counts as a miss. Only the pageview counter
//! surfaces Redis errors, since without INCR there is no result to return.

use std::time::Duration;

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::AppError;

pub const ARTICLES_CACHE_KEY: &str = "articles:all";
pub const ARTICLES_CACHE_TTL_SECS: u64 = 60;

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

/// Best-effort cache read. Any Redis or decode problem is a miss.
pub async fn cache_get<T: DeserializeOwned>(
    mut connection: ConnectionManager,
    key: &str,
) -> Option<T> {
    let raw: Option<String> = match connection.get(key).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Cache read for {key} failed: {e}");
            return None;
        }
    };

    decode_cached(key, &raw?)
}

/// An undecodable cached value counts as a miss.
fn decode_cached<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Cached value for {key} undecodable, treating as miss: {e}");
            None
        }
    }
}

/// Best-effort cache write with expiry. Failures are logged and swallowed.
pub async fn cache_set<T: Serialize>(
    mut connection: ConnectionManager,
    key: &str,
    value: &T,
    ttl_secs: u64,
) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to serialize cache value for {key}: {e}");
            return;
        }
    };

    match connection.set_ex::<_, _, ()>(key, raw, ttl_secs).await {
        Ok(()) => debug!("Cache set for {key}"),
        Err(e) => warn!("Failed to set cache for {key}: {e}"),
    }
}

/// Atomic pageview increment. This one propagates Redis errors.
pub async fn increment_counter(
    mut connection: ConnectionManager,
    key: &str,
) -> Result<i64, AppError> {
    Ok(connection.incr(key, 1).await?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn malformed_cached_json_is_a_miss() {
        assert_eq!(
            decode_cached::<Vec<i64>>(ARTICLES_CACHE_KEY, "{not json"),
            None
        );
        assert_eq!(decode_cached::<Vec<i64>>(ARTICLES_CACHE_KEY, ""), None);
    }

    #[test]
    fn wrong_shape_is_also_a_miss() {
        // Valid JSON that doesn't match the expected listing type.
        assert_eq!(
            decode_cached::<Vec<i64>>(ARTICLES_CACHE_KEY, r#"{"id": 1}"#),
            None
        );
    }

    #[test]
    fn valid_cached_json_decodes() {
        assert_eq!(
            decode_cached::<Vec<i64>>(ARTICLES_CACHE_KEY, "[1, 2, 3]"),
            Some(vec![1, 2, 3])
        );
    }
}
