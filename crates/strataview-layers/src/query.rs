//! Query-execution contract.
//!
//! The layer subsystem never talks to the network itself. It hands a
//! [`QueryKey`] to a [`QueryClient`], which owns caching, de-duplication of
//! identical in-flight requests and timeouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use strataview_core::FetchError;
use strataview_settings::QuerySettings;

use crate::setting::SettingValue;

/// Cache key of one query: endpoint plus positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub endpoint: String,
    pub args: Vec<SettingValue>,
}

impl QueryKey {
    pub fn new(endpoint: impl Into<String>, args: Vec<SettingValue>) -> Self {
        Self {
            endpoint: endpoint.into(),
            args,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.endpoint)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "]")
    }
}

/// Cache lifetimes passed with every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub cache_time: Duration,
}

impl From<&QuerySettings> for QueryOptions {
    fn from(settings: &QuerySettings) -> Self {
        Self {
            stale_time: settings.stale_time(),
            cache_time: settings.cache_time(),
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        (&QuerySettings::default()).into()
    }
}

/// Executes queries on behalf of layers.
#[async_trait(?Send)]
pub trait QueryClient {
    /// Resolve `key` to a JSON response body.
    async fn fetch_query(
        &self,
        key: QueryKey,
        options: QueryOptions,
    ) -> Result<serde_json::Value, FetchError>;

    /// Drop interest in `key`, called when a layer supersedes its query.
    fn cancel_query(&self, _key: &QueryKey) {}
}

/// Query client answering from a fixed table of responses.
///
/// Suitable for demos and tests; unknown keys fail with
/// [`FetchError::Query`].
#[derive(Debug, Default)]
pub struct InMemoryQueryClient {
    responses: RefCell<HashMap<QueryKey, Result<serde_json::Value, FetchError>>>,
    cancelled: RefCell<Vec<QueryKey>>,
    requests: RefCell<Vec<QueryKey>>,
}

impl InMemoryQueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: QueryKey, response: Result<serde_json::Value, FetchError>) {
        self.responses.borrow_mut().insert(key, response);
    }

    /// Keys requested so far, in order.
    pub fn requests(&self) -> Vec<QueryKey> {
        self.requests.borrow().clone()
    }

    /// Keys cancelled so far, in order.
    pub fn cancelled(&self) -> Vec<QueryKey> {
        self.cancelled.borrow().clone()
    }
}

#[async_trait(?Send)]
impl QueryClient for InMemoryQueryClient {
    async fn fetch_query(
        &self,
        key: QueryKey,
        _options: QueryOptions,
    ) -> Result<serde_json::Value, FetchError> {
        self.requests.borrow_mut().push(key.clone());
        let response = self.responses.borrow().get(&key).cloned();
        response.unwrap_or_else(|| {
            Err(FetchError::Query {
                endpoint: key.endpoint.clone(),
                message: "no response registered".to_string(),
            })
        })
    }

    fn cancel_query(&self, key: &QueryKey) {
        self.cancelled.borrow_mut().push(key.clone());
    }
}
