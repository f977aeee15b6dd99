//! Remote table store access.
//!
//! The extractor needs exactly one capability from the outside world: a
//! range scan over a named table, filtered server-side on the `Timestamp`
//! field. [`ScanStore`] captures that capability. [`HttpStoreClient`]
//! implements it against the HTTP table-store gateway (feature
//! `http-store`), and [`MemoryStore`] implements it over plain vectors for
//! fixtures and tests.

use std::collections::HashMap;

#[cfg(any(feature = "http-store", test))]
use serde::{Deserialize, Serialize};

use crate::series::Reading;

/// Range-scan capability over the external dataset.
///
/// Implementations must return every record in range, driving pagination to
/// exhaustion, and must surface connectivity failures as errors rather than
/// an empty result.
pub trait ScanStore {
    /// Fetch every record in `table` with `lo <= Timestamp <= hi`
    /// (inclusive bounds). Record order is not guaranteed.
    fn scan_range(&self, table: &str, lo: i64, hi: i64) -> Result<Vec<Reading>, StoreError>;
}

/// Store access error types.
#[derive(Debug)]
pub enum StoreError {
    /// Configuration error (bad endpoint, unknown table)
    Config(String),
    /// Connectivity error; always surfaced to the caller
    Network(String),
    /// Server returned an error response
    Server { status: u16, message: String },
    /// Response payload could not be decoded
    Deserialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "Store config error: {msg}"),
            StoreError::Network(msg) => write!(f, "Store network error: {msg}"),
            StoreError::Server { status, message } => {
                write!(f, "Store server error ({status}): {message}")
            }
            StoreError::Deserialize(msg) => write!(f, "Store deserialize error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Store endpoint configuration.
///
/// How these values are provisioned (environment, secrets manager, runtime
/// files) is the embedding application's concern; the client just takes
/// them as given.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store gateway host
    pub host: String,
    /// Store gateway port
    pub port: u16,
    /// Bearer authentication token
    pub token: String,
}

impl StoreConfig {
    /// Create a new store configuration.
    pub fn new(host: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            token: token.into(),
        }
    }

    /// Get the full store URL.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Get the scan endpoint URL.
    pub fn scan_url(&self) -> String {
        format!("{}/v1/scan", self.url())
    }

    /// Get the health check endpoint URL.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.url())
    }
}

/// One page of a scan request.
#[cfg(any(feature = "http-store", test))]
#[derive(Debug, Clone, Serialize)]
struct ScanRequest<'a> {
    table_name: &'a str,
    timestamp_from: i64,
    timestamp_to: i64,
    /// Continuation key from the previous page, absent on the first request
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive_start_key: Option<String>,
}

/// One page of scan results.
#[cfg(any(feature = "http-store", test))]
#[derive(Debug, Clone, Deserialize)]
struct ScanResponse {
    items: Vec<Reading>,
    /// Present when the server truncated the page; feed back as
    /// `exclusive_start_key` to continue
    #[serde(default)]
    last_evaluated_key: Option<String>,
}

/// In-memory store over fixed tables of readings.
///
/// Exists so the pipeline can run without a network in examples and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Reading>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a table of readings.
    pub fn insert_table(&mut self, name: impl Into<String>, readings: Vec<Reading>) {
        self.tables.insert(name.into(), readings);
    }
}

impl ScanStore for MemoryStore {
    fn scan_range(&self, table: &str, lo: i64, hi: i64) -> Result<Vec<Reading>, StoreError> {
        let readings = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::Config(format!("unknown table '{table}'")))?;

        Ok(readings
            .iter()
            .filter(|r| r.timestamp >= lo && r.timestamp <= hi)
            .cloned()
            .collect())
    }
}

/// Async HTTP client for the table-store gateway.
#[cfg(feature = "http-store")]
pub struct HttpStoreClient {
    config: StoreConfig,
    client: reqwest::Client,
    client_id: String,
}

#[cfg(feature = "http-store")]
impl HttpStoreClient {
    /// Create a new store client.
    pub fn new(config: StoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        // Generate client ID from hostname + instance
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let client_id = format!(
            "extractor-{}-{}",
            host,
            &uuid::Uuid::new_v4().to_string()[..8]
        );

        Self {
            config,
            client,
            client_id,
        }
    }

    /// Test connection to the store gateway.
    pub async fn test_connection(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }

    /// Scan a table for all records in the inclusive timestamp range,
    /// looping on the continuation key until the store reports exhaustion.
    pub async fn scan_range(
        &self,
        table: &str,
        lo: i64,
        hi: i64,
    ) -> Result<Vec<Reading>, StoreError> {
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let request = ScanRequest {
                table_name: table,
                timestamp_from: lo,
                timestamp_to: hi,
                exclusive_start_key: exclusive_start_key.take(),
            };

            let response = self
                .client
                .post(self.config.scan_url())
                .header("Authorization", format!("Bearer {}", self.config.token))
                .header("Content-Type", "application/json")
                .header("X-Client-Id", &self.client_id)
                .json(&request)
                .send()
                .await
                .map_err(|e| StoreError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(StoreError::Server {
                    status: status.as_u16(),
                    message,
                });
            }

            let page: ScanResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Deserialize(e.to_string()))?;

            pages += 1;
            items.extend(page.items);

            match page.last_evaluated_key {
                Some(key) => exclusive_start_key = Some(key),
                None => break,
            }
        }

        tracing::debug!(table, pages, records = items.len(), "scan complete");
        Ok(items)
    }

    /// Get the client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Blocking store client for the synchronous pipeline.
#[cfg(feature = "http-store")]
pub struct BlockingStoreClient {
    inner: HttpStoreClient,
    runtime: tokio::runtime::Runtime,
}

#[cfg(feature = "http-store")]
impl BlockingStoreClient {
    /// Create a new blocking store client.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: HttpStoreClient::new(config),
            runtime,
        })
    }

    /// Test connection to the store gateway.
    pub fn test_connection(&self) -> Result<bool, StoreError> {
        self.runtime.block_on(self.inner.test_connection())
    }

    /// Get the client ID.
    pub fn client_id(&self) -> &str {
        self.inner.client_id()
    }
}

#[cfg(feature = "http-store")]
impl ScanStore for BlockingStoreClient {
    fn scan_range(&self, table: &str, lo: i64, hi: i64) -> Result<Vec<Reading>, StoreError> {
        self.runtime.block_on(self.inner.scan_range(table, lo, hi))
    }
}
