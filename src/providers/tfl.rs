//! TfL Unified API client.
//!
//! Every request is an HTTP GET against the configured base URL with the
//! two authentication query parameters (`app_id`, `app_key`) appended, and
//! the JSON body decoded with the fixed wire date formats. Requests are
//! bounded by a semaphore and each one emits a diagnostics log entry on a
//! broadcast channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TflConfig;

#[derive(Debug, Error)]
pub enum TflError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// TfL API request log for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct TflRequestLog {
    /// Unique request ID
    pub id: String,
    /// Timestamp when request was made
    pub timestamp: String,
    /// HTTP method (always GET)
    pub method: String,
    /// API endpoint called (path without query)
    pub endpoint: String,
    /// Request parameters
    pub params: Option<HashMap<String, String>>,
    /// Duration of request in milliseconds
    pub duration_ms: u64,
    /// HTTP status code
    pub status: u16,
    /// Response size in bytes
    pub response_size: Option<usize>,
    /// Error message if request failed
    pub error: Option<String>,
}

/// Sender for TfL request diagnostics
pub type TflRequestSender = broadcast::Sender<TflRequestLog>;

/// Client for the TfL Unified API
pub struct TflClient {
    client: Client,
    config: TflConfig,
    /// Semaphore to limit concurrent requests
    rate_limiter: Arc<Semaphore>,
    /// Sender for request diagnostics
    diagnostics_tx: broadcast::Sender<TflRequestLog>,
}

impl TflClient {
    pub fn new(
        config: TflConfig,
        diagnostics_tx: broadcast::Sender<TflRequestLog>,
    ) -> Result<Self, TflError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TflError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
            config,
            diagnostics_tx,
        })
    }

    /// Send a diagnostics log entry
    fn log_request(&self, log: TflRequestLog) {
        // Ignore send errors - they just mean no one is listening
        let _ = self.diagnostics_tx.send(log);
    }

    /// Build the absolute request URL: percent-encode spaces and append the
    /// authentication parameters unless the caller already set them.
    fn build_url(&self, path_and_query: &str) -> String {
        let mut url = format!(
            "{}{}",
            self.config.base_url,
            path_and_query.replace(' ', "%20")
        );
        if !url.contains("app_id=") {
            push_query_param(&mut url, "app_id", &self.config.app_id);
        }
        if !url.contains("app_key=") {
            push_query_param(&mut url, "app_key", &self.config.app_key);
        }
        url
    }

    /// GET a resource and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, TflError> {
        let body = self.get_text(path_and_query).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(
                endpoint = endpoint_of(path_and_query),
                "Failed to parse TfL response: {} - body: {}",
                e,
                &body[..body.len().min(500)]
            );
            TflError::ParseError(e.to_string())
        })
    }

    /// GET a resource that answers with either a JSON array or, for a
    /// single-element request, a bare object. Tries the array decoding
    /// first and falls back to single-object decoding on the same body.
    pub async fn get_array_or_single<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Vec<T>, TflError> {
        let body = self.get_text(path_and_query).await?;
        match serde_json::from_str::<Vec<T>>(&body) {
            Ok(values) => Ok(values),
            Err(array_err) => match serde_json::from_str::<T>(&body) {
                Ok(single) => {
                    warn!(
                        endpoint = endpoint_of(path_and_query),
                        "Array decode failed, response was a bare object"
                    );
                    Ok(vec![single])
                }
                Err(_) => {
                    warn!(
                        endpoint = endpoint_of(path_and_query),
                        "Failed to parse TfL response: {} - body: {}",
                        array_err,
                        &body[..body.len().min(500)]
                    );
                    Err(TflError::ParseError(array_err.to_string()))
                }
            },
        }
    }

    /// Perform the GET and return the raw body, logging the request to the
    /// diagnostics channel whatever the outcome.
    async fn get_text(&self, path_and_query: &str) -> Result<String, TflError> {
        let _permit = self
            .rate_limiter
            .acquire()
            .await
            .expect("Semaphore closed unexpectedly");

        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let endpoint = endpoint_of(path_and_query).to_string();
        let params = query_params_of(path_and_query);
        let url = self.build_url(path_and_query);

        debug!(url = %url, "TfL request");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.log_request(TflRequestLog {
                    id: request_id,
                    timestamp: Utc::now().to_rfc3339(),
                    method: "GET".to_string(),
                    endpoint,
                    params,
                    duration_ms: start.elapsed().as_millis() as u64,
                    status: 0,
                    response_size: None,
                    error: Some(e.to_string()),
                });
                return Err(TflError::NetworkError(e.to_string()));
            }
        };

        let status = response.status().as_u16();

        if !response.status().is_success() {
            self.log_request(TflRequestLog {
                id: request_id,
                timestamp: Utc::now().to_rfc3339(),
                method: "GET".to_string(),
                endpoint,
                params,
                duration_ms: start.elapsed().as_millis() as u64,
                status,
                response_size: None,
                error: Some(format!("HTTP error: {}", status)),
            });
            return Err(TflError::ApiError(format!("HTTP error: {}", status)));
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                self.log_request(TflRequestLog {
                    id: request_id,
                    timestamp: Utc::now().to_rfc3339(),
                    method: "GET".to_string(),
                    endpoint,
                    params,
                    duration_ms: start.elapsed().as_millis() as u64,
                    status,
                    response_size: None,
                    error: Some(format!("Failed to read body: {}", e)),
                });
                return Err(TflError::NetworkError(e.to_string()));
            }
        };

        self.log_request(TflRequestLog {
            id: request_id,
            timestamp: Utc::now().to_rfc3339(),
            method: "GET".to_string(),
            endpoint,
            params,
            duration_ms: start.elapsed().as_millis() as u64,
            status,
            response_size: Some(body.len()),
            error: None,
        });

        Ok(body)
    }
}

fn push_query_param(url: &mut String, key: &str, value: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(key);
    url.push('=');
    url.push_str(&urlencoding::encode(value));
}

/// The path portion of a request, used as the diagnostics endpoint label.
fn endpoint_of(path_and_query: &str) -> &str {
    path_and_query
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(path_and_query)
}

/// The query portion of a request, split into a diagnostics parameter map.
fn query_params_of(path_and_query: &str) -> Option<HashMap<String, String>> {
    let (_, query) = path_and_query.split_once('?')?;
    let params: HashMap<String, String> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Some(params)
}
