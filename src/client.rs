// HTTP collaborator for the booking API. The orchestrator only sees the
// ApiClient trait; live runs go through reqwest, tests through the scripted
// MockApi below. Expected-status checking happens here, so a mismatched
// status fails the call before any orchestration logic runs.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::env::Env;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Unexpected status for {method} {path}: expected {expected}, got {actual}")]
    UnexpectedStatus {
        method: &'static str,
        path: String,
        expected: u16,
        actual: u16,
        body: Value,
    },

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body for {method} {path}: {message}")]
    InvalidBody {
        method: &'static str,
        path: String,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Client initialization error: {0}")]
    Init(String),
}

#[async_trait]
pub trait ApiClient: Send + Sync + 'static {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError>;

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError>;

    async fn put(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError>;
}

// Shared clients stay usable behind Arc (test harnesses keep a handle to
// script responses while the orchestrator owns the other)
#[async_trait]
impl<C: ApiClient> ApiClient for std::sync::Arc<C> {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        (**self).get(path, query, expected_status, timeout).await
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        (**self)
            .post(path, query, body, expected_status, timeout)
            .await
    }

    async fn put(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        (**self).put(path, query, expected_status, timeout).await
    }
}

// Live client over reqwest. Sends the API key and JSON content type on every
// request; per-call timeouts come from the caller.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(env: &Env) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "X-Api-Key",
            reqwest::header::HeaderValue::from_str(&env.api_key)
                .map_err(|e| ClientError::Init(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            http,
            base_url: env.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn execute(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
        path: &str,
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout.as_millis() as u64)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let actual = response.status().as_u16();
        let raw = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if actual != expected_status {
            // Error bodies are not always JSON; carry what we can
            let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);
            return Err(TransportError::UnexpectedStatus {
                method,
                path: path.to_string(),
                expected: expected_status,
                actual,
                body,
            });
        }

        serde_json::from_slice(&raw).map_err(|e| TransportError::InvalidBody {
            method,
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let request = self.http.get(self.url(path)).query(query);
        self.execute("GET", request, path, expected_status, timeout)
            .await
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let request = self.http.post(self.url(path)).query(query).json(body);
        self.execute("POST", request, path, expected_status, timeout)
            .await
    }

    async fn put(
        &self,
        path: &str,
        query: &[(&str, String)],
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let request = self.http.put(self.url(path)).query(query);
        self.execute("PUT", request, path, expected_status, timeout)
            .await
    }
}

// Scripted in-process stand-in for the booking API, used by the lifecycle
// tests. Responses are queued per (method, path) and consumed in order;
// every request is recorded for assertions on what the orchestrator sent.
#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub query: Vec<(String, String)>,
        pub body: Option<Value>,
    }

    #[derive(Default)]
    pub struct MockApi {
        routes: Mutex<HashMap<(&'static str, String), VecDeque<(u16, Value)>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockApi {
        pub fn new() -> Self {
            Self::default()
        }

        // Queue a response for the next request matching method + path
        pub fn on(&self, method: &'static str, path: &str, status: u16, body: Value) {
            self.routes
                .lock()
                .entry((method, path.to_string()))
                .or_default()
                .push_back((status, body));
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().clone()
        }

        pub fn calls_to(&self, method: &'static str, path: &str) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .iter()
                .filter(|c| c.method == method && c.path == path)
                .cloned()
                .collect()
        }

        fn dispatch(
            &self,
            method: &'static str,
            path: &str,
            query: &[(&str, String)],
            body: Option<&Value>,
            expected_status: u16,
        ) -> Result<Value, TransportError> {
            self.calls.lock().push(RecordedCall {
                method,
                path: path.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                body: body.cloned(),
            });

            let scripted = self
                .routes
                .lock()
                .get_mut(&(method, path.to_string()))
                .and_then(|queue| queue.pop_front());

            match scripted {
                Some((status, body)) if status == expected_status => Ok(body),
                Some((status, body)) => Err(TransportError::UnexpectedStatus {
                    method,
                    path: path.to_string(),
                    expected: expected_status,
                    actual: status,
                    body,
                }),
                None => Err(TransportError::Network(format!(
                    "no scripted response for {method} {path}"
                ))),
            }
        }
    }

    #[async_trait]
    impl ApiClient for MockApi {
        async fn get(
            &self,
            path: &str,
            query: &[(&str, String)],
            expected_status: u16,
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            self.dispatch("GET", path, query, None, expected_status)
        }

        async fn post(
            &self,
            path: &str,
            query: &[(&str, String)],
            body: &Value,
            expected_status: u16,
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            self.dispatch("POST", path, query, Some(body), expected_status)
        }

        async fn put(
            &self,
            path: &str,
            query: &[(&str, String)],
            expected_status: u16,
            _timeout: Duration,
        ) -> Result<Value, TransportError> {
            self.dispatch("PUT", path, query, None, expected_status)
        }
    }
}
