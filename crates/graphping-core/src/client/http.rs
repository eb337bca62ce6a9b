//! Neo4j HTTP API client.
//!
//! The dial doubles as a discovery request against the endpoint root; each
//! query is a single autocommit transaction (`POST /db/{db}/tx/commit`).
//! A response with a non-empty `errors` array is a query failure even when
//! the HTTP status is 200.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{
    ClientError, Credentials, GraphClient, GraphConnection, GraphSession, RecordSummary,
};

/// Dials Neo4j HTTP endpoints.
pub struct HttpGraphClient {
    http: reqwest::Client,
    database: String,
}

impl HttpGraphClient {
    /// Creates a client issuing queries against the named database.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            database: database.into(),
        }
    }
}

#[async_trait]
impl GraphClient for HttpGraphClient {
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn GraphConnection>, ClientError> {
        let base = Url::parse(&credentials.endpoint)
            .map_err(|err| ClientError::with_details("invalid endpoint URL", err.to_string()))?;

        // Bad addresses, refused connections, and rejected credentials all
        // surface here, before any polling starts.
        let response = self
            .http
            .get(base.clone())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|err| ClientError::with_details("failed to reach endpoint", err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::new(format!(
                "endpoint refused discovery request: HTTP {}",
                response.status()
            )));
        }

        let commit_url = base
            .join(&format!("db/{}/tx/commit", self.database))
            .map_err(|err| ClientError::with_details("invalid endpoint URL", err.to_string()))?;

        debug!(endpoint = %base, "connection established");
        Ok(Arc::new(HttpConnection {
            http: self.http.clone(),
            commit_url,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        }))
    }
}

struct HttpConnection {
    http: reqwest::Client,
    commit_url: Url,
    username: String,
    password: String,
}

#[async_trait]
impl GraphConnection for HttpConnection {
    fn session(&self) -> Box<dyn GraphSession> {
        Box::new(HttpSession {
            http: self.http.clone(),
            commit_url: self.commit_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    async fn close(&self) -> Result<(), ClientError> {
        // Autocommit transactions hold no server-side state; dropping the
        // pooled HTTP connections is the whole teardown.
        Ok(())
    }
}

struct HttpSession {
    http: reqwest::Client,
    commit_url: Url,
    username: String,
    password: String,
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct TxError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl GraphSession for HttpSession {
    async fn read_only_query(&mut self, text: &str) -> Result<RecordSummary, ClientError> {
        let body = TxRequest {
            statements: vec![TxStatement { statement: text }],
        };

        let started = Instant::now();
        let response = self
            .http
            .post(self.commit_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|err| ClientError::with_details("query request failed", err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(format!("query rejected: HTTP {status}")));
        }

        let parsed: TxResponse = response
            .json()
            .await
            .map_err(|err| ClientError::with_details("malformed query response", err.to_string()))?;

        if let Some(first) = parsed.errors.first() {
            return Err(ClientError::with_details(
                first.code.clone(),
                first.message.clone(),
            ));
        }

        let records = parsed.results.iter().map(|result| result.data.len()).sum();
        Ok(RecordSummary {
            records,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), ClientError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_errors_is_a_query_failure() {
        let parsed: TxResponse = serde_json::from_str(
            r#"{"results":[],"errors":[{"code":"Neo.ClientError.Statement.SyntaxError","message":"Invalid input"}]}"#,
        )
        .unwrap();

        let first = parsed.errors.first().unwrap();
        assert_eq!(first.code, "Neo.ClientError.Statement.SyntaxError");
        assert_eq!(first.message, "Invalid input");
    }

    #[test]
    fn record_count_sums_across_results() {
        let parsed: TxResponse = serde_json::from_str(
            r#"{"results":[{"columns":["1"],"data":[{"row":[1]},{"row":[2]}]}],"errors":[]}"#,
        )
        .unwrap();

        let records: usize = parsed.results.iter().map(|result| result.data.len()).sum();
        assert_eq!(records, 2);
    }

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let parsed: TxResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
        assert!(parsed.errors.is_empty());
    }
}
