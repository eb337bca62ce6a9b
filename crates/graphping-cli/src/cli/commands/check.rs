//! One-shot connectivity check.
//!
//! Same path a single poll tick takes: dial, scoped session, one read-only
//! query, close everything. The exit code reflects the outcome.

use anyhow::{Context, Result};
use graphping_core::client::{Credentials, GraphClient, HttpGraphClient, Query};
use graphping_core::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    graphping_core::logging::init_stderr();

    let client = HttpGraphClient::new(config.database.clone());
    let credentials = Credentials {
        endpoint: config.endpoint.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
    };
    let query = Query::new(config.query.clone());

    let connection = client
        .connect(&credentials)
        .await
        .with_context(|| format!("dial {}", credentials.endpoint))?;

    // Scoped session: opened right before the query, closed right after,
    // success or not.
    let mut session = connection.session();
    let outcome = session.read_only_query(query.as_str()).await;
    let session_closed = session.close().await;
    let connection_closed = connection.close().await;

    let summary = outcome.with_context(|| format!("run query `{query}`"))?;
    session_closed.context("close session")?;
    connection_closed.context("close connection")?;

    println!(
        "ok: {} record(s) in {} ms",
        summary.records, summary.latency_ms
    );
    Ok(())
}
