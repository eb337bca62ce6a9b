//! End-to-end `check` probes against a mock HTTP endpoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn mock_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "neo4j_version": "5.20.0",
            "neo4j_edition": "community",
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn check_succeeds_against_mock_endpoint() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mock_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"columns": ["1"], "data": [{"row": [1], "meta": [null]}]}],
            "errors": [],
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("graphping")
        .env("GRAPHPING_HOME", home.path())
        .args([
            "check",
            "--endpoint",
            &server.uri(),
            "--username",
            "neo4j",
            "--password",
            "secret",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 record(s)"));
}

#[tokio::test]
async fn check_reports_query_errors() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mock_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "errors": [{
                "code": "Neo.ClientError.Statement.SyntaxError",
                "message": "Invalid input",
            }],
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("graphping")
        .env("GRAPHPING_HOME", home.path())
        .args(["check", "--endpoint", &server.uri()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Neo.ClientError.Statement.SyntaxError"));
}

#[tokio::test]
async fn check_fails_when_auth_rejected() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("graphping")
        .env("GRAPHPING_HOME", home.path())
        .args([
            "check",
            "--endpoint",
            &server.uri(),
            "--username",
            "neo4j",
            "--password",
            "wrong",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 401"));
}

#[tokio::test]
async fn check_honors_database_override() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mock_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path("/db/movies/tx/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"columns": ["n"], "data": []}],
            "errors": [],
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("graphping")
        .env("GRAPHPING_HOME", home.path())
        .args([
            "check",
            "--endpoint",
            &server.uri(),
            "--database",
            "movies",
            "--query",
            "MATCH (n) RETURN n LIMIT 1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 0 record(s)"));
}
