//! Command line behavior against local mock backends.

use std::process::Output;

use tokio::process::Command;

mod common;

async fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resilient-fetch"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .output()
        .await
        .expect("failed to run resilient-fetch")
}

#[tokio::test]
async fn test_prints_json_on_success() {
    let addr = common::start_mock_backend(200, r#"{"id":1}"#).await;
    let url = format!("http://{addr}/api/users?page=2");

    let output = run_cli(&[&url, "--log-level", "error"]).await;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("\"id\": 1"));
    assert!(stdout.trim_end().ends_with("API call execution complete."));
}

#[tokio::test]
async fn test_prints_user_message_and_logs_failure() {
    let addr = common::start_mock_backend(503, "busy").await;
    let url = format!("http://{addr}/");
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("app.log");

    let output = run_cli(&[
        &url,
        "--max-retries",
        "1",
        "--backoff-factor",
        "0",
        "--log-level",
        "error",
        "--log-file",
        log_file.to_str().unwrap(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("A server error occurred. Please try again later."));
    assert!(String::from_utf8_lossy(&output.stdout).contains("API call execution complete."));

    let log = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(
        log,
        format!("resilient_fetch - ERROR - HTTP error occurred: 503 Server Error: Service Unavailable for url: {url}\n")
    );
}

#[tokio::test]
async fn test_stderr_shows_only_the_user_message() {
    let addr = common::closed_port().await;
    let url = format!("http://{addr}/");

    let output = run_cli(&[&url]).await;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "Failed to connect to the server. Please check your network connection.\n"
    );
}

#[tokio::test]
async fn test_bad_config_exits_with_2() {
    let output = run_cli(&["http://localhost/", "--timeout", "0"]).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[tokio::test]
async fn test_missing_url_exits_with_2() {
    let output = run_cli(&[]).await;
    assert_eq!(output.status.code(), Some(2));
}
