//! End-to-end tests for the check pipeline, driven against loopback HTTP
//! fixtures instead of the live network.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sitewatch::config::Config;
use sitewatch::extract::extract_visible_text;
use sitewatch::fingerprint::content_digest;
use sitewatch::monitor::{run_check, Outcome};
use sitewatch::state::{MonitorState, StateStore};
use tempfile::TempDir;

/// What one fixture connection observed.
struct Received {
    request_line: String,
    body: String,
}

/// Minimal HTTP fixture: accepts one connection per configured response,
/// answers it, and reports what it received.
fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim().is_empty() {
                    break;
                }
                if let Some(rest) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = rest.trim().parse().unwrap_or(0);
                }
            }

            let mut body_buf = vec![0u8; content_length];
            if content_length > 0 {
                reader.read_exact(&mut body_buf).unwrap();
            }

            let reason = if status < 400 { "OK" } else { "ERROR" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: text/html; charset=utf-8\r\n\
                 Content-Length: {len}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                len = body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();

            let _ = tx.send(Received {
                request_line: request_line.trim().to_string(),
                body: String::from_utf8_lossy(&body_buf).into_owned(),
            });
        }
    });

    (format!("http://{addr}/"), rx)
}

/// A webhook URL that refuses connections; reaching it fails the run, so a
/// successful run proves no notification was attempted.
const DEAD_WEBHOOK: &str = "http://127.0.0.1:1/";

const PAGE_V1: &str = "<html><head><title>Site</title></head>\
    <body><p>Model room open</p><script>var t = 1;</script></body></html>";
const PAGE_V2: &str = "<html><head><title>Site</title></head>\
    <body><p>Applications now closed</p><script>var t = 1;</script></body></html>";

fn page_digest(html: &str) -> String {
    content_digest(&extract_visible_text(html))
}

fn make_config(target_url: String, webhook_url: &str, dir: &TempDir) -> Config {
    Config {
        target_url,
        state_file: dir.path().join("state.json"),
        webhook_url: webhook_url.to_string(),
    }
}

fn seed_state(path: &Path, hash: &str) {
    StateStore::new(path)
        .save(&MonitorState {
            hash: Some(hash.to_string()),
            url: "https://example.com/seeded".to_string(),
            last_checked: "2020-01-01 00:00:00".to_string(),
            last_changed: None,
        })
        .unwrap();
}

#[test]
fn first_run_records_baseline_without_notifying() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, PAGE_V1.to_string())]);
    let config = make_config(page_url.clone(), DEAD_WEBHOOK, &dir);

    let outcome = run_check(&config).unwrap();
    assert_eq!(outcome, Outcome::FirstRun);

    let state = StateStore::new(&config.state_file).load().unwrap().unwrap();
    assert_eq!(state.hash, Some(page_digest(PAGE_V1)));
    assert_eq!(state.url, page_url);
    assert_eq!(state.last_changed, None);
    assert_eq!(state.last_checked.len(), 19);
}

#[test]
fn unchanged_content_updates_only_last_checked() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, PAGE_V1.to_string())]);
    let config = make_config(page_url, DEAD_WEBHOOK, &dir);
    seed_state(&config.state_file, &page_digest(PAGE_V1));

    let outcome = run_check(&config).unwrap();
    assert_eq!(outcome, Outcome::Unchanged);

    let state = StateStore::new(&config.state_file).load().unwrap().unwrap();
    assert_eq!(state.hash, Some(page_digest(PAGE_V1)));
    assert_eq!(state.last_changed, None);
    assert_ne!(state.last_checked, "2020-01-01 00:00:00");
}

#[test]
fn script_only_changes_do_not_count_as_a_change() {
    let rotated = PAGE_V1.replace("var t = 1;", "var t = 999; // new bundle");
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, rotated)]);
    let config = make_config(page_url, DEAD_WEBHOOK, &dir);
    seed_state(&config.state_file, &page_digest(PAGE_V1));

    assert_eq!(run_check(&config).unwrap(), Outcome::Unchanged);
}

#[test]
fn changed_content_notifies_and_persists() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, PAGE_V2.to_string())]);
    let (webhook_url, webhook_rx) = serve(vec![(204, String::new())]);
    let config = make_config(page_url.clone(), &webhook_url, &dir);
    seed_state(&config.state_file, &page_digest(PAGE_V1));

    let outcome = run_check(&config).unwrap();
    assert_eq!(outcome, Outcome::Changed);

    let received = webhook_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(received.request_line.starts_with("POST"));

    let payload: serde_json::Value = serde_json::from_str(&received.body).unwrap();
    let content = payload["content"].as_str().unwrap();
    assert!(content.contains("**【サイト変更検知】**"));
    assert!(content.contains(&page_url));
    assert!(content.contains("検知日時:"));
    assert!(content.ends_with("(JST)"));

    // Exactly one delivery.
    assert!(webhook_rx
        .recv_timeout(Duration::from_millis(200))
        .is_err());

    let state = StateStore::new(&config.state_file).load().unwrap().unwrap();
    assert_eq!(state.hash, Some(page_digest(PAGE_V2)));
    assert_eq!(state.last_changed.as_deref(), Some(state.last_checked.as_str()));
}

#[test]
fn fetch_failure_leaves_state_untouched() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(500, "boom".to_string())]);
    let config = make_config(page_url, DEAD_WEBHOOK, &dir);
    seed_state(&config.state_file, &page_digest(PAGE_V1));
    let before = fs::read(&config.state_file).unwrap();

    assert!(run_check(&config).is_err());
    assert_eq!(fs::read(&config.state_file).unwrap(), before);
}

#[test]
fn notify_failure_prevents_the_state_update() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, PAGE_V2.to_string())]);
    let (webhook_url, _webhook_rx) = serve(vec![(500, "rate limited".to_string())]);
    let config = make_config(page_url, &webhook_url, &dir);
    seed_state(&config.state_file, &page_digest(PAGE_V1));
    let before = fs::read(&config.state_file).unwrap();

    assert!(run_check(&config).is_err());
    // The detected change was not communicated, so the baseline must not move.
    assert_eq!(fs::read(&config.state_file).unwrap(), before);
}

#[test]
fn corrupt_state_file_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let (page_url, _page_rx) = serve(vec![(200, PAGE_V1.to_string())]);
    let config = make_config(page_url, DEAD_WEBHOOK, &dir);
    fs::write(&config.state_file, "{\"hash\": 42}").unwrap();
    let before = fs::read(&config.state_file).unwrap();

    assert!(run_check(&config).is_err());
    assert_eq!(fs::read(&config.state_file).unwrap(), before);
}
