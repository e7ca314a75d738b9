//! The check pipeline: fetch → extract → fingerprint → compare → notify → persist.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::clock;
use crate::config::Config;
use crate::extract::extract_visible_text;
use crate::fetch::PageFetcher;
use crate::fingerprint::content_digest;
use crate::notify;
use crate::state::{MonitorState, StateStore};

/// Decision for one run, made before any state is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No baseline digest yet; one is persisted silently.
    FirstRun,
    /// The baseline matches the current fingerprint.
    Unchanged,
    /// The fingerprint moved; a notification was sent.
    Changed,
}

impl Outcome {
    /// Pure decision policy, kept free of I/O so it is testable alone.
    pub fn evaluate(previous: Option<&str>, current: &str) -> Self {
        match previous {
            None => Outcome::FirstRun,
            Some(prev) if prev == current => Outcome::Unchanged,
            Some(_) => Outcome::Changed,
        }
    }
}

/// Run one full monitoring pass.
///
/// Every failure propagates: an aborted run leaves the previously persisted
/// state untouched, and a notification that cannot be delivered prevents the
/// state update that would otherwise mask the change.
pub fn run_check(config: &Config) -> Result<Outcome> {
    println!(
        "[{}] Fetching {} ...",
        clock::timestamp(),
        config.target_url.cyan()
    );

    let fetcher = PageFetcher::new().context("initializing HTTP client failed")?;
    let html = fetcher
        .fetch(&config.target_url)
        .context("page fetch failed")?;

    let content = extract_visible_text(&html);
    let current_hash = content_digest(&content);

    let store = StateStore::new(&config.state_file);
    let previous = store.load().context("loading previous state failed")?;
    let previous_hash = previous.as_ref().and_then(|state| state.hash.clone());
    let now = clock::timestamp();

    let outcome = Outcome::evaluate(previous_hash.as_deref(), &current_hash);
    match (outcome, previous) {
        (Outcome::FirstRun, _) => {
            println!("First run: saving current state.");
            store
                .save(&MonitorState {
                    hash: Some(current_hash),
                    url: config.target_url.clone(),
                    last_checked: now,
                    last_changed: None,
                })
                .context("persisting baseline state failed")?;
        }
        (Outcome::Unchanged, Some(mut state)) => {
            println!("No change detected.");
            state.last_checked = now;
            store
                .save(&state)
                .context("persisting check timestamp failed")?;
        }
        (Outcome::Changed, Some(mut state)) => {
            println!("{}", "Change detected!".yellow().bold());

            let message = notify::change_message(&config.target_url, &now);
            let status = notify::send(&config.webhook_url, &message)
                .context("change notification failed")?;
            println!("Discord notification delivered (status: {status}).");

            state.hash = Some(current_hash);
            state.last_checked = now.clone();
            state.last_changed = Some(now);
            store
                .save(&state)
                .context("persisting updated state failed")?;
            println!("State updated.");
        }
        (Outcome::Unchanged | Outcome::Changed, None) => {
            unreachable!("a missing state record always evaluates to FirstRun")
        }
    }

    Ok(outcome)
}
