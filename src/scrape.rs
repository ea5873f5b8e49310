use std::collections::HashSet;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, warn};

use crate::fetch;
use crate::parser;
use crate::store::SongRecord;

pub struct ScrapeOutcome {
    pub fetched: usize,
    pub failed: usize,
    pub already: usize,
    pub interrupted: bool,
}

/// Fetch and parse each song sequentially, appending to `songs`.
///
/// One worker, one fixed delay between consecutive fetches (a polite
/// self-throttle). A failed fetch skips that song and is not retried.
/// Ctrl-C breaks out immediately; everything gathered so far stays in
/// `songs`, which the caller persists on every exit path.
pub async fn scrape_songs(
    client: &Client,
    urls: &[String],
    delay: Duration,
    songs: &mut Vec<SongRecord>,
) -> ScrapeOutcome {
    let mut done: HashSet<String> = songs.iter().map(|s| s.url.clone()).collect();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut outcome = ScrapeOutcome {
        fetched: 0,
        failed: 0,
        already: 0,
        interrupted: false,
    };
    let mut first = true;

    for url in urls {
        if done.contains(url.as_str()) {
            outcome.already += 1;
            pb.inc(1);
            continue;
        }

        if !first {
            tokio::select! {
                _ = &mut ctrl_c => {
                    outcome.interrupted = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
        first = false;

        let body = tokio::select! {
            _ = &mut ctrl_c => {
                outcome.interrupted = true;
                break;
            }
            body = fetch::fetch_html(client, url) => body,
        };

        match body {
            Some(html) => {
                songs.push(parser::parse_song(url, &html));
                done.insert(url.clone());
                outcome.fetched += 1;
            }
            None => outcome.failed += 1,
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    if outcome.interrupted {
        warn!(
            "Interrupted after {} songs; partial output will be saved",
            outcome.fetched
        );
    }
    info!(
        "Scraped {} songs ({} failed, {} already present)",
        outcome.fetched, outcome.failed, outcome.already
    );
    outcome
}
