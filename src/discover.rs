use std::collections::HashSet;
use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::fetch::{self, BASE_URL};

const PAGE_STEP: usize = 10;

static SONG_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.song-item a.song-title").unwrap());
static BASE: LazyLock<Url> = LazyLock::new(|| Url::parse(BASE_URL).unwrap());

/// Deduplicated accumulator of discovered song URLs, first-seen order
/// preserved. Grows monotonically; nothing is ever removed.
#[derive(Debug, Default)]
pub struct LinkSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_urls(urls: Vec<String>) -> Self {
        let mut set = Self::new();
        for url in urls {
            set.insert(url);
        }
        set
    }

    /// Add a URL; returns true if it was not already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.order.push(url);
        true
    }

    pub fn urls(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub struct DiscoverOutcome {
    pub pages: usize,
    pub interrupted: bool,
}

/// Paginate every category listing, adding resolved song URLs to `links`.
///
/// A category ends on the first non-200 page, an empty page, or a page
/// of only already-seen URLs. Ctrl-C stops discovery; the caller
/// persists whatever was accumulated.
pub async fn collect_links(
    client: &Client,
    category_paths: &[String],
    links: &mut LinkSet,
) -> DiscoverOutcome {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut pages = 0usize;
    let mut interrupted = false;

    'categories: for path in category_paths {
        info!("Collecting {}", path);
        let mut offset = 0usize;
        loop {
            let page_url = format!("{}{}?offset={}", BASE_URL, path, offset);
            let body = tokio::select! {
                _ = &mut ctrl_c => {
                    warn!("Interrupted; stopping link discovery");
                    interrupted = true;
                    break 'categories;
                }
                body = fetch::fetch_html(client, &page_url) => body,
            };
            let Some(html) = body else { break };
            pages += 1;

            let new_count = record_listing(&html, links);
            if new_count == 0 {
                break;
            }
            offset += PAGE_STEP;
        }
    }

    DiscoverOutcome { pages, interrupted }
}

/// Resolve and record one listing page's song links; returns how many
/// were new. Zero terminates pagination for the category, whether the
/// page was empty or all of it had been seen before.
pub fn record_listing(html: &str, links: &mut LinkSet) -> usize {
    let mut new_count = 0;
    for href in listing_hrefs(html) {
        let Ok(resolved) = BASE.join(&href) else { continue };
        if links.insert(resolved.into()) {
            new_count += 1;
        }
    }
    new_count
}

/// Candidate song hrefs on one listing page, in document order.
fn listing_hrefs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&SONG_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_resolves_relative_and_absolute_hrefs() {
        let html = std::fs::read_to_string("tests/fixtures/listing.html").unwrap();
        let mut links = LinkSet::new();
        let added = record_listing(&html, &mut links);
        assert_eq!(added, 3);
        assert_eq!(
            links.urls(),
            &[
                "https://hopamchuan.com/song/1234/mua-tren-pho-hue".to_string(),
                "https://hopamchuan.com/song/5678/da-co-hoai-lang".to_string(),
                "https://hopamchuan.com/song/9012/ly-cay-bong".to_string(),
            ]
        );
    }

    #[test]
    fn discovery_is_idempotent() {
        let html = std::fs::read_to_string("tests/fixtures/listing.html").unwrap();
        let mut links = LinkSet::new();
        record_listing(&html, &mut links);
        let first_pass: Vec<String> = links.urls().to_vec();

        // Same content again: nothing new, order untouched.
        let added = record_listing(&html, &mut links);
        assert_eq!(added, 0);
        assert_eq!(links.urls(), first_pass.as_slice());
    }

    #[test]
    fn insert_preserves_first_seen_order() {
        let mut links = LinkSet::new();
        assert!(links.insert("https://hopamchuan.com/song/2/b".to_string()));
        assert!(links.insert("https://hopamchuan.com/song/1/a".to_string()));
        assert!(!links.insert("https://hopamchuan.com/song/2/b".to_string()));
        assert_eq!(links.len(), 2);
        assert_eq!(links.urls()[0], "https://hopamchuan.com/song/2/b");
    }

    #[test]
    fn seeding_from_file_contents_deduplicates() {
        let links = LinkSet::from_urls(vec![
            "https://hopamchuan.com/song/1/a".to_string(),
            "https://hopamchuan.com/song/1/a".to_string(),
        ]);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn empty_listing_yields_nothing() {
        let mut links = LinkSet::new();
        assert_eq!(record_listing("<html><body></body></html>", &mut links), 0);
        assert!(links.is_empty());
    }
}
