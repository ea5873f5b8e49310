use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::discover::LinkSet;

/// One scraped song. Built once per successfully fetched detail page,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub url: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub lyrics: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Counter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Counter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Engagement counter captured from display text: an integer when the
/// digits-stripped remainder parsed cleanly, the raw stripped string
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Counter {
    Count(u64),
    Raw(String),
}

/// Load a previously collected link file. Missing or unreadable files
/// reset to an empty set rather than failing the run.
pub fn load_links(path: &Path) -> LinkSet {
    let Ok(raw) = fs::read_to_string(path) else {
        return LinkSet::new();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(urls) => LinkSet::from_urls(urls),
        Err(e) => {
            warn!("Ignoring unreadable links file {}: {}", path.display(), e);
            LinkSet::new()
        }
    }
}

pub fn save_links(path: &Path, links: &LinkSet) -> Result<()> {
    let json = serde_json::to_string_pretty(links.urls())?;
    write_atomic(path, &json)
}

/// Load a previous output file so reruns can resume. Same leniency as
/// [`load_links`].
pub fn load_songs(path: &Path) -> Vec<SongRecord> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(songs) => songs,
        Err(e) => {
            warn!("Ignoring unreadable output file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn save_songs(path: &Path, songs: &[SongRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(songs)?;
    write_atomic(path, &json)
}

/// Write to a sibling temp file and rename over the destination, so an
/// interrupted run never leaves a truncated file behind.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hac_scraper_{}_{}", std::process::id(), name))
    }

    fn sample_record(i: usize) -> SongRecord {
        SongRecord {
            url: format!("https://hopamchuan.com/song/{}/x", i),
            title: Some(format!("Song {}", i)),
            artist: None,
            genre: None,
            lyrics: "la [Am] la".to_string(),
            views: Some(Counter::Count(10 + i as u64)),
            favorites: None,
            updated: None,
        }
    }

    #[test]
    fn interrupted_run_keeps_assembled_records() {
        let path = temp_path("partial.json");
        let all: Vec<SongRecord> = (0..5).map(sample_record).collect();

        // Interruption after 3 of 5: only what was assembled is flushed.
        save_songs(&path, &all[..3]).unwrap();

        let loaded = load_songs(&path);
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].url, all[0].url);
        assert_eq!(loaded[2].views, Some(Counter::Count(12)));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_output_file_resets_to_empty() {
        let path = temp_path("malformed.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_songs(&path).is_empty());
        assert!(load_links(&path).is_empty());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_files_load_as_empty() {
        let path = temp_path("does_not_exist.json");
        assert!(load_songs(&path).is_empty());
        assert!(load_links(&path).is_empty());
    }

    #[test]
    fn links_round_trip_preserves_order() {
        let path = temp_path("links.json");
        let mut links = LinkSet::new();
        links.insert("https://hopamchuan.com/song/2/b".to_string());
        links.insert("https://hopamchuan.com/song/1/a".to_string());
        save_links(&path, &links).unwrap();

        let loaded = load_links(&path);
        assert_eq!(loaded.urls(), links.urls());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn counter_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Counter::Count(1234)).unwrap(), "1234");
        assert_eq!(
            serde_json::to_string(&Counter::Raw(String::new())).unwrap(),
            "\"\""
        );
        let back: Counter = serde_json::from_str("1234").unwrap();
        assert_eq!(back, Counter::Count(1234));
    }

    #[test]
    fn record_without_counters_deserializes() {
        let json = r#"{"url":"https://hopamchuan.com/song/1/a","title":null,"artist":null,"genre":null,"lyrics":""}"#;
        let record: SongRecord = serde_json::from_str(json).unwrap();
        assert!(record.views.is_none());
        assert!(record.updated.is_none());
    }
}
