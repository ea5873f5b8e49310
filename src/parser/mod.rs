pub mod lyrics;
pub mod meta;

use scraper::Html;

use crate::store::SongRecord;

/// Parse one fetched detail page into a song record. Every field other
/// than the URL degrades to empty/None on its own; a sparse page still
/// yields a record.
pub fn parse_song(url: &str, html: &str) -> SongRecord {
    let doc = Html::parse_document(html);
    SongRecord {
        url: url.to_string(),
        title: meta::title(&doc),
        artist: meta::artist(&doc),
        genre: meta::genre(&doc),
        lyrics: lyrics::extract(&doc),
        views: meta::views(&doc),
        favorites: meta::favorites(&doc),
        updated: meta::updated(&doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Counter;

    fn parse_fixture(name: &str) -> SongRecord {
        let html =
            std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        parse_song(&format!("https://hopamchuan.com/song/1/{}", name), &html)
    }

    #[test]
    fn song_page_full_record() {
        let record = parse_fixture("song");
        assert_eq!(record.title.as_deref(), Some("Mưa Trên Phố Huế"));
        assert_eq!(record.artist.as_deref(), Some("Minh Kỳ"));
        assert_eq!(record.genre.as_deref(), Some("Nhạc vàng"));
        assert_eq!(record.views, Some(Counter::Count(1234)));
        assert_eq!(record.favorites, Some(Counter::Count(56)));
        assert_eq!(record.updated.as_deref(), Some("12/03/2024"));
        assert_eq!(
            record.lyrics,
            "Chiều nay [Am] mưa trên phố Huế\n\
             Kiếp giang hồ [C] không bến đợi,\n\
             \n\
             Mà mưa sao vẫn rơi rơi hoài [E7]!"
        );
    }

    #[test]
    fn fallback_page_degrades_gracefully() {
        let record = parse_fixture("fallback");
        assert_eq!(record.title.as_deref(), Some("Dạ Cổ Hoài Lang"));
        // No author link on this layout; tail of the label is used.
        assert_eq!(record.artist.as_deref(), Some("Cao Văn Lầu"));
        assert_eq!(record.genre, None);
        assert_eq!(record.views, None);
        // Degraded mode: whole-sibling text, no chord tokens.
        assert_eq!(
            record.lyrics,
            "Từ là từ phu tướng\n\
             Báu kiếm sắc phán lên đàng\n\
             Vào ra luống trông tin nhạn"
        );
        assert!(!record.lyrics.contains('['));
    }

    #[test]
    fn bare_page_still_yields_a_record() {
        let record = parse_song(
            "https://hopamchuan.com/song/1/bare",
            "<html><body><p>under construction</p></body></html>",
        );
        assert_eq!(record.url, "https://hopamchuan.com/song/1/bare");
        assert_eq!(record.title, None);
        assert_eq!(record.lyrics, "");
    }
}
