use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::store::Counter;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static GENRE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/genre/"]"#).unwrap());
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D+").unwrap());

// The site labels metadata with plain Vietnamese text. Each label is
// looked up through exactly one accessor below, so layout drift means
// touching one place.
const AUTHOR_LABEL: &str = "Tác giả:";
const VIEWS_LABEL: &str = "Lượt xem:";
const FAVORITES_LABEL: &str = "Yêu thích:";
const UPDATED_LABEL: &str = "Cập nhật:";

pub fn title(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
}

/// The first hyperlink after the author label in document order, or the
/// label's own tail when no link follows.
pub fn artist(doc: &Html) -> Option<String> {
    let mut label_text: Option<String> = None;
    for node in doc.tree.root().descendants() {
        match node.value() {
            Node::Text(t) if label_text.is_none() && t.contains(AUTHOR_LABEL) => {
                label_text = Some(t.to_string());
            }
            Node::Element(el) if label_text.is_some() && el.name() == "a" => {
                if let Some(a) = ElementRef::wrap(node) {
                    return Some(a.text().collect::<String>().trim().to_string());
                }
            }
            _ => {}
        }
    }
    label_tail(&label_text?)
}

pub fn genre(doc: &Html) -> Option<String> {
    doc.select(&GENRE_LINK)
        .next()
        .map(|a| a.text().collect::<String>().trim().to_string())
}

pub fn views(doc: &Html) -> Option<Counter> {
    counter(doc, VIEWS_LABEL)
}

pub fn favorites(doc: &Html) -> Option<Counter> {
    counter(doc, FAVORITES_LABEL)
}

/// Raw display string after the label, read from the parent element so
/// the date survives being split across inline tags. No date parsing.
pub fn updated(doc: &Html) -> Option<String> {
    let node = doc
        .tree
        .root()
        .descendants()
        .find(|n| matches!(n.value(), Node::Text(t) if t.contains(UPDATED_LABEL)))?;
    let full = node
        .parent()
        .and_then(ElementRef::wrap)
        .map(|el| el.text().collect::<String>())
        .or_else(|| match node.value() {
            Node::Text(t) => Some(t.to_string()),
            _ => None,
        })?;
    label_tail(&full)
}

/// Permissive numeric read: strip everything that is not a digit from
/// the label tail; keep the stripped string when it does not parse.
fn counter(doc: &Html, label: &str) -> Option<Counter> {
    let fragment = label_fragment(doc, label)?;
    let tail = label_tail(&fragment)?;
    let digits = NON_DIGIT.replace_all(&tail, "").into_owned();
    match digits.parse::<u64>() {
        Ok(n) => Some(Counter::Count(n)),
        Err(_) => Some(Counter::Raw(digits)),
    }
}

/// Text of the first fragment anywhere in the document containing `label`.
fn label_fragment(doc: &Html, label: &str) -> Option<String> {
    doc.tree.root().descendants().find_map(|node| match node.value() {
        Node::Text(t) if t.contains(label) => Some(t.to_string()),
        _ => None,
    })
}

/// Substring after the first colon, trimmed.
fn label_tail(fragment: &str) -> Option<String> {
    fragment
        .split_once(':')
        .map(|(_, tail)| tail.trim().to_string())
}
