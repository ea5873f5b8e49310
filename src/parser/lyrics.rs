use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

static LYRIC_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#song-lyric").unwrap());
static PRE_WRAPPER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.pre").unwrap());
static CHORD_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.hopamchuan_chord").unwrap());
static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

/// Section title above the per-song chord table.
const CHORD_LIST_MARKER: &str = "Danh sách hợp âm";
/// Box that sits above the plain-text lyrics on container-less pages.
const EASY_CHORDS_MARKER: &str = "Hợp âm dễ";

/// Punctuation that must not be preceded by a space after reassembly.
const TIGHT_PUNCT: &[char] = &[',', '.', '!', '?', ';', ':'];

/// Extract the lyrics as plain text with chords re-inserted as
/// `[Chord]` tokens at their original positions.
///
/// When the structured container yields nothing, falls back to the
/// cruder preceding-sibling walk (whole-block granularity, no chord
/// re-insertion — a degraded mode, not a second source of truth). An
/// empty string means the page had neither layout.
pub fn extract(doc: &Html) -> String {
    let primary = reconstruct_chord_lines(doc);
    if !primary.is_empty() {
        return primary;
    }
    preceding_sibling_fallback(doc)
}

/// Primary path: walk the direct child blocks of `div#song-lyric` (or
/// its `div.pre` wrapper when present) and rebuild each line.
fn reconstruct_chord_lines(doc: &Html) -> String {
    let Some(container) = doc.select(&LYRIC_CONTAINER).next() else {
        return String::new();
    };
    let root = container.select(&PRE_WRAPPER).next().unwrap_or(container);

    let mut lines: Vec<String> = Vec::new();
    for child in root.children() {
        let Some(block) = ElementRef::wrap(child) else { continue };
        if block.value().name() != "div" {
            continue;
        }
        if has_class(block, "empty_line") {
            // Deliberate verse separator, preserved as a blank line.
            lines.push(String::new());
            continue;
        }
        if !has_class(block, "chord_lyric_line") {
            continue;
        }
        lines.push(reconstruct_line(block));
    }

    lines.join("\n").trim().to_string()
}

/// One chord-lyric block: its direct children are raw text runs, inline
/// chord wrappers, or arbitrary nested markup.
fn reconstruct_line(block: ElementRef) -> String {
    let mut assembled = String::new();
    for node in block.children() {
        match node.value() {
            Node::Text(text) => assembled.push_str(&text.replace('\u{a0}', " ")),
            Node::Element(el) => {
                let Some(el_ref) = ElementRef::wrap(node) else { continue };
                if el.classes().any(|c| c == "hopamchuan_chord_inline") {
                    // Chord name lives in a nested label span; the
                    // wrapper's own text is the fallback and may carry
                    // stray whitespace.
                    let chord = el_ref
                        .select(&CHORD_LABEL)
                        .next()
                        .map(flatten_text)
                        .unwrap_or_else(|| flatten_text(el_ref));
                    assembled.push('[');
                    assembled.push_str(chord.trim());
                    assembled.push(']');
                } else {
                    assembled.push_str(&flatten_text(el_ref));
                }
            }
            _ => {}
        }
    }

    let collapsed = assembled.split_whitespace().collect::<Vec<_>>().join(" ");
    tighten_punctuation(&collapsed)
}

/// Degraded mode for pages without the structured container: collect
/// the text of siblings preceding the chord-list heading, bounded
/// (exclusive) by the easy-chords box above them.
fn preceding_sibling_fallback(doc: &Html) -> String {
    let Some(heading) = doc
        .select(&HEADINGS)
        .find(|h| flatten_text(*h).contains(CHORD_LIST_MARKER))
    else {
        return String::new();
    };

    // Materialized up front so the walk and its exit condition stay
    // auditable; prev_siblings yields nearest-first.
    let preceding: Vec<_> = heading.prev_siblings().collect();

    let mut collected: Vec<String> = Vec::new();
    for node in preceding {
        let text = match node.value() {
            Node::Element(_) => {
                let Some(el) = ElementRef::wrap(node) else { continue };
                let text = flatten_text(el);
                if text.contains(EASY_CHORDS_MARKER) {
                    break; // boundary itself is excluded
                }
                text
            }
            Node::Text(t) => t.to_string(),
            _ => continue,
        };
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            collected.push(trimmed.to_string());
        }
    }

    // Walked bottom-up; restore document order.
    collected.reverse();
    collected.join("\n").trim().to_string()
}

fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn flatten_text(el: ElementRef) -> String {
    el.text().collect::<String>().replace('\u{a0}', " ")
}

/// "word ," → "word,". Runs after whitespace collapse, so at most one
/// space precedes each mark.
fn tighten_punctuation(line: &str) -> String {
    let mut out = line.to_string();
    for p in TIGHT_PUNCT {
        out = out.replace(&format!(" {}", p), &p.to_string());
    }
    out
}
