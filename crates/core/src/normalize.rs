//! Reversed-word cleanup for rich-text input.
//!
//! Every alphabetic run of three or more letters is scored by how many common
//! English bigrams it contains, forwards and reversed. When the reversed form
//! scores strictly higher the run is replaced by its reversal. This is a
//! heuristic: some real words score higher reversed ("not" becomes "ton") and
//! are rewritten anyway. Applying it twice gives the same result as once.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Common English letter pairs. The three-letter entries never match a
/// two-letter window and so never contribute to a score.
const BIGRAMS: &[&str] = &[
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or", "te", "of",
    "ed", "is", "it", "al", "ar", "st", "to", "nt", "ng", "se", "ha", "as", "ou", "io", "le",
    "is", "ve", "co", "me", "de", "hi", "ri", "ro", "ic", "ne", "ll", "el", "lo", "wh", "sh",
    "ch", "pr", "pl", "tr", "qu", "re", "com", "con", "pro", "pre",
];

static BIGRAM_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| BIGRAMS.iter().copied().collect());

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{3,}").expect("valid regex"));

/// Markup that must pass through untouched: tags and character entities.
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|&[#A-Za-z0-9]+;").expect("valid regex"));

/// Number of known bigrams in `word`, case-insensitive.
pub fn englishness(word: &str) -> usize {
    let lower = word.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    bytes
        .windows(2)
        .filter(|pair| {
            std::str::from_utf8(pair)
                .map(|bg| BIGRAM_SET.contains(bg))
                .unwrap_or(false)
        })
        .count()
}

fn reversed(word: &str) -> String {
    word.chars().rev().collect()
}

/// Whether a single alphabetic token looks typed backwards.
pub fn should_reverse(word: &str) -> bool {
    if word.len() < 3 || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    englishness(&reversed(word)) > englishness(word)
}

/// Apply the cleanup to plain text.
pub fn normalize_text(text: &str) -> String {
    WORD_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            if should_reverse(word) {
                reversed(word)
            } else {
                word.to_string()
            }
        })
        .into_owned()
}

/// Apply the cleanup to the text nodes of an HTML fragment, leaving tags,
/// attributes and entities alone.
pub fn normalize_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for markup in MARKUP_RE.find_iter(html) {
        out.push_str(&normalize_text(&html[last..markup.start()]));
        out.push_str(markup.as_str());
        last = markup.end();
    }
    out.push_str(&normalize_text(&html[last..]));
    out
}
