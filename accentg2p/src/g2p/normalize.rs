use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that is not a word character, whitespace or an apostrophe.
    static ref STRIP_RE: Regex = Regex::new(r"[^\w\s']").unwrap();
}

/// Lowercases `text` and removes punctuation, keeping apostrophes.
pub fn normalize_text(text: &str) -> String {
    STRIP_RE.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Normalizes `text` and splits it into words.
pub fn words(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
