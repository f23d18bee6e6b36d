use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-z0-9]+").expect("valid regex");
}

/// Tokenize text into lowercase runs of ASCII letters and digits.
///
/// Order and duplicates are preserved: a term repeated in a query is scored
/// once per occurrence.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}
