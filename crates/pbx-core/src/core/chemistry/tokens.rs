use regex::Regex;
use std::sync::LazyLock;

// An uppercase letter followed by every lowercase letter after it. Taking the
// whole lowercase run keeps `Feo2` from yielding a spurious `Fe`.
static ELEMENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]*").expect("element token pattern is valid"));

/// Splits a formula-like name (`Fe2O3(s)`, `Fe[+3]`, `NiOOH`) into its
/// element-symbol tokens, in order of appearance.
pub fn element_tokens(name: &str) -> impl Iterator<Item = &str> {
    ELEMENT_TOKEN.find_iter(name).map(|m| m.as_str())
}

/// Whether `symbol` occurs in `name` as a whole element token, i.e. followed
/// by an uppercase letter, digit, punctuation or end of string.
pub fn contains_element_token(name: &str, symbol: &str) -> bool {
    element_tokens(name).any(|token| token == symbol)
}
