use std::collections::HashSet;
use std::sync::LazyLock;

static PROFANE_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["kerfuffle", "sharbert", "fornax"]));

/// Mask banned words in a chirp body.
///
/// Matching is exact-token after a naive single-space split: lower-cased
/// tokens are looked up in the banned set and replaced with `****`.
/// Substrings ("kerfufflez") and punctuation-adjacent forms ("kerfuffle!")
/// pass through untouched, and spacing is reproduced as-is.
pub fn clean(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
