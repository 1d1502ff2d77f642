//! Lexical helpers shared by key normalization, analysis, and recall.
//!
//! Terms are lower-cased alphanumeric runs. Content terms additionally drop
//! stopwords and pass through a light plural stemmer so that `keys` and
//! `key` compare equal.

use std::collections::BTreeSet;

/// Words that carry no topical content.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "doing",
    "don", "for", "from", "get", "got", "had", "has", "have", "he", "her", "here", "hers", "him",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "know", "left", "let",
    "like", "me", "mine", "my", "no", "not", "now", "of", "off", "on", "or", "our", "ours", "out",
    "please", "put", "remember", "s", "she", "should", "so", "some", "tell", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "up",
    "us", "very", "was", "we", "were", "what", "when", "where", "which", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours",
];

/// Determiners dropped from subject phrases.
const DETERMINERS: &[&str] = &[
    "my", "the", "a", "an", "our", "your", "his", "her", "their", "this", "that", "these",
    "those",
];

/// Titles after which a lone `a` is an initial (`Mr.A`), not an article.
const TITLES: &[&str] = &["aunt", "dr", "miss", "mr", "mrs", "ms", "prof", "uncle"];

/// Whether a lower-cased word is a stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Lower-cased alphanumeric runs, possessive `'s` removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text
        .to_lowercase()
        .replace("'s", "")
        .replace("\u{2019}s", "");
    lowered
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fold simple English plurals: `memories -> memory`, `keys -> key`.
pub fn stem(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Stemmed, stopword-free terms in order of appearance (duplicates kept).
pub fn content_terms(text: &str, min_len: usize) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|word| word.chars().count() >= min_len && !is_stopword(word))
        .map(|word| stem(&word))
        .collect()
}

/// Distinct content terms of a text.
pub fn term_set(text: &str) -> BTreeSet<String> {
    content_terms(text, 1).into_iter().collect()
}

/// Normalize a subject phrase into a store key.
///
/// Determiners are dropped wherever they appear and the remaining words are
/// joined with `_`: `"my car keys"` becomes `car_keys`, `"the box of the
/// books"` becomes `box_of_books`. A lone `a` after a title is kept, so
/// `"Mr.A birthday"` becomes `mr_a_birthday`. Returns `None` when nothing
/// remains.
pub fn normalize_key(raw: &str) -> Option<String> {
    let mut kept: Vec<String> = Vec::new();
    for word in tokenize(raw) {
        let initial = word == "a"
            && kept
                .last()
                .is_some_and(|previous| TITLES.contains(&previous.as_str()));
        if !initial && DETERMINERS.contains(&word.as_str()) {
            continue;
        }
        kept.push(word);
    }
    (!kept.is_empty()).then(|| kept.join("_"))
}

/// Identity of a key in the store: every word stemmed, so `car_keys` and
/// `car_key` address the same record.
pub fn fold_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split('_')
        .map(stem)
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::{STOPWORDS, content_terms, fold_key, normalize_key, stem, term_set, tokenize};
    use pretty_assertions::assert_eq;

    #[test]
    fn stopwords_are_sorted_for_binary_search() {
        let mut sorted = STOPWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOPWORDS.to_vec());
    }

    #[test]
    fn tokenize_drops_possessives_and_punctuation() {
        assert_eq!(
            tokenize("Mom's birthday, (2001/06/19)!"),
            vec!["mom", "birthday", "2001", "06", "19"]
        );
    }

    #[test]
    fn stem_folds_plurals() {
        assert_eq!(stem("keys"), "key");
        assert_eq!(stem("memories"), "memory");
        assert_eq!(stem("glass"), "glass");
        assert_eq!(stem("bus"), "bus");
    }

    #[test]
    fn content_terms_skip_stopwords() {
        assert_eq!(
            content_terms("Where did I put my car keys?", 1),
            vec!["car", "key"]
        );
        assert_eq!(content_terms("I am at the gym", 4), Vec::<String>::new());
    }

    #[test]
    fn normalize_key_keeps_interior_words() {
        assert_eq!(normalize_key("my car keys").as_deref(), Some("car_keys"));
        assert_eq!(
            normalize_key("Mr.A birthday").as_deref(),
            Some("mr_a_birthday")
        );
        assert_eq!(
            normalize_key("The Car Keys").as_deref(),
            Some("car_keys")
        );
        assert_eq!(
            normalize_key("The box of the books").as_deref(),
            Some("box_of_books")
        );
        assert_eq!(
            normalize_key("a gift for our boss").as_deref(),
            Some("gift_for_boss")
        );
        assert_eq!(
            normalize_key("Dr. A's office").as_deref(),
            Some("dr_a_office")
        );
        assert_eq!(normalize_key("the"), None);
        assert_eq!(normalize_key("  "), None);
    }

    #[test]
    fn term_set_is_deduplicated() {
        let terms = term_set("keys key KEYS car");
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn fold_key_merges_plural_spellings() {
        assert_eq!(fold_key("car_keys"), "car_key");
        assert_eq!(fold_key("car_key"), "car_key");
        assert_eq!(fold_key("box_of_books"), fold_key("box_of_book"));
        assert_eq!(fold_key("mr_a_birthday"), "mr_a_birthday");
        assert_eq!(fold_key("Glass"), "glass");
    }
}
