use crate::dictionary::TokenDictionary;
use crate::TokenId;
use std::collections::HashSet;

/// Whitespace-delimited words of `text`, empties discarded.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Every non-empty prefix of `word`, shortest first, cut on char boundaries.
pub fn prefixes(word: &str) -> impl Iterator<Item = &str> {
    word.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .map(move |end| &word[..end])
}

/// Tokenize text into the set of token ids for the prefix closure of every word.
/// No stemming or punctuation stripping; case folding happens in the dictionary.
pub fn tokenize(text: &str, dictionary: &mut TokenDictionary) -> HashSet<TokenId> {
    let mut tokens = HashSet::new();
    for word in words(text) {
        for prefix in prefixes(word) {
            tokens.insert(dictionary.lookup_or_add(prefix));
        }
    }
    tokens
}
