use crate::TokenId;
use std::collections::HashMap;

/// Append-only mapping from a lower-cased token to a dense id.
///
/// Ids start at 0 and grow by one per distinct token. They are never
/// reclaimed, even when every entry carrying a token has been deleted.
#[derive(Debug, Default, Clone)]
pub struct TokenDictionary {
    ids: HashMap<String, TokenId>,
}

impl TokenDictionary {
    pub fn new() -> Self { Self::default() }

    /// Returns the id of `token`, assigning the next free one if it is unseen.
    pub fn lookup_or_add(&mut self, token: &str) -> TokenId {
        let folded = token.to_lowercase();
        if let Some(&id) = self.ids.get(&folded) {
            return id;
        }
        let id = TokenId::try_from(self.ids.len()).expect("token dictionary holds at most u32::MAX tokens");
        self.ids.insert(folded, id);
        id
    }

    /// Read-only lookup used at query time; never inserts.
    pub fn lookup(&self, token: &str) -> Option<TokenId> {
        self.ids.get(&token.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn reset(&mut self) {
        self.ids.clear();
    }
}
