use crate::entry::Entry;
use crate::{EntryId, TokenId};
use std::collections::{HashMap, HashSet};

/// Entry store and inverted index, kept consistent with each other.
///
/// Invariant: an entry id is in the posting set of token T iff the live entry
/// stored under that id carries T.
#[derive(Debug, Default)]
pub struct Indexer {
    /// external id -> internal id; stable for the lifetime of the indexer
    entry_ids: HashMap<String, EntryId>,
    entries: HashMap<EntryId, Entry>,
    postings: HashMap<TokenId, HashSet<EntryId>>, // token -> entries carrying it
}

impl Indexer {
    pub fn new() -> Self { Self::default() }

    /// Index `entry`, replacing whatever was stored under the same external id.
    pub fn add(&mut self, entry: Entry) -> EntryId {
        let id = self.intern(entry.id());
        if let Some(previous) = self.entries.remove(&id) {
            self.unlink(id, &previous);
        }
        for &token in entry.tokens() {
            self.postings.entry(token).or_default().insert(id);
        }
        tracing::debug!(id = entry.id(), internal_id = id, tokens = entry.tokens().len(), "indexed entry");
        self.entries.insert(id, entry);
        id
    }

    /// Remove the entry stored under `external_id`. Unknown ids are a no-op.
    pub fn delete(&mut self, external_id: &str) -> Option<Entry> {
        let id = self.entry_id(external_id)?;
        let entry = self.entries.remove(&id)?;
        self.unlink(id, &entry);
        tracing::debug!(id = external_id, internal_id = id, "deleted entry");
        Some(entry)
    }

    /// Posting set for `token`. `None` and an empty set both mean no matches.
    pub fn postings(&self, token: TokenId) -> Option<&HashSet<EntryId>> {
        self.postings.get(&token)
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub fn entry_id(&self, external_id: &str) -> Option<EntryId> {
        self.entry_ids.get(external_id).copied()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn intern(&mut self, external_id: &str) -> EntryId {
        if let Some(&id) = self.entry_ids.get(external_id) {
            return id;
        }
        let id = EntryId::try_from(self.entry_ids.len()).expect("indexer holds at most u32::MAX external ids");
        self.entry_ids.insert(external_id.to_string(), id);
        id
    }

    fn unlink(&mut self, id: EntryId, entry: &Entry) {
        for token in entry.tokens() {
            if let Some(set) = self.postings.get_mut(token) {
                set.remove(&id);
                if set.is_empty() {
                    self.postings.remove(token);
                }
            }
        }
    }
}
