use crate::command::Command;
use crate::dictionary::TokenDictionary;
use crate::entry::{Entry, EntryType};
use crate::index::Indexer;
use crate::query::{Boosts, QueryRequest, QueryResolver, QueryResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// A single typeahead index: token dictionary plus entry store and postings.
///
/// Not synchronized; wrap it in [`SharedEngine`] when readers and writers
/// can overlap.
#[derive(Debug, Default)]
pub struct Engine {
    dictionary: TokenDictionary,
    indexer: Indexer,
}

impl Engine {
    pub fn new() -> Self { Self::default() }

    /// Index or re-index a record.
    pub fn add(&mut self, kind: EntryType, id: &str, score: f32, text: &str) {
        let entry = Entry::new(kind, id, score, text, &mut self.dictionary);
        self.indexer.add(entry);
    }

    /// Remove a record if present.
    pub fn delete(&mut self, id: &str) {
        self.indexer.delete(id);
    }

    pub fn query(&self, limit: usize, text: &str) -> Vec<String> {
        self.search(&QueryRequest::new(limit, text)).ids()
    }

    pub fn weighted_query(&self, limit: usize, boosts: &Boosts, text: &str) -> Vec<String> {
        self.search(&QueryRequest::new(limit, text).with_boosts(boosts.clone())).ids()
    }

    pub fn search(&self, request: &QueryRequest) -> QueryResult {
        QueryResolver::new(&self.dictionary, &self.indexer).resolve(request)
    }

    /// Apply a parsed command. Queries return their ranked ids; mutations return `None`.
    pub fn execute(&mut self, command: Command) -> Option<Vec<String>> {
        match command {
            Command::Add { kind, id, score, text } => {
                self.add(kind, &id, score, &text);
                None
            }
            Command::Delete { id } => {
                self.delete(&id);
                None
            }
            query => self.answer(query),
        }
    }

    /// Read-only half of [`Engine::execute`]; mutations yield `None`.
    fn answer(&self, command: Command) -> Option<Vec<String>> {
        match command {
            Command::Query { limit, text } => Some(self.query(limit, &text)),
            Command::WeightedQuery { limit, boosts, text } => {
                Some(self.search(&QueryRequest { limit, text, boosts: Some(boosts) }).ids())
            }
            Command::Add { .. } | Command::Delete { .. } => None,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize { self.indexer.len() }

    pub fn is_empty(&self) -> bool { self.indexer.is_empty() }

    /// Number of distinct tokens ever indexed.
    pub fn token_count(&self) -> usize { self.dictionary.len() }

    pub fn dictionary(&self) -> &TokenDictionary { &self.dictionary }

    pub fn indexer(&self) -> &Indexer { &self.indexer }
}

/// Cloneable handle to an [`Engine`] behind a reader-writer lock.
///
/// Each mutation holds the write lock for its whole duration, so readers see
/// either all of an add or none of it.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn add(&self, kind: EntryType, id: &str, score: f32, text: &str) {
        self.inner.write().add(kind, id, score, text);
    }

    pub fn delete(&self, id: &str) {
        self.inner.write().delete(id);
    }

    pub fn query(&self, limit: usize, text: &str) -> Vec<String> {
        self.inner.read().query(limit, text)
    }

    pub fn weighted_query(&self, limit: usize, boosts: &Boosts, text: &str) -> Vec<String> {
        self.inner.read().weighted_query(limit, boosts, text)
    }

    pub fn search(&self, request: &QueryRequest) -> QueryResult {
        self.inner.read().search(request)
    }

    pub fn execute(&self, command: Command) -> Option<Vec<String>> {
        if command.is_mutation() {
            self.inner.write().execute(command)
        } else {
            self.inner.read().answer(command)
        }
    }

    /// (live entries, distinct tokens)
    pub fn stats(&self) -> (usize, usize) {
        let engine = self.inner.read();
        (engine.len(), engine.token_count())
    }
}
