//! Query resolution: posting-set intersection, boosting and ranking.
//!
//! A query matches an entry only when every query word is a prefix of some
//! word in the entry. Words that were never indexed short-circuit to an empty
//! result; the dictionary is only read, never extended, at query time.

use crate::dictionary::TokenDictionary;
use crate::entry::{Entry, EntryType};
use crate::index::Indexer;
use crate::tokenizer::words;
use crate::EntryId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Multipliers keyed by entry type name or by external entry id.
pub type Boosts = HashMap<String, f32>;

#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub limit: usize,
    pub text: String,
    pub boosts: Option<Boosts>,
}

impl QueryRequest {
    pub fn new(limit: usize, text: impl Into<String>) -> Self {
        Self { limit, text: text.into(), boosts: None }
    }

    pub fn with_boosts(mut self, boosts: Boosts) -> Self {
        self.boosts = Some(boosts);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Base score times the applicable boost.
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Entries matching every query word, before truncation to the limit.
    pub total_matches: usize,
    pub hits: Vec<Hit>,
}

impl QueryResult {
    pub fn ids(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }
}

struct Ranked<'a> {
    entry: &'a Entry,
    score: f32,
}

pub struct QueryResolver<'a> {
    dictionary: &'a TokenDictionary,
    indexer: &'a Indexer,
}

impl<'a> QueryResolver<'a> {
    pub fn new(dictionary: &'a TokenDictionary, indexer: &'a Indexer) -> Self {
        Self { dictionary, indexer }
    }

    pub fn resolve(&self, request: &QueryRequest) -> QueryResult {
        let start = Instant::now();
        let Some(matches) = self.intersect(&request.text) else {
            return QueryResult::default();
        };
        let total_matches = matches.len();
        let intersect_us = start.elapsed().as_micros() as u64;

        let indexer = self.indexer;
        let mut ranked: Vec<Ranked<'a>> = matches
            .into_iter()
            .filter_map(|id| indexer.get(id))
            .map(|entry| Ranked { entry, score: entry.score() * boost_for(entry, request.boosts.as_ref()) })
            .collect();
        top_k(&mut ranked, request.limit);

        let hits = ranked
            .into_iter()
            .map(|r| Hit { id: r.entry.id().to_string(), kind: r.entry.kind(), score: r.score })
            .collect();
        tracing::debug!(
            query = %request.text,
            matches = total_matches,
            intersect_us,
            elapsed_us = start.elapsed().as_micros() as u64,
            "query resolved"
        );
        QueryResult { total_matches, hits }
    }

    /// Entry ids matching every word of `text`, or `None` when nothing can match.
    fn intersect(&self, text: &str) -> Option<Vec<EntryId>> {
        let mut sets: Vec<&HashSet<EntryId>> = Vec::new();
        for word in words(text) {
            let token = self.dictionary.lookup(word)?;
            let set = self.indexer.postings(token).filter(|s| !s.is_empty())?;
            sets.push(set);
        }
        sets.sort_by_key(|s| s.len());

        let mut iter = sets.into_iter();
        let smallest = iter.next()?;
        let mut result: Vec<EntryId> = match iter.next() {
            Some(next) => smallest.iter().copied().filter(|id| next.contains(id)).collect(),
            None => return Some(smallest.iter().copied().collect()),
        };
        for set in iter {
            if result.is_empty() {
                break;
            }
            result.retain(|id| set.contains(id));
        }
        if result.is_empty() { None } else { Some(result) }
    }
}

/// Type-name boost first, then the entry's own id, else 1.0.
fn boost_for(entry: &Entry, boosts: Option<&Boosts>) -> f32 {
    let Some(boosts) = boosts else { return 1.0 };
    boosts
        .get(entry.kind().as_str())
        .or_else(|| boosts.get(entry.id()))
        .copied()
        .unwrap_or(1.0)
}

/// Effective score descending, then most recently constructed first.
fn rank_order(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    score_desc(a.score, b.score).then_with(|| b.entry.seq().cmp(&a.entry.seq()))
}

// NaN sorts after every number so the order stays total.
fn score_desc(a: f32, b: f32) -> Ordering {
    match b.partial_cmp(&a) {
        Some(ord) => ord,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/// Keep the best `k` candidates, fully ordered.
fn top_k(ranked: &mut Vec<Ranked<'_>>, k: usize) {
    if k == 0 {
        ranked.clear();
        return;
    }
    if k < ranked.len() {
        ranked.select_nth_unstable_by(k - 1, rank_order);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(rank_order);
}
