use crate::dictionary::TokenDictionary;
use crate::error::ParseError;
use crate::tokenizer::tokenize;
use crate::TokenId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    User,
    Topic,
    Question,
    Board,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::User => "user",
            EntryType::Topic => "topic",
            EntryType::Question => "question",
            EntryType::Board => "board",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EntryType::User),
            "topic" => Ok(EntryType::Topic),
            "question" => Ok(EntryType::Question),
            "board" => Ok(EntryType::Board),
            other => Err(ParseError::UnknownEntryType(other.to_string())),
        }
    }
}

/// One indexed record.
///
/// The token set is derived from `text` when the entry is built and never
/// changes afterwards. `seq` orders constructions within the process and is
/// only used to break score ties.
#[derive(Debug, Clone)]
pub struct Entry {
    kind: EntryType,
    id: String,
    score: f32,
    text: String,
    tokens: HashSet<TokenId>,
    seq: u64,
}

impl Entry {
    pub fn new(kind: EntryType, id: impl Into<String>, score: f32, text: impl Into<String>, dictionary: &mut TokenDictionary) -> Self {
        let text = text.into();
        let tokens = tokenize(&text, dictionary);
        Self {
            kind,
            id: id.into(),
            score,
            text,
            tokens,
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn kind(&self) -> EntryType { self.kind }
    pub fn id(&self) -> &str { &self.id }
    pub fn score(&self) -> f32 { self.score }
    pub fn text(&self) -> &str { &self.text }
    pub fn tokens(&self) -> &HashSet<TokenId> { &self.tokens }
    pub fn seq(&self) -> u64 { self.seq }
}
