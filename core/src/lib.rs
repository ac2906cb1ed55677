//! In-memory typeahead search: prefix tokenization, an inverted index keyed by
//! token id, and ranked multi-term prefix queries with per-type or per-id boosts.

pub mod command;
pub mod dictionary;
pub mod engine;
pub mod entry;
pub mod error;
pub mod index;
pub mod query;
pub mod tokenizer;

pub use command::Command;
pub use dictionary::TokenDictionary;
pub use engine::{Engine, SharedEngine};
pub use entry::{Entry, EntryType};
pub use error::ParseError;
pub use index::Indexer;
pub use query::{Boosts, Hit, QueryRequest, QueryResolver, QueryResult};

pub type TokenId = u32;
pub type EntryId = u32;
