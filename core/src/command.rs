//! Line-oriented command grammar:
//!
//! ```text
//! ADD <type> <id> <score> <text...>
//! DEL <id>
//! QUERY <limit> <text...>
//! WQUERY <limit> <num_boosts> <key:factor>... <text...>
//! ```

use crate::entry::EntryType;
use crate::error::{ParseError, Result};
use crate::query::Boosts;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    static ref COMMAND_RE: Regex = Regex::new(r"^\s*(\S+)\s*(.*?)\s*$").expect("valid regex");
    static ref ADD_BODY_RE: Regex = Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s*(.*)$").expect("valid regex");
    static ref QUERY_BODY_RE: Regex = Regex::new(r"^(\S+)\s*(.*)$").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { kind: EntryType, id: String, score: f32, text: String },
    Delete { id: String },
    Query { limit: usize, text: String },
    WeightedQuery { limit: usize, boosts: Boosts, text: String },
}

impl Command {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Command::Add { .. } | Command::Delete { .. })
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self> {
        let caps = COMMAND_RE.captures(line).ok_or(ParseError::Empty)?;
        let body = &caps[2];
        match &caps[1] {
            "ADD" => parse_add(body),
            "DEL" => {
                let id = body.split_whitespace().next().ok_or(ParseError::MissingField("id"))?;
                Ok(Command::Delete { id: id.to_string() })
            }
            "QUERY" => {
                let caps = QUERY_BODY_RE.captures(body).ok_or(ParseError::MissingField("limit"))?;
                Ok(Command::Query { limit: parse_num(&caps[1], "limit")?, text: caps[2].to_string() })
            }
            "WQUERY" => parse_wquery(body),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_add(body: &str) -> Result<Command> {
    let caps = ADD_BODY_RE.captures(body).ok_or(ParseError::MissingField("score"))?;
    Ok(Command::Add {
        kind: caps[1].parse()?,
        id: caps[2].to_string(),
        score: parse_finite(&caps[3], "score")?,
        text: caps[4].to_string(),
    })
}

fn parse_wquery(body: &str) -> Result<Command> {
    let (limit, rest) = next_field(body).ok_or(ParseError::MissingField("limit"))?;
    let limit = parse_num(limit, "limit")?;
    let (count, mut rest) = next_field(rest).ok_or(ParseError::MissingField("num_boosts"))?;
    let count: usize = parse_num(count, "num_boosts")?;

    let mut boosts = Boosts::new();
    for _ in 0..count {
        let (pair, tail) = next_field(rest).ok_or(ParseError::MissingField("boost"))?;
        let (key, factor) = pair.rsplit_once(':').ok_or_else(|| ParseError::MalformedBoost(pair.to_string()))?;
        if key.is_empty() {
            return Err(ParseError::MalformedBoost(pair.to_string()));
        }
        boosts.insert(key.to_string(), parse_finite(factor, "boost")?);
        rest = tail;
    }
    Ok(Command::WeightedQuery { limit, boosts, text: rest.trim().to_string() })
}

/// Split off the next whitespace-delimited field.
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    })
}

fn parse_num<T: FromStr>(value: &str, field: &'static str) -> Result<T> {
    value.parse().map_err(|_| ParseError::InvalidNumber { field, value: value.to_string() })
}

/// Scores and boosts must be finite; `NaN`, `inf` and overflowing literals are rejected.
fn parse_finite(value: &str, field: &'static str) -> Result<f32> {
    let parsed: f32 = parse_num(value, field)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidNumber { field, value: value.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_multiword_text() {
        let cmd: Command = "ADD question q1 0.5 What does Adam D’Angelo do at Quora?".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                kind: EntryType::Question,
                id: "q1".into(),
                score: 0.5,
                text: "What does Adam D’Angelo do at Quora?".into(),
            }
        );
        assert!(cmd.is_mutation());
    }

    #[test]
    fn add_text_may_be_empty() {
        let cmd: Command = "ADD user u9 2".parse().unwrap();
        assert!(matches!(cmd, Command::Add { ref text, .. } if text.is_empty()));
    }

    #[test]
    fn parses_del_and_query() {
        assert_eq!("DEL u2".parse::<Command>().unwrap(), Command::Delete { id: "u2".into() });
        assert_eq!(
            "QUERY 10 Adam D’A".parse::<Command>().unwrap(),
            Command::Query { limit: 10, text: "Adam D’A".into() }
        );
        assert_eq!("QUERY 0".parse::<Command>().unwrap(), Command::Query { limit: 0, text: String::new() });
    }

    #[test]
    fn parses_wquery_boosts() {
        let cmd: Command = "WQUERY 2 2 topic:9.99 u1:0.5 Adam D’A".parse().unwrap();
        let Command::WeightedQuery { limit, boosts, text } = cmd else { panic!("expected WQUERY") };
        assert_eq!(limit, 2);
        assert_eq!(boosts.get("topic"), Some(&9.99));
        assert_eq!(boosts.get("u1"), Some(&0.5));
        assert_eq!(text, "Adam D’A");
    }

    #[test]
    fn wquery_without_boosts() {
        let cmd: Command = "WQUERY 10 0 Adam".parse().unwrap();
        assert_eq!(cmd, Command::WeightedQuery { limit: 10, boosts: Boosts::new(), text: "Adam".into() });
    }

    #[test]
    fn boost_key_splits_on_last_colon() {
        let cmd: Command = "WQUERY 1 1 ns:id:3 x".parse().unwrap();
        let Command::WeightedQuery { boosts, .. } = cmd else { panic!("expected WQUERY") };
        assert_eq!(boosts.get("ns:id"), Some(&3.0));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("FOO bar".parse::<Command>(), Err(ParseError::UnknownCommand("FOO".into())));
        assert_eq!("ADD robot r1 1.0 x".parse::<Command>(), Err(ParseError::UnknownEntryType("robot".into())));
        assert!(matches!("ADD user u1 high x".parse::<Command>(), Err(ParseError::InvalidNumber { field: "score", .. })));
        assert!(matches!("QUERY ten x".parse::<Command>(), Err(ParseError::InvalidNumber { field: "limit", .. })));
        assert_eq!("DEL".parse::<Command>(), Err(ParseError::MissingField("id")));
        assert_eq!("WQUERY 5 1 topic x".parse::<Command>(), Err(ParseError::MalformedBoost("topic".into())));
        assert_eq!("WQUERY 5 2 topic:1".parse::<Command>(), Err(ParseError::MissingField("boost")));
    }

    #[test]
    fn oversized_boost_count_is_rejected() {
        let line = format!("WQUERY 5 {} topic:1 adam", usize::MAX);
        assert_eq!(line.parse::<Command>(), Err(ParseError::MissingField("boost")));
        assert_eq!("WQUERY 5 1000000000 topic:1".parse::<Command>(), Err(ParseError::MissingField("boost")));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for line in ["ADD user u1 NaN adam", "ADD user u2 inf adam", "ADD user u3 -infinity adam", "ADD user u4 1e39 adam"] {
            assert!(
                matches!(line.parse::<Command>(), Err(ParseError::InvalidNumber { field: "score", .. })),
                "{line}"
            );
        }
        for line in ["WQUERY 5 1 user:NaN adam", "WQUERY 5 1 u1:inf adam", "WQUERY 5 1 topic:1e39 adam"] {
            assert!(
                matches!(line.parse::<Command>(), Err(ParseError::InvalidNumber { field: "boost", .. })),
                "{line}"
            );
        }
        assert!("ADD user u5 -2.5e3 adam".parse::<Command>().is_ok());
    }
}
