use thiserror::Error;

/// Rejection reasons for a malformed command line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty command line")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown entry type: {0}")]
    UnknownEntryType(String),

    #[error("malformed boost, expected key:factor, got {0:?}")]
    MalformedBoost(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::InvalidNumber { field: "score", value: "abc".into() };
        assert_eq!(err.to_string(), "invalid score: \"abc\"");
        assert_eq!(ParseError::UnknownCommand("FOO".into()).to_string(), "unknown command: FOO");
    }
}
