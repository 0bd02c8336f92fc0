//! The outcome and error taxonomy every matcher, the lex driver, and the
//! lexer-spec parser share.
//!
//! `NO_MATCH`, `MORE` and `EOF` are flow control, not failure: they drive
//! alternation inside a [`crate::matcher::multi`] attempt or tell the caller
//! to supply more bytes before re-invoking. Everything in [`LexError`] is
//! fatal to the current call and is reported with source position.

use thiserror::Error;

/// The result of attempting to match something against the input: either a
/// value was produced, nothing matched here, more bytes are needed before a
/// decision can be made, or the input is cleanly exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Matched(T),
    NoMatch,
    More,
    Eof,
}

impl<T> Outcome<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Outcome::Matched(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Matched(v) => Outcome::Matched(f(v)),
            Outcome::NoMatch => Outcome::NoMatch,
            Outcome::More => Outcome::More,
            Outcome::Eof => Outcome::Eof,
        }
    }
}

pub type LexResult<T> = Result<Outcome<T>, LexError>;

/// Fatal errors, one variant per failure kind a matcher, the driver, or the
/// lexer-spec parser can report; flow-control outcomes (`MORE`/`NO_MATCH`/
/// `EOF`) are carried by [`Outcome`] instead so they can't be forgotten in a
/// `match`.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("null input")]
    NullInput,

    #[error("invalid UTF-8 at byte offset {offset}")]
    BadUtf8 { offset: usize },

    #[error("bad length: {0}")]
    BadLength(String),

    #[error("bad offset: {0}")]
    BadOffset(String),

    #[error("bad start: {0}")]
    BadStart(String),

    #[error("bad min: {0}")]
    BadMin(String),

    #[error("bad max: {0}")]
    BadMax(String),

    #[error("bad regex pattern: {0}")]
    BadRegex(String),

    #[error("bad category mask")]
    BadCategory,

    #[error("bad definition type: expected {expected}, found {found}")]
    BadDefinitionType { expected: &'static str, found: &'static str },

    #[error("bad multi kind")]
    BadMultiKind,

    #[error("empty literal")]
    EmptyLiteral,

    #[error("empty definition body")]
    EmptyDefinition,

    #[error("chain insert failed: {0}")]
    ChainInsert(String),

    #[error("maximum length exceeded: {0}")]
    MaxLength(String),

    #[error("infinite loop guard tripped in {0}")]
    InfiniteLoop(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unresolved definition: {0}")]
    UnresolvedDefinition(String),

    #[error("unexpected token: {0}")]
    Token(String),

    #[error("corrupt internal state: {0}")]
    State(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
