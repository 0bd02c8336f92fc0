//! The matcher family: the four ways a rule's body can consume input.
//!
//! Every matcher takes a start position and either consumes some input and
//! reports the four-unit extent it consumed ([`MatchSpan`]), declines to
//! match at all (`NO_MATCH`), or asks for more bytes before it can decide
//! (`MORE`). [`multi::MultiMatcher`] is the only one that composes others;
//! the rest are leaves.

pub mod category;
pub mod literal;
pub mod multi;
pub mod regex;

pub use category::CategoryMatcher;
pub use literal::LiteralMatcher;
pub use multi::{MultiKind, MultiMatcher, SequenceElement};
pub use regex::RegexMatcher;

use crate::buffer::{BufferChain, BufferCursor};
use crate::error::LexResult;
use crate::token::Token;
use crate::unit::Locations;

/// A single successful match: the four-unit extent consumed, expressed as
/// deltas starting at zero (the caller rebases these onto its running
/// cursor), the buffer cursor positioned just past the match, and the
/// matched text, reassembled from whatever scalars were read to decide it.
///
/// `sub_tokens` is empty for every leaf matcher (category/literal/regex);
/// only [`multi::MultiMatcher`] ever populates it, and even there it stays
/// empty when the `Multi` has exactly one reference, since wrapping a
/// trivial alias in its own sub-token would add nesting with no
/// information.
#[derive(Clone, Debug)]
pub struct MatchSpan {
    pub locations: Locations,
    pub cursor: BufferCursor,
    pub text: String,
    pub sub_tokens: Vec<Token>,
}

impl MatchSpan {
    /// Convenience constructor for the common leaf-matcher case: no
    /// sub-tokens.
    pub fn leaf(locations: Locations, cursor: BufferCursor, text: String) -> Self {
        Self { locations, cursor, text, sub_tokens: Vec::new() }
    }
}

/// Implemented by every matcher, primitive or composite.
pub trait Matcher {
    fn try_match(&self, chain: &BufferChain, start: BufferCursor) -> LexResult<MatchSpan>;
}
