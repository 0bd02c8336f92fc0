//! The token the lex driver hands back for each successful match.

use crate::db::RuleId;
use crate::unit::Locations;

/// One lexed token: which rule produced it (top-level tokens only — a
/// sub-token is a component of a `Multi` match and carries the name of the
/// definition/reference that produced it instead), where it sits in all
/// four units, and the text it covers.
///
/// A sub-token's [`Locations`] are expressed relative to its own parent's
/// match start (the same convention [`crate::matcher::MatchSpan`] uses
/// before the driver rebases a top-level token onto the absolute running
/// cursor) rather than the absolute input position; a caller that needs the
/// absolute span of a sub-token adds the parent token's `locations.*.start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub rule: Option<RuleId>,
    pub name: String,
    pub locations: Locations,
    pub text: String,
    pub sub_tokens: Vec<Token>,
}

impl Token {
    pub fn byte_len(&self) -> i64 {
        self.locations.byte.length
    }
}
