//! Matches a fixed literal string, one grapheme cluster at a time.
//!
//! Comparing whole clusters rather than raw bytes or scalars keeps literal
//! matches aligned with the same grapheme/line accounting every other
//! matcher produces — a literal can never end up consuming half of a
//! combining-mark sequence.

use crate::buffer::{BufferChain, BufferCursor};
use crate::error::{LexError, LexResult, Outcome};
use crate::grapheme::{extend_hash, read_grapheme};
use crate::unit::Locations;

use super::{MatchSpan, Matcher};

#[derive(Clone, Debug)]
pub struct LiteralMatcher {
    pub text: String,
}

impl LiteralMatcher {
    pub fn new(text: impl Into<String>) -> Result<Self, LexError> {
        let text = text.into();
        if text.is_empty() {
            return Err(LexError::EmptyLiteral);
        }
        Ok(Self { text })
    }
}

impl Matcher for LiteralMatcher {
    fn try_match(&self, chain: &BufferChain, start: BufferCursor) -> LexResult<MatchSpan> {
        let mut cursor = start;
        let mut matched = String::new();
        let mut locations = Locations::new();
        let mut hash: u64 = 0;
        let mut chars_since_reset: i64 = 0;
        let mut graphemes_since_reset: i64 = 0;
        let mut saw_reset = false;

        while matched != self.text {
            match read_grapheme(chain, cursor)? {
                Outcome::Matched(g) => {
                    let end = matched.len() + g.text.len();
                    if end > self.text.len() || self.text[matched.len()..end] != g.text {
                        return Ok(Outcome::NoMatch);
                    }
                    matched.push_str(&g.text);
                    locations.byte.length += g.byte_len;
                    locations.char.length += g.char_len;
                    locations.grapheme.length += 1;
                    hash = extend_hash(hash, g.text.as_bytes());
                    if g.is_line_terminator {
                        locations.line.length += 1;
                        chars_since_reset = 0;
                        graphemes_since_reset = 0;
                        saw_reset = true;
                    } else {
                        chars_since_reset += g.char_len;
                        graphemes_since_reset += 1;
                    }
                    cursor = g.cursor;
                }
                Outcome::More => return Ok(Outcome::More),
                Outcome::Eof => return Ok(Outcome::NoMatch),
                Outcome::NoMatch => unreachable!(),
            }
        }

        locations.byte.hash = hash;
        locations.char.hash = hash;
        locations.grapheme.hash = hash;
        if saw_reset {
            locations.char.after = chars_since_reset;
            locations.grapheme.after = graphemes_since_reset;
        }

        Ok(Outcome::Matched(MatchSpan::leaf(locations, cursor, matched)))
    }
}
