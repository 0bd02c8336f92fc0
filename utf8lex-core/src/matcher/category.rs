//! Matches a single extended grapheme cluster whose *first* codepoint falls
//! in a [`CategoryMask`].

use crate::buffer::{BufferChain, BufferCursor};
use crate::category::{classify, CategoryMask};
use crate::error::{LexError, LexResult, Outcome};
use crate::grapheme::read_grapheme;
use crate::unit::Locations;

use super::{MatchSpan, Matcher};

/// A leaf matcher built from a category mask: one grapheme cluster whose
/// first codepoint's classification intersects `mask`.
///
/// Intersection, not containment, is the test: a mask is usually itself a
/// union (`LETTER`, `WHITESPACE`, a user-defined combination of several
/// categories), and a character need only belong to one of the categories
/// the mask names.
///
/// Matching reads a whole grapheme cluster, not a single scalar — a base
/// letter followed by a combining mark is one `LETTER` match covering both
/// codepoints, never two matches that would tear the cluster in half.
#[derive(Clone, Debug)]
pub struct CategoryMatcher {
    pub mask: CategoryMask,
}

impl CategoryMatcher {
    pub fn new(mask: CategoryMask) -> Result<Self, LexError> {
        if mask == CategoryMask::EMPTY {
            return Err(LexError::BadCategory);
        }
        Ok(Self { mask })
    }
}

impl Matcher for CategoryMatcher {
    fn try_match(&self, chain: &BufferChain, start: BufferCursor) -> LexResult<MatchSpan> {
        let grapheme = match read_grapheme(chain, start)? {
            Outcome::Matched(g) => g,
            Outcome::More => return Ok(Outcome::More),
            Outcome::Eof => return Ok(Outcome::Eof),
            Outcome::NoMatch => unreachable!(),
        };
        let first = grapheme.text.chars().next().expect("a read grapheme is never empty");
        if !classify(first).intersects(self.mask) {
            return Ok(Outcome::NoMatch);
        }
        let mut locations = Locations::new();
        locations.byte.length = grapheme.byte_len;
        locations.char.length = grapheme.char_len;
        locations.grapheme.length = 1;
        locations.byte.hash = grapheme.hash;
        locations.char.hash = grapheme.hash;
        locations.grapheme.hash = grapheme.hash;
        if grapheme.is_line_terminator {
            locations.line.length = 1;
            locations.char.after = 0;
            locations.grapheme.after = 0;
        }
        Ok(Outcome::Matched(MatchSpan::leaf(locations, grapheme.cursor, grapheme.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferChain;
    use crate::category::{LETTER_LOWER, NUM_DECIMAL};

    #[test]
    fn matches_character_in_mask() {
        let m = CategoryMatcher::new(LETTER_LOWER).unwrap();
        let chain = BufferChain::from_complete(*b"a1");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(span.text, "a");
        assert_eq!(span.locations.byte.length, 1);
    }

    #[test]
    fn rejects_character_outside_mask() {
        let m = CategoryMatcher::new(NUM_DECIMAL).unwrap();
        let chain = BufferChain::from_complete(*b"a");
        assert!(matches!(m.try_match(&chain, BufferCursor::START), Ok(Outcome::NoMatch)));
    }

    #[test]
    fn empty_mask_is_rejected_at_construction() {
        assert!(CategoryMatcher::new(CategoryMask::EMPTY).is_err());
    }

    #[test]
    fn line_terminator_resets_char_and_grapheme_after() {
        use crate::category::WHITESPACE;
        let m = CategoryMatcher::new(WHITESPACE).unwrap();
        let chain = BufferChain::from_complete(*b"\r\nx");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected the CRLF cluster to match");
        };
        assert_eq!(span.text, "\r\n");
        assert_eq!(span.locations.char.after, 0);
        assert_eq!(span.locations.grapheme.after, 0);
    }

    #[test]
    fn non_line_terminator_leaves_after_unset() {
        let m = CategoryMatcher::new(LETTER_LOWER).unwrap();
        let chain = BufferChain::from_complete(*b"a");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(span.locations.char.after, crate::unit::NO_AFTER);
    }

    #[test]
    fn matches_whole_cluster_not_just_first_scalar() {
        // "e" + combining acute: one LETTER match covering both codepoints,
        // classified by the base letter's category.
        let m = CategoryMatcher::new(LETTER_LOWER).unwrap();
        let chain = BufferChain::from_complete("e\u{0301}f".as_bytes().to_vec());
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(span.text, "e\u{0301}");
        assert_eq!(span.locations.char.length, 2);
        assert_eq!(span.locations.grapheme.length, 1);
    }
}
