//! The composite matcher: a sequence of quantified sub-matchers, or a set of
//! alternatives tried in priority order.
//!
//! References to other named matchers are resolved once, by the database,
//! before a [`MultiMatcher`] is built — by the time one of these runs,
//! every element already holds a concrete [`Matcher`] handle, so match time
//! never needs to perform a name lookup or fail with `UNRESOLVED_DEFINITION`
//! (that error can only come from the resolution step itself).
//!
//! Backtracking is checkpoint/rollback in spirit even though nothing here
//! mutates the buffer chain: a quantified element's repetitions are
//! attempted greedily, and on failure of what follows, the attempt count is
//! rolled back one at a time until either the rest of the sequence succeeds
//! or the element's minimum is reached.
//!
//! Each successful child match becomes a [`Token`] appended to the parent
//! attempt's sub-token list, named after the reference that produced it.
//! When a `Multi` has exactly one reference — the trivial "`IDENT` means
//! the same thing as `SOME_OTHER_NAME`" alias a bare single-reference body
//! produces — that single sub-token is flattened away rather than wrapped,
//! so an alias chain never grows an unbounded pile of one-child wrapper
//! tokens.

use std::cell::Cell;
use std::rc::Rc;

use crate::buffer::{BufferChain, BufferCursor};
use crate::error::{LexError, LexResult, Outcome};
use crate::grapheme::extend_hash;
use crate::token::Token;
use crate::unit::Locations;

use super::{MatchSpan, Matcher};

/// How many nested sub-token spans a single [`MultiMatcher`] attempt may
/// record before giving up; bounds the memory a pathological quantified
/// pattern (e.g. `X*` against a huge run of `X`) can consume.
pub const DEFAULT_MAX_SUBTOKENS: usize = 4096;

/// Caps how deeply one `Multi` may recurse into another through a chain of
/// `Multi`-referencing-`Multi` definitions. Eager reference resolution
/// already rules out cycles (a definition can only reference a name that
/// was already live when it was written), so nesting this deep would mean
/// a spec file with thousands of definitions each wrapping the last; the
/// guard exists to turn that pathological case into a clean error instead
/// of a native stack overflow.
const MAX_STACK_DEPTH: usize = 512;

thread_local! {
    static STACK_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<DepthGuard, LexError> {
        let depth = STACK_DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        if depth > MAX_STACK_DEPTH {
            return Err(LexError::InfiniteLoop("multi nesting exceeded the maximum stack depth"));
        }
        Ok(DepthGuard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        STACK_DEPTH.with(|d| d.set(d.get() - 1));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiKind {
    Sequence,
    Or,
}

/// One element of a [`MultiMatcher`] body: a matcher plus how many times it
/// may repeat (`max: None` means unbounded, `*`/`+`), plus the name of the
/// definition it references — used only to label the sub-token each
/// successful repetition produces.
#[derive(Clone)]
pub struct SequenceElement {
    pub matcher: Rc<dyn Matcher>,
    pub name: String,
    pub min: u32,
    pub max: Option<u32>,
}

impl SequenceElement {
    pub fn once(name: impl Into<String>, matcher: Rc<dyn Matcher>) -> Self {
        Self { matcher, name: name.into(), min: 1, max: Some(1) }
    }

    pub fn star(name: impl Into<String>, matcher: Rc<dyn Matcher>) -> Self {
        Self { matcher, name: name.into(), min: 0, max: None }
    }

    pub fn plus(name: impl Into<String>, matcher: Rc<dyn Matcher>) -> Self {
        Self { matcher, name: name.into(), min: 1, max: None }
    }
}

/// One repetition of a [`SequenceElement`], paired with its index into
/// `elements` so a whole attempt can be turned into named sub-[`Token`]s at
/// the end.
#[derive(Clone)]
struct Rep {
    element: usize,
    span: MatchSpan,
}

pub struct MultiMatcher {
    pub kind: MultiKind,
    pub elements: Vec<SequenceElement>,
    pub max_subtokens: usize,
}

impl MultiMatcher {
    pub fn sequence(elements: Vec<SequenceElement>) -> Result<Self, LexError> {
        if elements.is_empty() {
            return Err(LexError::EmptyDefinition);
        }
        Ok(Self { kind: MultiKind::Sequence, elements, max_subtokens: DEFAULT_MAX_SUBTOKENS })
    }

    pub fn alternation(elements: Vec<SequenceElement>) -> Result<Self, LexError> {
        if elements.is_empty() {
            return Err(LexError::EmptyDefinition);
        }
        Ok(Self { kind: MultiKind::Or, elements, max_subtokens: DEFAULT_MAX_SUBTOKENS })
    }

    /// `true` when this `Multi` has only one reference, in which case its
    /// lone sub-token is flattened away rather than wrapped.
    fn flattens(&self) -> bool {
        self.elements.len() == 1
    }

    fn sub_token(&self, rep: &Rep) -> Token {
        let element = &self.elements[rep.element];
        Token {
            rule: None,
            name: element.name.clone(),
            locations: rep.span.locations,
            text: rep.span.text.clone(),
            sub_tokens: rep.span.sub_tokens.clone(),
        }
    }

    fn try_alternatives(&self, chain: &BufferChain, start: BufferCursor) -> LexResult<MatchSpan> {
        for (index, element) in self.elements.iter().enumerate() {
            match element.matcher.try_match(chain, start)? {
                Outcome::Matched(span) => {
                    let sub_tokens = if self.flattens() {
                        Vec::new()
                    } else {
                        vec![self.sub_token(&Rep { element: index, span: span.clone() })]
                    };
                    return Ok(Outcome::Matched(MatchSpan { sub_tokens, ..span }));
                }
                Outcome::More => return Ok(Outcome::More),
                Outcome::NoMatch | Outcome::Eof => continue,
            }
        }
        Ok(Outcome::NoMatch)
    }

    /// Attempts elements `[index..]` starting at `cursor`, recording each
    /// repetition in `reps`. Returns the cursor and combined [`Locations`]
    /// for everything from `index` onward on success.
    fn try_sequence(
        &self,
        chain: &BufferChain,
        cursor: BufferCursor,
        index: usize,
        reps: &mut Vec<Rep>,
    ) -> LexResult<(BufferCursor, Locations)> {
        if index == self.elements.len() {
            let mut locations = Locations::new();
            let mut hash: u64 = 0;
            let mut chars_since_reset: i64 = 0;
            let mut graphemes_since_reset: i64 = 0;
            let mut saw_reset = false;
            for rep in reps.iter() {
                let rep_locations = rep.span.locations;
                locations.byte.length += rep_locations.byte.length;
                locations.char.length += rep_locations.char.length;
                locations.grapheme.length += rep_locations.grapheme.length;
                locations.line.length += rep_locations.line.length;
                hash = extend_hash(hash, rep.span.text.as_bytes());
                if rep_locations.line.length > 0 {
                    saw_reset = true;
                    chars_since_reset = rep_locations.char.after.max(0);
                    graphemes_since_reset = rep_locations.grapheme.after.max(0);
                } else {
                    chars_since_reset += rep_locations.char.length;
                    graphemes_since_reset += rep_locations.grapheme.length;
                }
            }
            locations.byte.hash = hash;
            locations.char.hash = hash;
            locations.grapheme.hash = hash;
            if saw_reset {
                locations.char.after = chars_since_reset;
                locations.grapheme.after = graphemes_since_reset;
            }
            return Ok(Outcome::Matched((cursor, locations)));
        }

        let element = &self.elements[index];
        let mut attempt: Vec<MatchSpan> = Vec::new();
        let mut cur = cursor;

        loop {
            if let Some(max) = element.max {
                if attempt.len() as u32 >= max {
                    break;
                }
            }
            if reps.len() + attempt.len() >= self.max_subtokens {
                return Err(LexError::MaxLength(format!(
                    "multi sub-token arena exceeded {} entries",
                    self.max_subtokens
                )));
            }
            match element.matcher.try_match(chain, cur)? {
                Outcome::Matched(span) => {
                    if span.locations.byte.length == 0 {
                        return Err(LexError::InfiniteLoop("quantified multi element matched zero-width"));
                    }
                    cur = span.cursor;
                    attempt.push(span);
                }
                Outcome::More => return Ok(Outcome::More),
                Outcome::NoMatch | Outcome::Eof => break,
            }
        }

        while attempt.len() as u32 >= element.min {
            let take = attempt.len();
            reps.extend(attempt[..take].iter().cloned().map(|span| Rep { element: index, span }));
            let resume_cursor = attempt.last().map(|s| s.cursor).unwrap_or(cursor);
            match self.try_sequence(chain, resume_cursor, index + 1, reps)? {
                Outcome::Matched(result) => return Ok(Outcome::Matched(result)),
                Outcome::More => return Ok(Outcome::More),
                Outcome::NoMatch | Outcome::Eof => {
                    reps.truncate(reps.len() - take);
                    if attempt.is_empty() {
                        break;
                    }
                    attempt.pop();
                }
            }
        }

        Ok(Outcome::NoMatch)
    }
}

impl Matcher for MultiMatcher {
    fn try_match(&self, chain: &BufferChain, start: BufferCursor) -> LexResult<MatchSpan> {
        let _guard = DepthGuard::enter()?;
        match self.kind {
            MultiKind::Or => self.try_alternatives(chain, start),
            MultiKind::Sequence => {
                let mut reps = Vec::new();
                match self.try_sequence(chain, start, 0, &mut reps)? {
                    Outcome::Matched((cursor, locations)) => {
                        let text: String = reps.iter().map(|r| r.span.text.as_str()).collect();
                        let sub_tokens = if self.flattens() {
                            Vec::new()
                        } else {
                            reps.iter().map(|r| self.sub_token(r)).collect()
                        };
                        Ok(Outcome::Matched(MatchSpan { locations, cursor, text, sub_tokens }))
                    }
                    Outcome::NoMatch => Ok(Outcome::NoMatch),
                    Outcome::More => Ok(Outcome::More),
                    Outcome::Eof => Ok(Outcome::Eof),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferChain;
    use crate::category::{LETTER_LOWER, NUM_DECIMAL};
    use crate::matcher::CategoryMatcher;

    fn letter() -> Rc<dyn Matcher> {
        Rc::new(CategoryMatcher::new(LETTER_LOWER).unwrap())
    }

    fn digit() -> Rc<dyn Matcher> {
        Rc::new(CategoryMatcher::new(NUM_DECIMAL).unwrap())
    }

    #[test]
    fn sequence_matches_letter_then_digits() {
        let m = MultiMatcher::sequence(vec![
            SequenceElement::once("IDENT", letter()),
            SequenceElement::plus("NUMBER", digit()),
        ])
        .unwrap();
        let chain = BufferChain::from_complete(*b"a123x");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(span.text, "a123");
        assert_eq!(span.locations.byte.length, 4);
        let names: Vec<_> = span.sub_tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["IDENT", "NUMBER", "NUMBER", "NUMBER"]);
    }

    #[test]
    fn sequence_backtracks_star_to_satisfy_trailing_element() {
        // digits* digit — greedy digits* must give back one repetition so
        // the trailing mandatory digit still has something to match.
        let m = MultiMatcher::sequence(vec![
            SequenceElement::star("DIGITS", digit()),
            SequenceElement::once("DIGIT", digit()),
        ])
        .unwrap();
        let chain = BufferChain::from_complete(*b"123x");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected backtracking to find a match");
        };
        assert_eq!(span.text, "123");
    }

    #[test]
    fn alternation_tries_in_priority_order() {
        let m = MultiMatcher::alternation(vec![
            SequenceElement::once("NUM", digit()),
            SequenceElement::once("ID", letter()),
        ])
        .unwrap();
        let chain = BufferChain::from_complete(*b"a");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected the second alternative to match");
        };
        assert_eq!(span.text, "a");
        assert_eq!(span.sub_tokens.len(), 1);
        assert_eq!(span.sub_tokens[0].name, "ID");
    }

    #[test]
    fn sequence_rejects_when_minimum_not_met() {
        let m = MultiMatcher::sequence(vec![SequenceElement::plus("NUMBER", digit())]).unwrap();
        let chain = BufferChain::from_complete(*b"abc");
        assert!(matches!(m.try_match(&chain, BufferCursor::START), Ok(Outcome::NoMatch)));
    }

    #[test]
    fn single_reference_sequence_flattens_its_sub_token() {
        let m = MultiMatcher::sequence(vec![SequenceElement::once("IDENT", letter())]).unwrap();
        let chain = BufferChain::from_complete(*b"a");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert!(span.sub_tokens.is_empty());
    }

    #[test]
    fn three_element_sequence_keeps_ordered_sub_tokens() {
        let m = MultiMatcher::sequence(vec![
            SequenceElement::once("IDENT", letter()),
            SequenceElement::once("IDENT", letter()),
            SequenceElement::once("NUMBER", digit()),
        ])
        .unwrap();
        let chain = BufferChain::from_complete(*b"ab1");
        let Outcome::Matched(span) = m.try_match(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        let texts: Vec<_> = span.sub_tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "1"]);
    }
}
