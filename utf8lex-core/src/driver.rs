//! The lex driver: picks the next token by trying every rule in declaration
//! order and reporting whichever definite outcome comes first.
//!
//! Rules are not raced by match length — the first rule, in declaration
//! order, whose matcher produces a result wins, exactly as written in the
//! spec file. But "first to match" has to account for `MORE`: if an
//! earlier-priority rule can't yet tell whether it matches because the
//! input might still grow, a later rule matching right now doesn't settle
//! anything, because the earlier rule could still end up winning once more
//! bytes arrive. So a `MORE` from any rule before a definite match is found
//! overrides that match and the whole call reports `MORE`.

use crate::buffer::{BufferChain, BufferCursor};
use crate::db::Database;
use crate::error::{LexResult, Outcome};
use crate::token::Token;
use crate::unit::{Locations, Unit};

pub struct Driver<'a> {
    db: &'a Database,
}

impl<'a> Driver<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Attempts to lex one token starting at `*cursor`/`*position`. On a
    /// definite match, both are advanced past it; on `NO_MATCH`/`MORE`/
    /// `EOF` neither is touched, so the same call can be safely retried
    /// once more input arrives.
    pub fn next_token(
        &self,
        chain: &BufferChain,
        position: &mut Locations,
        cursor: &mut BufferCursor,
    ) -> LexResult<Token> {
        let mut any_more = false;

        for rule in self.db.rules() {
            let matcher = self.db.build_matcher(rule.definition)?;
            match matcher.try_match(chain, *cursor)? {
                Outcome::Matched(span) => {
                    if any_more {
                        return Ok(Outcome::More);
                    }
                    let mut locations = span.locations;
                    for unit in Unit::ALL {
                        locations[unit].start = position[unit].start;
                    }
                    let token = Token {
                        rule: Some(rule.id),
                        name: rule.name.clone(),
                        locations,
                        text: span.text,
                        sub_tokens: span.sub_tokens,
                    };
                    position.advance(&span.locations);
                    *cursor = span.cursor;
                    return Ok(Outcome::Matched(token));
                }
                Outcome::More => any_more = true,
                Outcome::NoMatch | Outcome::Eof => {}
            }
        }

        if any_more {
            return Ok(Outcome::More);
        }
        if chain.is_exhausted(*cursor) {
            return Ok(Outcome::Eof);
        }
        Ok(Outcome::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferChain;
    use crate::category::{LETTER_LOWER, NUM_DECIMAL};
    use crate::db::DefinitionBody;

    fn sample_db() -> Database {
        let mut db = Database::new();
        let num = db.define("NUMBER", DefinitionBody::Category(NUM_DECIMAL)).unwrap();
        let ident = db.define("IDENT", DefinitionBody::Category(LETTER_LOWER)).unwrap();
        db.add_rule("NUMBER", num);
        db.add_rule("IDENT", ident);
        db
    }

    #[test]
    fn picks_the_first_matching_rule_in_declaration_order() {
        let db = sample_db();
        let driver = Driver::new(&db);
        let chain = BufferChain::from_complete(*b"a7");
        let mut position = Locations::new();
        let mut cursor = BufferCursor::START;

        let Outcome::Matched(first) = driver.next_token(&chain, &mut position, &mut cursor).unwrap() else {
            panic!("expected a token");
        };
        assert_eq!(first.name, "IDENT");
        assert_eq!(first.text, "a");

        let Outcome::Matched(second) = driver.next_token(&chain, &mut position, &mut cursor).unwrap() else {
            panic!("expected a second token");
        };
        assert_eq!(second.name, "NUMBER");
        assert_eq!(second.text, "7");
    }

    #[test]
    fn reports_eof_once_input_is_exhausted() {
        let db = sample_db();
        let driver = Driver::new(&db);
        let chain = BufferChain::from_complete(*b"a");
        let mut position = Locations::new();
        let mut cursor = BufferCursor::START;
        driver.next_token(&chain, &mut position, &mut cursor).unwrap();
        assert!(matches!(driver.next_token(&chain, &mut position, &mut cursor), Ok(Outcome::Eof)));
    }

    #[test]
    fn reports_no_match_for_input_no_rule_covers() {
        let db = sample_db();
        let driver = Driver::new(&db);
        let chain = BufferChain::from_complete(*b"!");
        let mut position = Locations::new();
        let mut cursor = BufferCursor::START;
        assert!(matches!(driver.next_token(&chain, &mut position, &mut cursor), Ok(Outcome::NoMatch)));
    }
}
