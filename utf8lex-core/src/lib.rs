//! utf8lex-core — the UTF-8 lexer generator engine.
//!
//! A spec file ([`specparser`]) declares named definitions built from
//! Unicode categories, literals, regexes and compositions of those
//! ([`matcher`]), plus an ordered list of rules. Those definitions and
//! rules live in a [`db::Database`]. A [`driver::Driver`], driven through
//! the streaming-friendly [`state::State`], walks an input
//! [`buffer::BufferChain`] one [`grapheme`] cluster at a time and hands
//! back [`token::Token`]s, each carrying its extent in all four
//! [`unit::Unit`]s — bytes, scalars, grapheme clusters and lines — at once.
//! [`emit`] is the seam a code-generation backend for a specific host
//! language would plug into; none ships here.
//!
//! Everything that can fail reports through the shared [`error::Outcome`]/
//! [`error::LexError`] taxonomy: `NO_MATCH` and `MORE` are control flow a
//! caller is expected to handle, not failures to propagate with `?`.

pub mod buffer;
pub mod category;
pub mod db;
pub mod driver;
pub mod emit;
pub mod error;
pub mod grapheme;
pub mod matcher;
pub mod specparser;
pub mod state;
pub mod token;
pub mod unit;

pub use db::{Database, DefId, DefinitionBody, RuleId};
pub use driver::Driver;
pub use error::{LexError, LexResult, Outcome};
pub use state::State;
pub use token::Token;
pub use unit::{Location, Locations, Unit};

#[cfg(test)]
mod integration_tests {
    use crate::buffer::BufferChain;
    use crate::category::{LETTER, NUM_DECIMAL, WHITESPACE};
    use crate::db::{Database, DefinitionBody};
    use crate::driver::Driver;
    use crate::error::Outcome;
    use crate::unit::Locations;

    fn build_db() -> Database {
        let mut db = Database::new();
        let ident = db.define("IDENT", DefinitionBody::Category(LETTER)).unwrap();
        let number = db.define("NUMBER", DefinitionBody::Category(NUM_DECIMAL)).unwrap();
        let space = db.define("SPACE", DefinitionBody::Category(WHITESPACE)).unwrap();
        db.add_rule("IDENT", ident);
        db.add_rule("NUMBER", number);
        db.add_rule("SPACE", space);
        db
    }

    #[test]
    fn lexes_an_identifier_number_and_space_in_order() {
        let db = build_db();
        let driver = Driver::new(&db);
        let chain = BufferChain::from_complete(*b"x 7");
        let mut position = Locations::new();
        let mut cursor = crate::buffer::BufferCursor::START;

        let mut texts = Vec::new();
        loop {
            match driver.next_token(&chain, &mut position, &mut cursor).unwrap() {
                Outcome::Matched(token) => texts.push(token.text),
                Outcome::Eof => break,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(texts, vec!["x", " ", "7"]);
    }

    #[test]
    fn crlf_advances_the_line_unit_exactly_once() {
        let db = build_db();
        let driver = Driver::new(&db);
        let chain = BufferChain::from_complete(*b"x\r\n7");
        let mut position = Locations::new();
        let mut cursor = crate::buffer::BufferCursor::START;

        driver.next_token(&chain, &mut position, &mut cursor).unwrap(); // "x"
        driver.next_token(&chain, &mut position, &mut cursor).unwrap(); // "\r\n"
        assert_eq!(position.line.start, 1);
        let Outcome::Matched(last) = driver.next_token(&chain, &mut position, &mut cursor).unwrap() else {
            panic!("expected the trailing digit to match");
        };
        assert_eq!(last.text, "7");
        assert_eq!(last.locations.line.start, 1);
    }
}
