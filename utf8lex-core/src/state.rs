//! `State` ties an input [`BufferChain`] to the running four-unit cursor a
//! [`Driver`] advances as it hands back tokens one at a time.

use crate::buffer::{BufferChain, BufferCursor};
use crate::db::Database;
use crate::driver::Driver;
use crate::error::{LexError, LexResult};
use crate::token::Token;
use crate::unit::Locations;

pub struct State {
    chain: BufferChain,
    position: Locations,
    cursor: BufferCursor,
}

impl State {
    pub fn new(chain: BufferChain) -> Self {
        Self { chain, position: Locations::new(), cursor: BufferCursor::START }
    }

    /// Appends more input. Only valid before [`Self::mark_eof`] has been
    /// called.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), LexError> {
        self.chain.append(bytes)
    }

    /// Marks the input as complete: no more bytes will ever arrive.
    pub fn mark_eof(&mut self) {
        self.chain.set_eof();
    }

    pub fn position(&self) -> &Locations {
        &self.position
    }

    pub fn cursor(&self) -> BufferCursor {
        self.cursor
    }

    /// Attempts to lex the next token against `db`'s rules. Leaves the
    /// cursor untouched on `NO_MATCH`/`MORE`/`EOF`, so a caller that got
    /// `MORE` can [`Self::feed`] more bytes and simply call this again.
    pub fn next_token(&mut self, db: &Database) -> LexResult<Token> {
        let driver = Driver::new(db);
        driver.next_token(&self.chain, &mut self.position, &mut self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::LETTER_LOWER;
    use crate::db::DefinitionBody;
    use crate::error::Outcome;

    #[test]
    fn streams_tokens_as_input_arrives_in_chunks() {
        let mut db = Database::new();
        let ident = db.define("IDENT", DefinitionBody::Category(LETTER_LOWER)).unwrap();
        db.add_rule("IDENT", ident);

        // Feed only the lead byte of "é" (U+00E9, 0xC3 0xA9): the matcher
        // can't decode a full scalar yet, so it must ask for MORE rather
        // than guessing.
        let mut state = State::new(BufferChain::new());
        state.feed(&[0xC3]).unwrap();
        assert!(matches!(state.next_token(&db), Ok(Outcome::More)));

        state.feed(&[0xA9]).unwrap();
        state.mark_eof();
        let Ok(Outcome::Matched(token)) = state.next_token(&db) else {
            panic!("expected a token once the full scalar has arrived");
        };
        assert_eq!(token.text, "é");
    }
}
