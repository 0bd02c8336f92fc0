//! The four measurement units every match is accounted in, and the
//! [`Location`] record that tracks one of them.
//!
//! A token's extent is never just "a byte range": downstream tools need to
//! report columns in characters, clip selections on grapheme boundaries, and
//! count lines, all from the same match. Rather than recomputing three of
//! those from the fourth after the fact, every matcher fills in all four
//! [`Location`]s as it goes.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four parallel measurements kept for every match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Byte,
    Char,
    Grapheme,
    Line,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Byte, Unit::Char, Unit::Grapheme, Unit::Line];
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Byte => "byte",
            Unit::Char => "char",
            Unit::Grapheme => "grapheme",
            Unit::Line => "line",
        };
        f.write_str(name)
    }
}

/// Sentinel meaning "no reset": the unit continues counting from
/// `start + length` rather than jumping to an explicit `after` value.
pub const NO_AFTER: i64 = -1;

/// Bookkeeping for a single unit across a single match.
///
/// `start` is where this unit's count stood when the match began. `length`
/// is how many of this unit the match consumed. `after` is normally
/// [`NO_AFTER`]; a matcher sets it to an explicit value only when it needs
/// to reset the running count rather than merely advance it (the database's
/// definition/rule name table uses this to let a later lookup land on a
/// position that isn't `start + length`). `hash` is a cheap content
/// fingerprint used to detect whether a repeated match over the same span
/// reproduced byte-identical output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Location {
    pub start: i64,
    pub length: i64,
    pub after: i64,
    pub hash: u64,
}

impl Location {
    pub const fn new() -> Self {
        Self { start: 0, length: 0, after: NO_AFTER, hash: 0 }
    }

    pub fn at(start: i64) -> Self {
        Self { start, length: 0, after: NO_AFTER, hash: 0 }
    }

    /// The position one past the end of this location: the explicit `after`
    /// reset if one was set, otherwise `start + length`.
    pub fn end(&self) -> i64 {
        if self.after != NO_AFTER {
            self.after
        } else {
            self.start + self.length
        }
    }

    /// `true` for a location whose fields cannot have arisen from a real
    /// match: negative `start`/`length`, or an `after` that points earlier
    /// than `start`.
    pub fn is_valid(&self) -> bool {
        self.start >= 0
            && self.length >= 0
            && (self.after == NO_AFTER || self.after >= self.start)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, +{})", self.start, self.length)
    }
}

/// All four [`Location`]s for a single match, indexed by [`Unit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Locations {
    pub byte: Location,
    pub char: Location,
    pub grapheme: Location,
    pub line: Location,
}

impl Locations {
    pub const fn new() -> Self {
        Self {
            byte: Location::new(),
            char: Location::new(),
            grapheme: Location::new(),
            line: Location::new(),
        }
    }

    pub fn at(byte: i64, char: i64, grapheme: i64, line: i64) -> Self {
        Self {
            byte: Location::at(byte),
            char: Location::at(char),
            grapheme: Location::at(grapheme),
            line: Location::at(line),
        }
    }

    pub fn is_valid(&self) -> bool {
        Unit::ALL.iter().all(|&u| self[u].is_valid())
    }

    /// Folds `delta` (a token's contribution) into `self` (the running
    /// cursor): each unit's new start is the previous `end()`, and the
    /// per-token fields reset to zero/`NO_AFTER` so the cursor always
    /// represents "where the next match would start", never the length of
    /// what already happened.
    pub fn advance(&mut self, delta: &Locations) {
        for unit in Unit::ALL {
            let next_start = delta[unit].end();
            self[unit] = Location::at(next_start);
        }
    }
}

impl Index<Unit> for Locations {
    type Output = Location;

    fn index(&self, unit: Unit) -> &Location {
        match unit {
            Unit::Byte => &self.byte,
            Unit::Char => &self.char,
            Unit::Grapheme => &self.grapheme,
            Unit::Line => &self.line,
        }
    }
}

impl IndexMut<Unit> for Locations {
    fn index_mut(&mut self, unit: Unit) -> &mut Location {
        match unit {
            Unit::Byte => &mut self.byte,
            Unit::Char => &mut self.char,
            Unit::Grapheme => &mut self.grapheme,
            Unit::Line => &mut self.line,
        }
    }
}
