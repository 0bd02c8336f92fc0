//! utf8lex-util — diagnostics, spans, and typed-index collections.
//!
//! This crate is the foundation shared by `utf8lex-core` (the lexing engine
//! and spec-file parser) and `utf8lex-cli` (the `generate` front end). It
//! has no opinion about lexing itself: it only provides the small set of
//! zero-cost building blocks that show up at every layer above it —
//! a source [`span::Position`]/[`span::Span`] pair, a [`diagnostic::Handler`]
//! for accumulating user-facing messages, and [`index_vec::IndexVec`] for
//! arena-style storage indexed by a typed id instead of a bare `usize`.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{Position, Span};

pub use rustc_hash::{FxHashMap, FxHashSet};
