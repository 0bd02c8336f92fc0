//! Error types for the shared utility layer itself (index/span bookkeeping).
//!
//! The lexing outcome taxonomy (`OK`/`MORE`/`NO_MATCH`/typed errors) lives in
//! `utf8lex-core`, which is the crate that actually produces those outcomes;
//! this module only covers misuse of the collections this crate provides.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },
}

pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;
