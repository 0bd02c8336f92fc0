//! The grapheme reader: decodes one UTF-8 scalar value at a time off a
//! [`BufferChain`] and groups scalars into extended grapheme clusters per
//! UAX #29, without ever requiring the whole input to be resident as one
//! contiguous `&str`.
//!
//! Unicode's own grapheme-break algorithm needs lookahead past the
//! character being tested (combining marks, regional indicator pairs, ZWJ
//! emoji sequences all depend on what follows). `unicode-segmentation`'s
//! [`GraphemeCursor`] is built for exactly this: it is the same incremental,
//! chunk-fed cursor rope editors use, and it reports `NextChunk` instead of
//! silently assuming a chunk boundary is a cluster boundary. We feed it one
//! decoded scalar at a time and let it tell us when it has enough context.

use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

use crate::buffer::{BufferChain, BufferCursor};
use crate::category::is_extended_linebreak;
use crate::error::{LexError, LexResult, Outcome};

/// One fully-read extended grapheme cluster.
#[derive(Clone, Debug)]
pub struct GraphemeMatch {
    /// The cluster's text, reassembled from the decoded scalars.
    pub text: String,
    pub byte_len: i64,
    pub char_len: i64,
    /// `true` if this cluster is one of the line-terminating sequences
    /// (`CRLF`, or a lone `CR`/`LF`/`VT`/`FF`/`NEL`/`LS`/`PS`); the caller
    /// advances the line unit by exactly one when this is set, regardless
    /// of how many individual line-break code points the cluster contains.
    pub is_line_terminator: bool,
    /// Rolling content hash of this cluster's bytes: shift the accumulator
    /// left 8 bits and OR in each consumed byte. Byte/Char/Grapheme all
    /// share this one value; Line's hash is always 0.
    pub hash: u64,
    /// The cursor positioned right after this cluster, ready for the next
    /// read.
    pub cursor: BufferCursor,
}

/// Folds `bytes` into a rolling content hash: shift left 8 bits and OR in
/// each byte in turn. Shared by every matcher that needs to extend a hash
/// across more than one grapheme cluster.
pub fn extend_hash(hash: u64, bytes: &[u8]) -> u64 {
    let mut h = hash;
    for &b in bytes {
        h = (h << 8) | (b as u64);
    }
    h
}

fn utf8_sequence_len(lead_byte: u8) -> Option<usize> {
    if lead_byte & 0x80 == 0x00 {
        Some(1)
    } else if lead_byte & 0xE0 == 0xC0 {
        Some(2)
    } else if lead_byte & 0xF0 == 0xE0 {
        Some(3)
    } else if lead_byte & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Decodes a single UTF-8 scalar value starting at `cursor`.
pub(crate) fn decode_char(chain: &BufferChain, cursor: BufferCursor) -> LexResult<(char, BufferCursor)> {
    let (lead, mut cur) = match chain.next_byte(cursor) {
        Outcome::Matched(v) => v,
        Outcome::More => return Ok(Outcome::More),
        Outcome::Eof => return Ok(Outcome::Eof),
        Outcome::NoMatch => unreachable!("BufferChain::next_byte never returns NoMatch"),
    };
    let len = utf8_sequence_len(lead).ok_or(LexError::BadUtf8 { offset: cursor.byte_offset })?;
    let mut bytes = [0u8; 4];
    bytes[0] = lead;
    for slot in bytes.iter_mut().take(len).skip(1) {
        match chain.next_byte(cur) {
            Outcome::Matched((b, next)) => {
                if b & 0xC0 != 0x80 {
                    return Err(LexError::BadUtf8 { offset: cursor.byte_offset });
                }
                *slot = b;
                cur = next;
            }
            Outcome::More => return Ok(Outcome::More),
            Outcome::Eof => return Err(LexError::BadUtf8 { offset: cursor.byte_offset }),
            Outcome::NoMatch => unreachable!(),
        }
    }
    let text = std::str::from_utf8(&bytes[..len]).map_err(|_| LexError::BadUtf8 { offset: cursor.byte_offset })?;
    let c = text.chars().next().ok_or(LexError::BadUtf8 { offset: cursor.byte_offset })?;
    Ok(Outcome::Matched((c, cur)))
}

/// Reads the next extended grapheme cluster starting at `start`.
pub fn read_grapheme(chain: &BufferChain, start: BufferCursor) -> LexResult<GraphemeMatch> {
    let mut local = String::new();
    // byte offset into `local`, paired with the BufferCursor positioned
    // right after the scalar that ends at that offset.
    let mut char_ends: Vec<(usize, BufferCursor)> = Vec::new();

    match decode_char(chain, start)? {
        Outcome::Matched((c, next)) => {
            local.push(c);
            char_ends.push((local.len(), next));
        }
        Outcome::More => return Ok(Outcome::More),
        Outcome::Eof => return Ok(Outcome::Eof),
        Outcome::NoMatch => unreachable!(),
    }

    let mut gc = GraphemeCursor::new(0, usize::MAX, true);
    let boundary = 'find: loop {
        match gc.next_boundary(&local, 0) {
            Ok(Some(boundary)) => break 'find boundary,
            Ok(None) => break 'find local.len(),
            Err(GraphemeIncomplete::NextChunk) => match decode_char(chain, char_ends.last().unwrap().1)? {
                Outcome::Matched((c, next)) => {
                    local.push(c);
                    char_ends.push((local.len(), next));
                }
                Outcome::More => return Ok(Outcome::More),
                Outcome::Eof => break 'find local.len(),
                Outcome::NoMatch => unreachable!(),
            },
            Err(GraphemeIncomplete::PreContext(_)) => {
                // `local` always starts at a true cluster boundary, so
                // there is never real pre-context to supply.
                gc.provide_context("", 0);
            }
            Err(other) => {
                return Err(LexError::State(format!("grapheme cursor requested {other:?}")));
            }
        }
    };

    let char_count = char_ends.iter().position(|(end, _)| *end == boundary).map(|i| i + 1).unwrap_or(char_ends.len());
    let cursor = char_ends[char_count - 1].1;
    let text = local[..boundary].to_string();
    let is_line_terminator = text.chars().any(is_extended_linebreak);
    let hash = extend_hash(0, text.as_bytes());

    Ok(Outcome::Matched(GraphemeMatch {
        byte_len: boundary as i64,
        char_len: char_count as i64,
        is_line_terminator,
        hash,
        text,
        cursor,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(chain: &BufferChain) -> Vec<GraphemeMatch> {
        let mut out = Vec::new();
        let mut cursor = BufferCursor::START;
        loop {
            match read_grapheme(chain, cursor).unwrap() {
                Outcome::Matched(m) => {
                    cursor = m.cursor;
                    out.push(m);
                }
                Outcome::Eof => break,
                Outcome::More => panic!("unexpected MORE against a complete buffer"),
                Outcome::NoMatch => unreachable!(),
            }
        }
        out
    }

    #[test]
    fn splits_plain_ascii_into_single_char_clusters() {
        let chain = BufferChain::from_complete(*b"ab");
        let clusters = read_all(&chain);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].text, "a");
        assert_eq!(clusters[0].byte_len, 1);
        assert_eq!(clusters[0].char_len, 1);
    }

    #[test]
    fn combining_accent_joins_base_letter() {
        let chain = BufferChain::from_complete("e\u{0301}f".as_bytes().to_vec());
        let clusters = read_all(&chain);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].text, "e\u{0301}");
        assert_eq!(clusters[0].char_len, 2);
        assert_eq!(clusters[1].text, "f");
    }

    #[test]
    fn crlf_is_one_grapheme_and_one_line() {
        let chain = BufferChain::from_complete(*b"\r\na");
        let clusters = read_all(&chain);
        assert_eq!(clusters[0].text, "\r\n");
        assert!(clusters[0].is_line_terminator);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn lf_then_cr_is_two_graphemes_and_two_lines() {
        let chain = BufferChain::from_complete(*b"\n\r");
        let clusters = read_all(&chain);
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].is_line_terminator);
        assert!(clusters[1].is_line_terminator);
    }

    #[test]
    fn more_is_returned_when_cluster_may_still_extend() {
        let mut chain = BufferChain::new();
        chain.append(b"e").unwrap();
        assert!(matches!(read_grapheme(&chain, BufferCursor::START), Ok(Outcome::More)));
    }

    #[test]
    fn hash_is_the_byte_shift_of_the_clusters_own_bytes() {
        let chain = BufferChain::from_complete(*b"a");
        let Outcome::Matched(m) = read_grapheme(&chain, BufferCursor::START).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(m.hash, b'a' as u64);
    }

    #[test]
    fn extend_hash_shifts_each_byte_in_turn() {
        assert_eq!(extend_hash(0, &[0x01, 0x02]), 0x0102);
        assert_eq!(extend_hash(0x0102, &[0x03]), 0x010203);
    }
}
