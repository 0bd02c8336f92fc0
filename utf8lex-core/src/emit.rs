//! The code-emission interface.
//!
//! Turning a populated [`Database`] into generated lexer source for a given
//! host language is deliberately out of scope beyond this trait: a real
//! backend (templated Rust, C, ...) is its own large undertaking, and
//! nothing elsewhere in this crate depends on one existing yet. What does
//! need to exist now is the seam a backend plugs into, so the CLI front end
//! and the rest of the engine can be written against it.

use std::fmt;
use std::str::FromStr;

use utf8lex_util::Idx;

use crate::db::Database;
use crate::error::LexError;

/// Which host language a generated lexer targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Rust,
    C,
    Other,
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetLanguage::Rust => "rust",
            TargetLanguage::C => "c",
            TargetLanguage::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetLanguage {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, LexError> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(TargetLanguage::Rust),
            "c" => Ok(TargetLanguage::C),
            other => Err(LexError::NotFound(format!("unsupported target language '{other}'"))),
        }
    }
}

/// Implemented by one code generator per target language.
///
/// A backend sees the whole resolved [`Database`] — every definition, in
/// declaration order, with overridden rows still present — so it is free
/// to inline category masks, unroll quantifiers, or emit a table-driven
/// matcher, whichever fits its target language best.
pub trait Emitter {
    fn target(&self) -> TargetLanguage;
    fn emit(&self, db: &Database) -> Result<String, LexError>;
}

/// A placeholder emitter: renders the rule table as commented pseudocode.
/// Useful for `--dry-run`-style diagnostics and as the shape a real
/// template-driven backend would follow, but not a runnable lexer.
pub struct DebugEmitter;

impl Emitter for DebugEmitter {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Other
    }

    fn emit(&self, db: &Database) -> Result<String, LexError> {
        let mut out = String::from("// rule table, in declaration (priority) order\n");
        for rule in db.rules() {
            out.push_str(&format!(
                "// [{:>3}] {} -> definition #{}\n",
                rule.priority,
                rule.name,
                rule.definition.index()
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_target_names() {
        assert_eq!("rust".parse::<TargetLanguage>().unwrap(), TargetLanguage::Rust);
        assert_eq!("RS".parse::<TargetLanguage>().unwrap(), TargetLanguage::Rust);
        assert!("cobol".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn debug_emitter_renders_one_line_per_rule() {
        let mut db = Database::new();
        let id = db.resolve_reference("LETTER").unwrap();
        db.add_rule("IDENT", id);
        let rendered = DebugEmitter.emit(&db).unwrap();
        assert!(rendered.contains("IDENT"));
    }
}
