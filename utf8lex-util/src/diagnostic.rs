//! Diagnostic reporting.
//!
//! Every fatal outcome surfaced to a top-level caller is rendered as
//! `ERROR <label>: [<line>.<column>] <message> <nearby bytes>`, where the
//! trailing byte window is truncated so a single bad line can't flood the
//! output. [`Handler`] accumulates diagnostics; callers decide when to stop.

use std::fmt;

use crate::span::Span;

/// Number of source bytes echoed after the error position, matching the
/// "fixed window" truncation the error taxonomy calls for.
pub const NEARBY_WINDOW: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "ERROR"),
            Level::Warning => write!(f, "WARNING"),
            Level::Note => write!(f, "NOTE"),
        }
    }
}

/// A single diagnostic: severity, message, source span, and an optional
/// excerpt of the bytes following the span for context.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub label: String,
    pub message: String,
    pub span: Span,
    pub nearby: String,
}

impl Diagnostic {
    pub fn new(level: Level, label: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            label: label.into(),
            message: message.into(),
            span,
            nearby: String::new(),
        }
    }

    pub fn error(label: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, label, message, span)
    }

    /// Attaches a window of nearby source bytes, truncated to
    /// [`NEARBY_WINDOW`] and rendered lossily so invalid UTF-8 doesn't panic
    /// the diagnostic printer.
    pub fn with_nearby(mut self, source: &[u8]) -> Self {
        let start = self.span.start.offset.min(source.len());
        let end = (start + NEARBY_WINDOW).min(source.len());
        self.nearby = String::from_utf8_lossy(&source[start..end]).into_owned();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: [{}] {}", self.level, self.label, self.span.start, self.message)?;
        if !self.nearby.is_empty() {
            write!(f, " {:?}", self.nearby)?;
        }
        Ok(())
    }
}

/// Collects diagnostics emitted over the lifetime of one parse or lex
/// session. Unlike the flow-control outcomes (`MORE`/`NO_MATCH`/`EOF`),
/// every diagnostic handed to a `Handler` is meant to be shown to a user.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    #[test]
    fn display_matches_error_taxonomy_format() {
        let span = Span::point(Position::new(4, 2, 3));
        let diag = Diagnostic::error("spec-parse", "unexpected token", span)
            .with_nearby(b"xx\nfoo bar");
        let rendered = format!("{diag}");
        assert!(rendered.starts_with("ERROR spec-parse: [2.3] unexpected token"));
        assert!(rendered.contains("foo bar"));
    }

    #[test]
    fn handler_tracks_error_presence() {
        let mut handler = Handler::new();
        assert!(!handler.has_errors());
        handler.emit(Diagnostic::new(Level::Warning, "w", "m", Span::DUMMY));
        assert!(!handler.has_errors());
        handler.emit(Diagnostic::error("e", "m", Span::DUMMY));
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics().len(), 2);
    }
}
