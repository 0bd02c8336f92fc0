//! Parses a spec file — the `%%`-separated definitions/rules/user-code
//! sections a lexer is declared in — into a populated [`Database`].
//!
//! The grammar is intentionally small: one definition or rule per line, a
//! definition body is a sequence of quantified references/inline literals
//! and regexes (`A B+ "lit" /re/*`), or an alternation of single references
//! joined by `|` (`A | B | C`), or a bare union of category names
//! (`LETTER | NUM_DECIMAL`) which collapses to a single `Category` mask
//! rather than an `Or` of matchers. A rule line may be followed by a
//! `{ ... }` user-code block, which may span multiple lines and nest
//! braces; its contents are carried through verbatim, never interpreted.
//! Parenthesized, arbitrarily nested combinations of sequence and
//! alternation are not supported — see `DESIGN.md` for why that's left as
//! a follow-on extension rather than built now.
//!
//! Every failure is reported with the `[<line>.<column>]` position of the
//! line it was found on, rendered through [`utf8lex_util::Diagnostic`] so
//! the message matches the same `ERROR <label>: [<line>.<column>] <message>
//! <nearby bytes>` shape used for every other fatal outcome.

mod meta_token;

use utf8lex_util::{Diagnostic, Position, Span};

use crate::category::CategoryMask;
use crate::db::{Database, DefinitionBody, ElementSpec};
use crate::error::LexError;

use meta_token::MetaToken;

/// A fully parsed spec file: the populated database plus the verbatim user
/// code the `%%`-delimited third section carried.
pub struct ParsedSpec {
    pub database: Database,
    pub prologue: String,
    pub user_code: String,
}

/// One physical line plus the [`Position`] of its first byte in the full
/// source, so an error found while parsing it can be reported precisely.
#[derive(Clone, Copy)]
struct NumberedLine<'a> {
    pos: Position,
    text: &'a str,
}

/// Parses `source` end to end.
pub fn parse(source: &str) -> Result<ParsedSpec, LexError> {
    let all_lines = numbered_lines(source);
    let (def_lines, rule_lines, user_code) = split_sections(source, &all_lines)?;

    let (def_lines, prologue) = extract_verbatim_block(&def_lines);

    let mut database = Database::new();

    for line in significant_lines(&def_lines) {
        let (name, body_text) = split_name_and_body(line)?;
        let tokens = meta_token::tokenize_body(body_text).map_err(|e| annotate(e, line.pos, source))?;
        let body = parse_definition_body(&mut database, name, &tokens).map_err(|e| annotate(e, line.pos, source))?;
        database.define(name, body)?;
    }

    let mut i = 0;
    let significant = significant_lines(&rule_lines);
    while i < significant.len() {
        let line = significant[i];
        let (name, rest) = split_name_and_body(line)?;
        let (body_text, code, consumed) =
            extract_rule_body_and_code(rest, &significant[i..]).map_err(|e| annotate(e, line.pos, source))?;
        let tokens = meta_token::tokenize_body(&body_text).map_err(|e| annotate(e, line.pos, source))?;
        let def_id = if tokens.len() == 1 {
            match &tokens[0] {
                MetaToken::Name(n) => database.resolve_reference(n).map_err(|e| annotate(e, line.pos, source))?,
                _ => {
                    let body = parse_definition_body(&mut database, name, &tokens).map_err(|e| annotate(e, line.pos, source))?;
                    database.define(&database.next_anon_name(name), body)?
                }
            }
        } else {
            let body = parse_definition_body(&mut database, name, &tokens).map_err(|e| annotate(e, line.pos, source))?;
            database.define(&database.next_anon_name(name), body)?
        };
        database.add_rule_with_code(name, def_id, code);
        i += consumed;
    }

    Ok(ParsedSpec { database, prologue, user_code: user_code.to_string() })
}

fn annotate(err: LexError, pos: Position, source: &str) -> LexError {
    let message = err.to_string();
    let span = Span::point(pos);
    let diagnostic = Diagnostic::error("spec-parse", message, span).with_nearby(source.as_bytes());
    LexError::Token(diagnostic.to_string())
}

/// Walks `source` once, recording the [`Position`] of the first byte of
/// every physical line (the trailing newline, if any, stays attached to
/// the line it terminates).
fn numbered_lines(source: &str) -> Vec<NumberedLine<'_>> {
    let mut lines = Vec::new();
    let mut pos = Position::START;
    for line in source.split_inclusive('\n') {
        lines.push(NumberedLine { pos, text: line });
        for c in line.chars() {
            pos.advance(c);
        }
    }
    lines
}

/// Splits the numbered lines on the ones that are exactly `%%`, into
/// (definitions, rules, user code). The trailing user-code section is
/// optional; a spec file may end after the rules section's `%%`.
fn split_sections<'a>(
    source: &'a str,
    lines: &[NumberedLine<'a>],
) -> Result<(Vec<NumberedLine<'a>>, Vec<NumberedLine<'a>>, &'a str), LexError> {
    let separators: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.text.trim_end_matches(['\n', '\r']) == "%%")
        .map(|(i, _)| i)
        .collect();

    match separators.len() {
        0 => Err(LexError::Token("spec file is missing the '%%' section separators".to_string())),
        1 => {
            let sep = separators[0];
            Ok((lines[..sep].to_vec(), lines[sep + 1..].to_vec(), ""))
        }
        _ => {
            let first = separators[0];
            let second = separators[1];
            let user_start = lines.get(second + 1).map(|l| l.pos.offset).unwrap_or(source.len());
            Ok((lines[..first].to_vec(), lines[first + 1..second].to_vec(), &source[user_start..]))
        }
    }
}

/// Pulls the first `%{ ... %}` verbatim block (if any) out of the
/// definitions section, returning the remaining lines and the block's
/// interior on its own. A line is part of the verbatim block, and dropped
/// from the returned lines, from the one holding `%{` through the one
/// holding `%}` inclusive.
fn extract_verbatim_block<'a>(lines: &[NumberedLine<'a>]) -> (Vec<NumberedLine<'a>>, String) {
    let open = lines.iter().position(|l| l.text.trim() == "%{");
    let Some(open) = open else {
        return (lines.to_vec(), String::new());
    };
    let close = lines[open + 1..].iter().position(|l| l.text.trim() == "%}").map(|i| open + 1 + i);
    let Some(close) = close else {
        return (lines.to_vec(), String::new());
    };
    let verbatim: String = lines[open + 1..close].iter().map(|l| l.text).collect::<String>().trim().to_string();
    let mut remaining = lines[..open].to_vec();
    remaining.extend_from_slice(&lines[close + 1..]);
    (remaining, verbatim)
}

fn significant_lines<'a>(lines: &[NumberedLine<'a>]) -> Vec<NumberedLine<'a>> {
    lines
        .iter()
        .copied()
        .map(|l| NumberedLine { pos: l.pos, text: l.text.trim() })
        .filter(|l| !l.text.is_empty() && !l.text.starts_with('#'))
        .collect()
}

fn split_name_and_body(line: NumberedLine<'_>) -> Result<(&str, &str), LexError> {
    let mut parts = line.text.splitn(2, char::is_whitespace);
    let name = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LexError::Token(format!("missing name in line: {}", line.text)))?;
    let body = parts.next().unwrap_or("").trim();
    if body.is_empty() {
        return Err(LexError::Token(format!("definition '{name}' has an empty body")));
    }
    Ok((name, body))
}

/// Separates a rule line's body text from an optional, possibly
/// multi-line, `{ ... }` user-code block. `rest` is everything after the
/// rule's name on its own line; `tail` is that line plus every line after
/// it, used to read forward when the block doesn't close on the first
/// line. Returns the body text, the code block's interior (if any), and
/// how many lines (starting at `tail[0]`) were consumed.
fn extract_rule_body_and_code(rest: &str, tail: &[NumberedLine<'_>]) -> Result<(String, Option<String>, usize), LexError> {
    let Some(brace_at) = rest.find('{') else {
        return Ok((rest.to_string(), None, 1));
    };
    let body_text = rest[..brace_at].trim().to_string();
    if body_text.is_empty() {
        return Err(LexError::Token("a rule's body cannot be empty before its '{' code block".to_string()));
    }

    let mut depth = 0i32;
    let mut code = String::new();
    let mut consumed = 0usize;
    let mut started = false;

    'lines: for (line_index, line) in tail.iter().enumerate() {
        let chunk = if line_index == 0 { &rest[brace_at..] } else { line.text };
        for c in chunk.chars() {
            match c {
                '{' => {
                    depth += 1;
                    if depth == 1 {
                        started = true;
                        continue;
                    }
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        consumed = line_index + 1;
                        break 'lines;
                    }
                }
                _ => {}
            }
            if started && depth >= 1 {
                code.push(c);
            }
        }
        if line_index == tail.len() - 1 {
            return Err(LexError::Token("unterminated '{' code block in rule".to_string()));
        }
        code.push('\n');
    }

    Ok((body_text, Some(code.trim().to_string()), consumed.max(1)))
}

fn parse_definition_body(db: &mut Database, name_hint: &str, tokens: &[MetaToken]) -> Result<DefinitionBody, LexError> {
    if tokens.is_empty() {
        return Err(LexError::EmptyDefinition);
    }

    if tokens.len() == 1 {
        return match &tokens[0] {
            MetaToken::Literal(s) => Ok(DefinitionBody::Literal(s.clone())),
            MetaToken::Regex(p) => Ok(DefinitionBody::Regex(p.clone())),
            MetaToken::Name(n) => {
                let def_id = db.resolve_reference(n)?;
                Ok(DefinitionBody::Multi {
                    kind: crate::matcher::MultiKind::Sequence,
                    elements: vec![ElementSpec { def_id, min: 1, max: Some(1) }],
                })
            }
            MetaToken::Pipe | MetaToken::Star | MetaToken::Plus => {
                Err(LexError::Token("a definition body cannot be a bare operator".to_string()))
            }
        };
    }

    // A bare union of category names, e.g. `LETTER | NUM_DECIMAL`: collapse
    // to one Category mask rather than an Or of single-character matchers.
    if tokens.iter().all(|t| matches!(t, MetaToken::Name(_) | MetaToken::Pipe)) {
        if let Some(mask) = try_category_union(db, tokens)? {
            return Ok(DefinitionBody::Category(mask));
        }
    }

    if tokens.iter().any(|t| matches!(t, MetaToken::Pipe)) {
        let mut elements = Vec::new();
        for part in tokens.split(|t| matches!(t, MetaToken::Pipe)) {
            if part.len() != 1 {
                return Err(LexError::Token("each '|' alternative must be a single reference, literal or regex".to_string()));
            }
            elements.push(parse_element(db, name_hint, &part[0], 1, Some(1))?);
        }
        return Ok(DefinitionBody::Multi { kind: crate::matcher::MultiKind::Or, elements });
    }

    let mut elements = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (min, max, consumed) = match tokens.get(i + 1) {
            Some(MetaToken::Star) => (0, None, 2),
            Some(MetaToken::Plus) => (1, None, 2),
            _ => (1, Some(1), 1),
        };
        elements.push(parse_element(db, name_hint, &tokens[i], min, max)?);
        i += consumed;
    }
    Ok(DefinitionBody::Multi { kind: crate::matcher::MultiKind::Sequence, elements })
}

/// Attempts to read `tokens` as `NAME (| NAME)*` where every named
/// definition is itself a `Category`. Returns `None` (not an error) if any
/// referenced definition is not a category, so the caller falls back to
/// treating the tokens as an ordinary alternation of matchers.
fn try_category_union(db: &Database, tokens: &[MetaToken]) -> Result<Option<CategoryMask>, LexError> {
    let mut mask = CategoryMask::EMPTY;
    let mut expect_name = true;
    for token in tokens {
        match (token, expect_name) {
            (MetaToken::Name(n), true) => {
                let def_id = db.resolve_reference(n)?;
                let row = db.get(def_id).expect("resolve_reference only returns live ids");
                match &row.body {
                    DefinitionBody::Category(m) => mask = mask.union(*m),
                    _ => return Ok(None),
                }
                expect_name = false;
            }
            (MetaToken::Pipe, false) => expect_name = true,
            _ => return Ok(None),
        }
    }
    if expect_name {
        return Ok(None);
    }
    Ok(Some(mask))
}

fn parse_element(
    db: &mut Database,
    name_hint: &str,
    token: &MetaToken,
    min: u32,
    max: Option<u32>,
) -> Result<ElementSpec, LexError> {
    let def_id = match token {
        MetaToken::Name(n) => db.resolve_reference(n)?,
        MetaToken::Literal(s) => {
            let anon = db.next_anon_name(name_hint);
            db.define(&anon, DefinitionBody::Literal(s.clone()))?
        }
        MetaToken::Regex(p) => {
            let anon = db.next_anon_name(name_hint);
            db.define(&anon, DefinitionBody::Regex(p.clone()))?
        }
        MetaToken::Pipe | MetaToken::Star | MetaToken::Plus => {
            return Err(LexError::Token("expected a reference, literal or regex".to_string()))
        }
    };
    Ok(ElementSpec { def_id, min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
IDENT       LETTER+
NUMBER      NUM_DECIMAL+
GREETING    "hello" IDENT*
%%
IDENT       IDENT
NUMBER      NUMBER
GREETING    GREETING
%%
// user code section is opaque to the parser
"#;

    #[test]
    fn parses_definitions_and_rules_in_declaration_order() {
        let parsed = parse(SAMPLE).unwrap();
        assert_eq!(parsed.database.rule_count(), 3);
        let names: Vec<_> = parsed.database.rules().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["IDENT", "NUMBER", "GREETING"]);
    }

    #[test]
    fn inline_literal_inside_a_sequence_is_registered_anonymously() {
        let parsed = parse(SAMPLE).unwrap();
        let greeting_rule = parsed.database.rules().find(|r| r.name == "GREETING").unwrap();
        assert!(parsed.database.build_matcher(greeting_rule.definition).is_ok());
    }

    #[test]
    fn missing_separators_is_an_error() {
        assert!(parse("IDENT LETTER+").is_err());
    }

    #[test]
    fn unresolved_reference_is_reported() {
        let src = "FOO BAR_UNDEFINED\n%%\nFOO FOO\n%%\n";
        assert!(parse(src).is_err());
    }

    #[test]
    fn parse_errors_carry_a_line_and_column() {
        let src = "FOO BAR_UNDEFINED\n%%\nFOO FOO\n%%\n";
        let err = parse(src).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("[1."), "expected a line.column prefix, got: {message}");
    }

    #[test]
    fn rule_embedded_code_block_is_captured_verbatim() {
        let src = "IDENT LETTER+\n%%\nIDENT IDENT { emit_token(IDENT); }\n%%\n";
        let parsed = parse(src).unwrap();
        let rule = parsed.database.rules().next().unwrap();
        assert_eq!(rule.user_code.as_deref(), Some("emit_token(IDENT);"));
    }

    #[test]
    fn multi_line_rule_code_block_is_captured() {
        let src = "IDENT LETTER+\n%%\nIDENT IDENT {\n    let x = 1;\n    emit(x);\n}\n%%\n";
        let parsed = parse(src).unwrap();
        let rule = parsed.database.rules().next().unwrap();
        let code = rule.user_code.as_deref().unwrap();
        assert!(code.contains("let x = 1;"));
        assert!(code.contains("emit(x);"));
    }

    #[test]
    fn unterminated_rule_code_block_is_an_error() {
        let src = "IDENT LETTER+\n%%\nIDENT IDENT {\n    let x = 1;\n%%\n";
        assert!(parse(src).is_err());
    }
}
