//! The definition and rule database.
//!
//! Definitions and rules are stored in fixed-identity, append-only arenas:
//! once a row is pushed its [`DefId`]/[`RuleId`] never changes and the row
//! itself never moves or is removed, even when a later definition in the
//! same spec file reuses its name. A reference captured while parsing a
//! `Multi` body resolves to whatever [`DefId`] was live *at that point* in
//! the file — resolution happens eagerly, not when the engine later runs —
//! so redefining a name partway through a spec can never retroactively
//! change what an earlier reference meant. This is also how the 31 base
//! category definitions are pre-populated: a user definition of `LETTER`
//! later in the same file simply pushes a new row and updates the live name
//! table, leaving the built-in row (and anything that already referenced
//! it) untouched.

use std::cell::RefCell;
use std::rc::Rc;

use utf8lex_util::{define_idx, FxHashMap};

use crate::category::{self, CategoryMask};
use crate::error::LexError;
use crate::matcher::{CategoryMatcher, LiteralMatcher, Matcher, MultiKind, MultiMatcher, RegexMatcher, SequenceElement};

define_idx!(
    /// Identifies one row in the definition table.
    DefId
);
define_idx!(
    /// Identifies one row in the rule table.
    RuleId
);

/// A single quantified reference inside a `Multi` body: "match whatever
/// `def_id` names, `min..=max` times" (`max: None` is unbounded).
#[derive(Clone, Debug)]
pub struct ElementSpec {
    pub def_id: DefId,
    pub min: u32,
    pub max: Option<u32>,
}

/// What a definition's body actually is, as written in the spec file and
/// before it has been turned into a runtime [`Matcher`].
#[derive(Clone, Debug)]
pub enum DefinitionBody {
    Category(CategoryMask),
    Literal(String),
    Regex(String),
    Multi { kind: MultiKind, elements: Vec<ElementSpec> },
}

impl DefinitionBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            DefinitionBody::Category(_) => "category",
            DefinitionBody::Literal(_) => "literal",
            DefinitionBody::Regex(_) => "regex",
            DefinitionBody::Multi { .. } => "multi",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DefinitionRow {
    pub id: DefId,
    pub name: String,
    pub body: DefinitionBody,
    /// Set once a later definition in the file reuses this name. The row
    /// itself is never removed — only the live name table stops pointing
    /// at it — so ids captured before the override stay resolvable.
    pub unlinked: bool,
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub definition: DefId,
    /// Declaration order. Rules are tried in this order with no
    /// longest-match tie-break, so this doubles as match priority.
    pub priority: usize,
    /// The verbatim text of an optional `{ ... }` user-code block following
    /// the rule's body in the spec file. The core never executes this; it
    /// is carried through for a code emitter to splice into the generated
    /// lexer's match arm.
    pub user_code: Option<String>,
}

/// The definition/rule arena plus the live name table used to resolve
/// references while a spec file is being parsed.
pub struct Database {
    definitions: utf8lex_util::IndexVec<DefId, DefinitionRow>,
    names: FxHashMap<String, DefId>,
    rules: utf8lex_util::IndexVec<RuleId, Rule>,
    built: RefCell<FxHashMap<DefId, Rc<dyn Matcher>>>,
}

impl Database {
    pub fn new() -> Self {
        let mut db = Self {
            definitions: utf8lex_util::IndexVec::new(),
            names: FxHashMap::default(),
            rules: utf8lex_util::IndexVec::new(),
            built: RefCell::new(FxHashMap::default()),
        };
        for (name, mask) in category::predefined() {
            db.define(name, DefinitionBody::Category(*mask))
                .expect("predefined category names and masks are always well-formed");
        }
        db
    }

    /// Adds a new definition, overriding (but not erasing) any earlier
    /// definition of the same name.
    pub fn define(&mut self, name: &str, body: DefinitionBody) -> Result<DefId, LexError> {
        if name.is_empty() {
            return Err(LexError::EmptyDefinition);
        }
        if let DefinitionBody::Literal(text) | DefinitionBody::Regex(text) = &body {
            if text.is_empty() {
                return Err(LexError::EmptyDefinition);
            }
        }
        if let Some(&old_id) = self.names.get(name) {
            if let Some(old_row) = self.definitions.get_mut(old_id) {
                old_row.unlinked = true;
            }
        }
        let id = DefId::from_usize(self.definitions.len());
        self.definitions.push(DefinitionRow { id, name: name.to_string(), body, unlinked: false });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolves a name against the *current* live name table. Used while
    /// parsing a `Multi` body, so a reference is bound to whichever
    /// definition is live at the point it is written.
    pub fn resolve_reference(&self, name: &str) -> Result<DefId, LexError> {
        self.names.get(name).copied().ok_or_else(|| LexError::UnresolvedDefinition(name.to_string()))
    }

    pub fn get(&self, id: DefId) -> Option<&DefinitionRow> {
        self.definitions.get(id)
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// A name guaranteed not to collide with anything defined so far, used
    /// to register the anonymous definitions an inline literal/regex inside
    /// a `Multi` body expands into.
    pub fn next_anon_name(&self, hint: &str) -> String {
        format!("{hint}$anon{}", self.definitions.len())
    }

    pub fn add_rule(&mut self, name: &str, definition: DefId) -> RuleId {
        self.add_rule_with_code(name, definition, None)
    }

    pub fn add_rule_with_code(&mut self, name: &str, definition: DefId, user_code: Option<String>) -> RuleId {
        let priority = self.rules.len();
        self.rules.push(Rule {
            id: RuleId::from_usize(priority),
            name: name.to_string(),
            definition,
            priority,
            user_code,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Builds (and memoizes) the runtime [`Matcher`] for a definition,
    /// recursively resolving any `Multi` elements. Each [`DefId`] is built
    /// at most once regardless of how many rules or `Multi` bodies share it.
    pub fn build_matcher(&self, id: DefId) -> Result<Rc<dyn Matcher>, LexError> {
        if let Some(existing) = self.built.borrow().get(&id) {
            return Ok(existing.clone());
        }
        let row = self
            .definitions
            .get(id)
            .ok_or_else(|| LexError::NotFound(format!("definition id {}", id.index())))?;
        let matcher: Rc<dyn Matcher> = match &row.body {
            DefinitionBody::Category(mask) => Rc::new(CategoryMatcher::new(*mask)?),
            DefinitionBody::Literal(text) => Rc::new(LiteralMatcher::new(text.clone())?),
            DefinitionBody::Regex(pattern) => Rc::new(RegexMatcher::new(pattern)?),
            DefinitionBody::Multi { kind, elements } => {
                let mut built = Vec::with_capacity(elements.len());
                for element in elements {
                    let sub = self.build_matcher(element.def_id)?;
                    let name = self
                        .get(element.def_id)
                        .map(|row| row.name.clone())
                        .unwrap_or_else(|| format!("def{}", element.def_id.index()));
                    built.push(SequenceElement { matcher: sub, name, min: element.min, max: element.max });
                }
                match kind {
                    MultiKind::Sequence => Rc::new(MultiMatcher::sequence(built)?),
                    MultiKind::Or => Rc::new(MultiMatcher::alternation(built)?),
                }
            }
        };
        self.built.borrow_mut().insert(id, matcher.clone());
        Ok(matcher)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
