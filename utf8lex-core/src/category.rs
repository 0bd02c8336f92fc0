//! Unicode category classification and the 32-bit category mask definitions
//! are built from.
//!
//! The standard Unicode `General_Category` property has 30 values. This
//! module adds two synthetic bits on top so the group unions a lexer needs
//! (`HSPACE`, `VSPACE`, `WHITESPACE`, and their `NOT_*` complements)
//! are expressible as plain bitwise operations instead of special-cased
//! predicates scattered through the matcher code:
//!
//! - bit 30, [`HSPACE_EXTRA`]: flags horizontal whitespace that Unicode
//!   classifies as a control character rather than a separator — `TAB`
//!   (U+0009) is `Cc`, not `Zs`, but belongs in any practical `HSPACE` group.
//! - bit 31, [`LINEBREAK_EXTRA`]: flags the extended UAX #14 line-break set
//!   (`CR LF VT FF NEL LS PS`) that a grapheme/line counter needs but that
//!   Unicode spreads across `Cc`, `Cc`, `Zl` and `Zp`.
//!
//! `NOT_WHITESPACE` and `NOT_VSPACE` deliberately exclude control characters
//! (`Cc`) even though `Cc` itself is not whitespace: a rule meaning "one
//! character that is not whitespace" should not silently swallow a stray
//! NUL or BEL, so those are carved back out of the complement.

use unicode_general_category::{get_general_category, GeneralCategory};

/// A 32-bit union of Unicode general categories plus the two synthetic bits
/// described in the module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const EMPTY: CategoryMask = CategoryMask(0);

    pub const fn bit(n: u32) -> CategoryMask {
        CategoryMask(1 << n)
    }

    pub const fn union(self, other: CategoryMask) -> CategoryMask {
        CategoryMask(self.0 | other.0)
    }

    pub const fn intersects(self, other: CategoryMask) -> bool {
        (self.0 & other.0) != 0
    }

    pub const fn contains(self, other: CategoryMask) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn not(self) -> CategoryMask {
        CategoryMask(!self.0 & ALL.0)
    }
}

impl std::ops::BitOr for CategoryMask {
    type Output = CategoryMask;
    fn bitor(self, rhs: CategoryMask) -> CategoryMask {
        self.union(rhs)
    }
}

impl std::ops::Not for CategoryMask {
    type Output = CategoryMask;
    fn not(self) -> CategoryMask {
        CategoryMask::not(self)
    }
}

macro_rules! gc_bit {
    ($name:ident, $n:expr) => {
        pub const $name: CategoryMask = CategoryMask::bit($n);
    };
}

gc_bit!(LETTER_UPPER, 0); // Lu
gc_bit!(LETTER_LOWER, 1); // Ll
gc_bit!(LETTER_TITLE, 2); // Lt
gc_bit!(LETTER_MODIFIER, 3); // Lm
gc_bit!(LETTER_OTHER, 4); // Lo
gc_bit!(MARK_NONSPACING, 5); // Mn
gc_bit!(MARK_SPACING, 6); // Mc
gc_bit!(MARK_ENCLOSING, 7); // Me
gc_bit!(NUM_DECIMAL, 8); // Nd
gc_bit!(NUM_LETTER, 9); // Nl
gc_bit!(NUM_OTHER, 10); // No
gc_bit!(PUNCT_CONNECTOR, 11); // Pc
gc_bit!(PUNCT_DASH, 12); // Pd
gc_bit!(PUNCT_OPEN, 13); // Ps
gc_bit!(PUNCT_CLOSE, 14); // Pe
gc_bit!(PUNCT_INITIAL, 15); // Pi
gc_bit!(PUNCT_FINAL, 16); // Pf
gc_bit!(PUNCT_OTHER, 17); // Po
gc_bit!(SYM_MATH, 18); // Sm
gc_bit!(SYM_CURRENCY, 19); // Sc
gc_bit!(SYM_MODIFIER, 20); // Sk
gc_bit!(SYM_OTHER, 21); // So
gc_bit!(SEP_SPACE, 22); // Zs
gc_bit!(SEP_LINE, 23); // Zl
gc_bit!(SEP_PARAGRAPH, 24); // Zp
gc_bit!(CONTROL, 25); // Cc
gc_bit!(FORMAT, 26); // Cf
gc_bit!(SURROGATE, 27); // Cs
gc_bit!(PRIVATE_USE, 28); // Co
gc_bit!(UNASSIGNED, 29); // Cn
gc_bit!(HSPACE_EXTRA, 30);
gc_bit!(LINEBREAK_EXTRA, 31);

pub const LETTER: CategoryMask =
    CategoryMask(LETTER_UPPER.0 | LETTER_LOWER.0 | LETTER_TITLE.0 | LETTER_MODIFIER.0 | LETTER_OTHER.0);
pub const MARK: CategoryMask = CategoryMask(MARK_NONSPACING.0 | MARK_SPACING.0 | MARK_ENCLOSING.0);
pub const NUM: CategoryMask = CategoryMask(NUM_DECIMAL.0 | NUM_LETTER.0 | NUM_OTHER.0);
pub const PUNCT: CategoryMask = CategoryMask(
    PUNCT_CONNECTOR.0
        | PUNCT_DASH.0
        | PUNCT_OPEN.0
        | PUNCT_CLOSE.0
        | PUNCT_INITIAL.0
        | PUNCT_FINAL.0
        | PUNCT_OTHER.0,
);
pub const SYM: CategoryMask = CategoryMask(SYM_MATH.0 | SYM_CURRENCY.0 | SYM_MODIFIER.0 | SYM_OTHER.0);
pub const SEPARATOR: CategoryMask = CategoryMask(SEP_SPACE.0 | SEP_LINE.0 | SEP_PARAGRAPH.0);
pub const OTHER: CategoryMask = CategoryMask(CONTROL.0 | FORMAT.0 | SURROGATE.0 | PRIVATE_USE.0 | UNASSIGNED.0);

/// Horizontal whitespace: Unicode space separators, plus `TAB`.
pub const HSPACE: CategoryMask = CategoryMask(SEP_SPACE.0 | HSPACE_EXTRA.0);
/// Vertical whitespace: line/paragraph separators, plus the rest of the
/// extended line-break set (`LF CR VT FF NEL`).
pub const VSPACE: CategoryMask = CategoryMask(SEP_LINE.0 | SEP_PARAGRAPH.0 | LINEBREAK_EXTRA.0);
pub const WHITESPACE: CategoryMask = CategoryMask(HSPACE.0 | VSPACE.0);

pub const ALL: CategoryMask = CategoryMask(u32::MAX);

pub fn not_whitespace() -> CategoryMask {
    CategoryMask((!WHITESPACE.0) & !CONTROL.0 & ALL.0)
}

pub fn not_vspace() -> CategoryMask {
    CategoryMask((!VSPACE.0) & !CONTROL.0 & ALL.0)
}

fn general_category_bit(gc: GeneralCategory) -> CategoryMask {
    match gc {
        GeneralCategory::UppercaseLetter => LETTER_UPPER,
        GeneralCategory::LowercaseLetter => LETTER_LOWER,
        GeneralCategory::TitlecaseLetter => LETTER_TITLE,
        GeneralCategory::ModifierLetter => LETTER_MODIFIER,
        GeneralCategory::OtherLetter => LETTER_OTHER,
        GeneralCategory::NonspacingMark => MARK_NONSPACING,
        GeneralCategory::SpacingMark => MARK_SPACING,
        GeneralCategory::EnclosingMark => MARK_ENCLOSING,
        GeneralCategory::DecimalNumber => NUM_DECIMAL,
        GeneralCategory::LetterNumber => NUM_LETTER,
        GeneralCategory::OtherNumber => NUM_OTHER,
        GeneralCategory::ConnectorPunctuation => PUNCT_CONNECTOR,
        GeneralCategory::DashPunctuation => PUNCT_DASH,
        GeneralCategory::OpenPunctuation => PUNCT_OPEN,
        GeneralCategory::ClosePunctuation => PUNCT_CLOSE,
        GeneralCategory::InitialPunctuation => PUNCT_INITIAL,
        GeneralCategory::FinalPunctuation => PUNCT_FINAL,
        GeneralCategory::OtherPunctuation => PUNCT_OTHER,
        GeneralCategory::MathSymbol => SYM_MATH,
        GeneralCategory::CurrencySymbol => SYM_CURRENCY,
        GeneralCategory::ModifierSymbol => SYM_MODIFIER,
        GeneralCategory::OtherSymbol => SYM_OTHER,
        GeneralCategory::SpaceSeparator => SEP_SPACE,
        GeneralCategory::LineSeparator => SEP_LINE,
        GeneralCategory::ParagraphSeparator => SEP_PARAGRAPH,
        GeneralCategory::Control => CONTROL,
        GeneralCategory::Format => FORMAT,
        GeneralCategory::Surrogate => SURROGATE,
        GeneralCategory::PrivateUse => PRIVATE_USE,
        GeneralCategory::Unassigned => UNASSIGNED,
    }
}

/// The extended UAX #14 mandatory line-break set: `LF CR VT FF NEL LS PS`.
pub fn is_extended_linebreak(c: char) -> bool {
    matches!(c, '\u{000A}' | '\u{000D}' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Classifies a single character into its full category mask, including
/// the two synthetic bits.
pub fn classify(c: char) -> CategoryMask {
    let mut mask = general_category_bit(get_general_category(c));
    if c == '\t' {
        mask = mask.union(HSPACE_EXTRA);
    }
    if is_extended_linebreak(c) {
        mask = mask.union(LINEBREAK_EXTRA);
    }
    mask
}

/// The pre-populated category definitions every database starts with, named
/// the way a user-written spec file would reference them.
pub fn predefined() -> &'static [(&'static str, CategoryMask)] {
    &[
        ("LETTER_UPPER", LETTER_UPPER),
        ("LETTER_LOWER", LETTER_LOWER),
        ("LETTER_TITLE", LETTER_TITLE),
        ("LETTER_MODIFIER", LETTER_MODIFIER),
        ("LETTER_OTHER", LETTER_OTHER),
        ("LETTER", LETTER),
        ("MARK_NONSPACING", MARK_NONSPACING),
        ("MARK_SPACING", MARK_SPACING),
        ("MARK_ENCLOSING", MARK_ENCLOSING),
        ("MARK", MARK),
        ("NUM_DECIMAL", NUM_DECIMAL),
        ("NUM_LETTER", NUM_LETTER),
        ("NUM_OTHER", NUM_OTHER),
        ("NUM", NUM),
        ("PUNCT_CONNECTOR", PUNCT_CONNECTOR),
        ("PUNCT_DASH", PUNCT_DASH),
        ("PUNCT_OPEN", PUNCT_OPEN),
        ("PUNCT_CLOSE", PUNCT_CLOSE),
        ("PUNCT_INITIAL", PUNCT_INITIAL),
        ("PUNCT_FINAL", PUNCT_FINAL),
        ("PUNCT_OTHER", PUNCT_OTHER),
        ("PUNCT", PUNCT),
        ("SYM_MATH", SYM_MATH),
        ("SYM_CURRENCY", SYM_CURRENCY),
        ("SYM_MODIFIER", SYM_MODIFIER),
        ("SYM_OTHER", SYM_OTHER),
        ("SYM", SYM),
        ("SEP_SPACE", SEP_SPACE),
        ("SEP_LINE", SEP_LINE),
        ("SEP_PARAGRAPH", SEP_PARAGRAPH),
        ("SEPARATOR", SEPARATOR),
        ("CONTROL", CONTROL),
        ("FORMAT", FORMAT),
        ("SURROGATE", SURROGATE),
        ("PRIVATE_USE", PRIVATE_USE),
        ("UNASSIGNED", UNASSIGNED),
        ("OTHER", OTHER),
        ("HSPACE", HSPACE),
        ("VSPACE", VSPACE),
        ("WHITESPACE", WHITESPACE),
        ("ALL", ALL),
    ]
}
