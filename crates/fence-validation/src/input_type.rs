#![forbid(unsafe_code)]

//! Input types and the rules they select.
//!
//! A rule is checked on every keystroke, so it has to accept every prefix a
//! user passes through on the way to a finished value: `2024-0` is a valid
//! date *so far*, `foo@bar.` a valid email *so far*. That is why the date,
//! time and email rules are unions of partial forms rather than strict
//! final-format checks.
//!
//! Character classes are ASCII: `[0-9]` for digits and `[0-9A-Za-z_]` for word
//! characters.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::pattern::Pattern;

/// Named input constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputType {
    /// No constraint.
    #[default]
    None,
    /// Digits only.
    Integer,
    /// Optional leading minus, then digits.
    SignedInteger,
    /// Digits with at most one decimal point (after the first digit).
    Decimal,
    /// Optional minus, then a decimal.
    SignedDecimal,
    /// Email address, possibly incomplete.
    Email,
    /// `YYYY-MM-DD` date, possibly incomplete.
    Date,
    /// `HH:MM:SS` time, possibly incomplete.
    Time,
    /// Word characters only.
    Word,
}

const INTEGER: &str = "[0-9]*";
const SIGNED_INTEGER: &str = "-?[0-9]*";
const DECIMAL: &str = r"[0-9]+\.?[0-9]*";
// A lone "-" is the first keystroke of every negative number.
const SIGNED_DECIMAL: &str = r"-?(?:[0-9]+\.?[0-9]*)?";
// Local part, then "@" and up to four labels, the last one possibly empty.
const EMAIL: &str = r"[0-9A-Za-z_-]+(?:@(?:[0-9A-Za-z_-]+\.){0,3}[0-9A-Za-z_-]*)?";
const TIME: &str = "[0-9]{0,2}|[0-9]{2}:[0-9]{0,2}|[0-9]{2}:[0-9]{2}:[0-9]{0,2}";
const WORD: &str = "[0-9A-Za-z_]*";

const DAYS_31: &str = "(?:0[1-9]?|[12][0-9]?|3[01]?)";
const DAYS_30: &str = "(?:0[1-9]?|[12][0-9]?|30?)";
const DAYS_29: &str = "(?:0[1-9]?|[12][0-9]?)";

fn date_source() -> String {
    let day = |days: &str| format!("(?:-{days}?)?");
    let month = format!(
        "(?:0(?:[13578]{d31}|[469]{d30}|2{d29})?|1(?:1{d30}|[02]{d31})?)",
        d31 = day(DAYS_31),
        d30 = day(DAYS_30),
        d29 = day(DAYS_29),
    );
    format!("[1-9](?:[0-9]{{0,3}}|[0-9]{{3}}-{month}?)")
}

static PATTERNS: [OnceLock<Option<Pattern>>; InputType::ALL.len()] =
    [const { OnceLock::new() }; InputType::ALL.len()];

impl InputType {
    /// Every input type, in code order.
    pub const ALL: [InputType; 9] = [
        Self::None,
        Self::Integer,
        Self::SignedInteger,
        Self::Decimal,
        Self::SignedDecimal,
        Self::Email,
        Self::Date,
        Self::Time,
        Self::Word,
    ];

    /// Numeric code (0 = none .. 8 = word).
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Integer => 1,
            Self::SignedInteger => 2,
            Self::Decimal => 3,
            Self::SignedDecimal => 4,
            Self::Email => 5,
            Self::Date => 6,
            Self::Time => 7,
            Self::Word => 8,
        }
    }

    /// Look up a numeric code. Unknown codes mean no constraint.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(Self::None)
    }

    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Integer => "integer",
            Self::SignedInteger => "signed-integer",
            Self::Decimal => "decimal",
            Self::SignedDecimal => "signed-decimal",
            Self::Email => "email",
            Self::Date => "date",
            Self::Time => "time",
            Self::Word => "word",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" | "" | "any" | "text" => Some(Self::None),
            "integer" | "int" | "number" => Some(Self::Integer),
            "signed-integer" | "signed-int" | "signed-number" => Some(Self::SignedInteger),
            "decimal" | "float" => Some(Self::Decimal),
            "signed-decimal" | "signed-float" => Some(Self::SignedDecimal),
            "email" | "email-like" => Some(Self::Email),
            "date" | "date-like" => Some(Self::Date),
            "time" | "time-like" => Some(Self::Time),
            "word" | "word-characters" => Some(Self::Word),
            _ => None,
        }
    }

    /// Parse a name, falling back to [`InputType::None`] when unknown.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::None)
    }

    /// The rule source for this type, or `None` for no constraint.
    #[must_use]
    pub fn pattern_source(self) -> Option<Cow<'static, str>> {
        let source = match self {
            Self::None => return None,
            Self::Integer => INTEGER,
            Self::SignedInteger => SIGNED_INTEGER,
            Self::Decimal => DECIMAL,
            Self::SignedDecimal => SIGNED_DECIMAL,
            Self::Email => EMAIL,
            Self::Date => return Some(Cow::Owned(date_source())),
            Self::Time => TIME,
            Self::Word => WORD,
        };
        Some(Cow::Borrowed(source))
    }

    /// The compiled rule for this type. Compiled once per process.
    #[must_use]
    pub fn pattern(self) -> Option<Pattern> {
        PATTERNS[self.code() as usize]
            .get_or_init(|| Pattern::new(&self.pattern_source()?).ok())
            .clone()
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that does not denote an [`InputType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInputType(pub String);

impl fmt::Display for UnknownInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown input type `{}` (expected none|integer|signed-integer|decimal|signed-decimal|email|date|time|word)",
            self.0
        )
    }
}

impl std::error::Error for UnknownInputType {}

impl FromStr for InputType {
    type Err = UnknownInputType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownInputType(s.to_string()))
    }
}
