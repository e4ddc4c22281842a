#![forbid(unsafe_code)]

//! Whole-string match rules.

use std::fmt;

use regex::Regex;

/// A compiled match rule. The whole buffer must match, not a substring.
///
/// # Example
///
/// ```rust
/// use fence_validation::Pattern;
///
/// let hex = Pattern::new("[0-9a-f]*").unwrap();
/// assert!(hex.matches("c0ffee"));
/// assert!(!hex.matches("c0ffee!"));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` as a full-match rule.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| PatternError {
            pattern: source.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Whether `content` satisfies the rule.
    #[inline]
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// The rule as written, without the anchoring added at compile time.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A rule failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// The offending rule.
    pub pattern: String,
    /// Compiler diagnostic.
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern `{}`: {}", self.pattern, self.message)
    }
}

impl std::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_match_only() {
        let digits = Pattern::new("[0-9]+").unwrap();
        assert!(digits.matches("123"));
        assert!(!digits.matches("a123"));
        assert!(!digits.matches("123a"));
        assert!(!digits.matches(""));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let p = Pattern::new("ab|cd").unwrap();
        assert!(p.matches("ab"));
        assert!(p.matches("cd"));
        assert!(!p.matches("abcd"));
        assert!(!p.matches("xcd"));
    }

    #[test]
    fn source_is_kept_verbatim() {
        let p = Pattern::new("[a-z]*").unwrap();
        assert_eq!(p.as_str(), "[a-z]*");
        assert_eq!(p.to_string(), "[a-z]*");
        assert_eq!(p, Pattern::new("[a-z]*").unwrap());
    }

    #[test]
    fn invalid_rule_reports_source() {
        let err = Pattern::new("[a-").unwrap_err();
        assert_eq!(err.pattern, "[a-");
        assert!(err.to_string().starts_with("invalid pattern `[a-`:"));
    }
}
