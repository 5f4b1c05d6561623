//! Rule pattern matching.

use std::fmt;

/// Specificity weight of an exact pattern component.
///
/// Any exact match outranks every prefix pattern, and longer prefixes
/// outrank shorter ones; prefix lengths stay far below this weight.
const EXACT_WEIGHT: u32 = 1 << 20;

/// One component of a rule: exact string, prefix wildcard, or full
/// wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches the value exactly.
    Exact(String),
    /// Matches values starting with the prefix (written `"files/*"`).
    Prefix(String),
    /// Matches anything (written `"*"`).
    Any,
}

impl Pattern {
    /// Parses the configuration syntax.
    pub fn parse(s: &str) -> Self {
        if s == "*" {
            Self::Any
        } else if let Some(prefix) = s.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(s.to_string())
        }
    }

    /// Whether the pattern matches a value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => s == value,
            Self::Prefix(p) => value.starts_with(p.as_str()),
            Self::Any => true,
        }
    }

    /// Numeric specificity: exact beats any prefix, longer prefixes beat
    /// shorter ones, the full wildcard ranks last.
    pub fn specificity(&self) -> u32 {
        match self {
            Self::Exact(_) => EXACT_WEIGHT,
            Self::Prefix(p) => 1 + p.len() as u32,
            Self::Any => 0,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "{s}"),
            Self::Prefix(p) => write!(f, "{p}*"),
            Self::Any => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Pattern::parse("*"), Pattern::Any);
        assert_eq!(Pattern::parse("files/*"), Pattern::Prefix("files/".to_string()));
        assert_eq!(Pattern::parse("read"), Pattern::Exact("read".to_string()));
    }

    #[test]
    fn test_matches() {
        assert!(Pattern::parse("*").matches("anything"));
        assert!(Pattern::parse("files/*").matches("files/projects"));
        assert!(!Pattern::parse("files/*").matches("docs/projects"));
        assert!(Pattern::parse("read").matches("read"));
        assert!(!Pattern::parse("read").matches("write"));
    }

    #[test]
    fn test_specificity_ordering() {
        let exact = Pattern::parse("files/projects");
        let long_prefix = Pattern::parse("files/pro*");
        let short_prefix = Pattern::parse("files/*");
        let any = Pattern::parse("*");

        assert!(exact.specificity() > long_prefix.specificity());
        assert!(long_prefix.specificity() > short_prefix.specificity());
        assert!(short_prefix.specificity() > any.specificity());
    }
}
