//! Policy decision enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for an (identity, resource, action) triple.
///
/// `Indeterminate` means no rule matched. The engine never downgrades it
/// to `Deny`; every caller is contractually required to treat it as deny,
/// keeping the distinction observable for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// An allow rule won the match.
    Allow,
    /// A deny rule won the match.
    Deny,
    /// No rule matched the triple.
    Indeterminate,
}

impl Decision {
    /// Whether callers may proceed with the requested action.
    ///
    /// `Indeterminate` fails closed.
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Return the decision as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
