//! Declarative policy rule entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The effect a matching rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Permit the action.
    Allow,
    /// Refuse the action. Deny wins ties against allow at equal
    /// specificity.
    Deny,
}

impl Effect {
    /// Return the effect as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Effect {
    type Err = authd_core::AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(authd_core::AuthError::configuration(format!(
                "Invalid rule effect: '{s}'. Expected one of: allow, deny"
            ))),
        }
    }
}

/// One declarative policy rule.
///
/// Patterns are exact strings, prefix wildcards (`"files/*"`), or the
/// full wildcard (`"*"`). The subject pattern is matched against the
/// identity id and each of its group labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Identity-or-group pattern.
    pub subject: String,
    /// Resource pattern.
    pub resource: String,
    /// Action pattern.
    pub action: String,
    /// The effect when this rule wins.
    pub effect: Effect,
}
