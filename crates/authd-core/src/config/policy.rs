//! Declarative policy rule configuration.

use serde::{Deserialize, Serialize};

/// The policy section: an ordered list of declarative rules.
///
/// Order in the file carries no precedence; the engine ranks matches by
/// pattern specificity with explicit deny winning ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// The rule list.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One declarative rule as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Identity id or group label pattern (`"alice"`, `"ops-*"`, `"*"`).
    pub subject: String,
    /// Resource pattern (`"files/projects"`, `"files/*"`, `"*"`).
    pub resource: String,
    /// Action pattern (`"read"`, `"*"`).
    pub action: String,
    /// `"allow"` or `"deny"`.
    pub effect: String,
}
