//! Declarative policy decisions over an atomically replaceable rule set.

pub mod engine;
pub mod pattern;

pub use engine::{PolicyEngine, RuleSet, rules_from_config};
pub use pattern::Pattern;
