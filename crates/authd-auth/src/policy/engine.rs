//! The policy decision engine.

use std::str::FromStr;
use std::sync::{Arc, RwLock};

use tracing::info;

use authd_core::audit::{self, AuditEvent};
use authd_core::config::policy::RuleConfig;
use authd_core::result::AuthResult;
use authd_entity::policy::{Decision, Effect, PolicyRule};

use super::pattern::Pattern;

/// A rule compiled for matching.
#[derive(Debug, Clone)]
struct CompiledRule {
    /// Identity-or-group pattern.
    subject: Pattern,
    /// Resource pattern.
    resource: Pattern,
    /// Action pattern.
    action: Pattern,
    /// Effect when this rule wins.
    effect: Effect,
    /// Total specificity across the three components.
    specificity: u32,
}

/// An immutable, compiled generation of the rule set.
///
/// Decisions in flight hold one generation and complete against it;
/// replacement swaps the whole set atomically, so no decision ever sees a
/// mixture of old and new rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    /// The compiled rules.
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compiles declarative rules into a matchable set.
    pub fn compile(rules: &[PolicyRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let subject = Pattern::parse(&rule.subject);
                let resource = Pattern::parse(&rule.resource);
                let action = Pattern::parse(&rule.action);
                let specificity =
                    subject.specificity() + resource.specificity() + action.specificity();
                CompiledRule {
                    subject,
                    resource,
                    action,
                    effect: rule.effect,
                    specificity,
                }
            })
            .collect();
        Self { rules }
    }

    /// Number of rules in this generation.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether this generation has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Renders allow/deny/indeterminate decisions from the active rule set.
pub struct PolicyEngine {
    /// The active rule-set generation.
    active: RwLock<Arc<RuleSet>>,
}

impl PolicyEngine {
    /// Creates an engine with the given initial rules.
    pub fn new(rules: &[PolicyRule]) -> Self {
        Self {
            active: RwLock::new(Arc::new(RuleSet::compile(rules))),
        }
    }

    /// Returns the active rule-set generation.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.active
            .read()
            .expect("rule set lock poisoned")
            .clone()
    }

    /// Atomically replaces the whole rule set. Returns the new rule
    /// count.
    pub fn replace(&self, rules: &[PolicyRule]) -> usize {
        let compiled = Arc::new(RuleSet::compile(rules));
        let count = compiled.len();
        *self.active.write().expect("rule set lock poisoned") = compiled;

        info!(rules = count, "Policy rule set replaced");
        audit::record(&AuditEvent::PolicyReplaced { rules: count });

        count
    }

    /// Decides whether an identity may perform an action on a resource.
    ///
    /// Every rule whose subject pattern matches the identity id or one of
    /// its group labels, and whose resource and action patterns match, is
    /// collected; the most specific match wins, with explicit deny
    /// breaking ties. No match yields `Indeterminate`; the engine never
    /// downgrades that to `Deny` itself, so the distinction stays
    /// observable downstream.
    pub fn decide(
        &self,
        identity: &str,
        groups: &[String],
        resource: &str,
        action: &str,
    ) -> Decision {
        let snapshot = self.snapshot();

        let mut best_specificity: Option<u32> = None;
        let mut denied_at_best = false;
        let mut allowed_at_best = false;

        for rule in &snapshot.rules {
            let subject_matches = rule.subject.matches(identity)
                || groups.iter().any(|g| rule.subject.matches(g));
            if !subject_matches
                || !rule.resource.matches(resource)
                || !rule.action.matches(action)
            {
                continue;
            }

            match best_specificity {
                Some(best) if rule.specificity < best => continue,
                Some(best) if rule.specificity == best => match rule.effect {
                    Effect::Deny => denied_at_best = true,
                    Effect::Allow => allowed_at_best = true,
                },
                _ => {
                    best_specificity = Some(rule.specificity);
                    denied_at_best = matches!(rule.effect, Effect::Deny);
                    allowed_at_best = matches!(rule.effect, Effect::Allow);
                }
            }
        }

        match (best_specificity, denied_at_best, allowed_at_best) {
            (None, _, _) => Decision::Indeterminate,
            (Some(_), true, _) => Decision::Deny,
            (Some(_), false, true) => Decision::Allow,
            (Some(_), false, false) => Decision::Indeterminate,
        }
    }
}

/// Converts configuration rules into domain rules, validating effects.
pub fn rules_from_config(rules: &[RuleConfig]) -> AuthResult<Vec<PolicyRule>> {
    rules
        .iter()
        .map(|rule| {
            Ok(PolicyRule {
                subject: rule.subject.clone(),
                resource: rule.resource.clone(),
                action: rule.action.clone(),
                effect: Effect::from_str(&rule.effect)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(subject: &str, resource: &str, action: &str, effect: Effect) -> PolicyRule {
        PolicyRule {
            subject: subject.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
            effect,
        }
    }

    #[test]
    fn test_no_match_is_indeterminate() {
        let engine = PolicyEngine::new(&[rule("alice", "files/*", "read", Effect::Allow)]);
        let decision = engine.decide("bob", &[], "files/x", "read");
        assert_eq!(decision, Decision::Indeterminate);
    }

    #[test]
    fn test_deny_beats_allow_at_equal_specificity() {
        let engine = PolicyEngine::new(&[
            rule("alice", "files/x", "read", Effect::Allow),
            rule("alice", "files/x", "read", Effect::Deny),
        ]);
        assert_eq!(engine.decide("alice", &[], "files/x", "read"), Decision::Deny);
    }

    #[test]
    fn test_most_specific_wins() {
        let engine = PolicyEngine::new(&[
            rule("*", "files/*", "read", Effect::Deny),
            rule("alice", "files/x", "read", Effect::Allow),
        ]);
        assert_eq!(engine.decide("alice", &[], "files/x", "read"), Decision::Allow);
    }

    #[test]
    fn test_group_subject_match() {
        let engine = PolicyEngine::new(&[rule("ops", "deploy/*", "exec", Effect::Allow)]);
        let groups = vec!["ops".to_string()];
        assert_eq!(
            engine.decide("carol", &groups, "deploy/api", "exec"),
            Decision::Allow
        );
    }

    #[test]
    fn test_replace_is_whole_set() {
        let engine = PolicyEngine::new(&[rule("alice", "files/x", "read", Effect::Allow)]);
        assert_eq!(engine.decide("alice", &[], "files/x", "read"), Decision::Allow);

        engine.replace(&[rule("alice", "files/x", "read", Effect::Deny)]);
        assert_eq!(engine.decide("alice", &[], "files/x", "read"), Decision::Deny);
    }
}
