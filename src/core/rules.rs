//! Alert rules - a small closed predicate grammar over verdict facts
//!
//! Rules are data, not code: operators add or change them through
//! configuration without redeploying. The grammar is deliberately closed
//! (no scripting, no user expressions) so every rule is statically
//! validatable at load time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::errors::{EngineError, EngineResult};
use crate::models::signal::SignalSet;
use crate::models::verdict::{AlertTrigger, RiskLevel};

/// Facts a rule condition may inspect. Everything comes from the finished
/// verdict; rules never see raw inputs.
pub struct RuleFacts<'a> {
    pub score: f64,
    pub level: RiskLevel,
    pub signals: &'a SignalSet,
}

/// One node of the predicate grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum RuleCondition {
    ScoreAtLeast(f64),
    LevelAtLeast(RiskLevel),
    LevelEquals(RiskLevel),
    HasSignalKind(String),
    AllOf(Vec<RuleCondition>),
    AnyOf(Vec<RuleCondition>),
}

impl RuleCondition {
    pub fn evaluate(&self, facts: &RuleFacts) -> bool {
        match self {
            RuleCondition::ScoreAtLeast(min) => facts.score >= *min,
            RuleCondition::LevelAtLeast(level) => facts.level >= *level,
            RuleCondition::LevelEquals(level) => facts.level == *level,
            RuleCondition::HasSignalKind(kind) => facts.signals.has_kind(kind),
            RuleCondition::AllOf(children) => children.iter().all(|c| c.evaluate(facts)),
            RuleCondition::AnyOf(children) => children.iter().any(|c| c.evaluate(facts)),
        }
    }

    fn validate(&self) -> EngineResult<()> {
        match self {
            RuleCondition::ScoreAtLeast(min) => {
                if !min.is_finite() {
                    return Err(EngineError::invalid_rule("score_at_least must be finite"));
                }
            }
            RuleCondition::HasSignalKind(kind) => {
                if kind.trim().is_empty() {
                    return Err(EngineError::invalid_rule("has_signal_kind with empty kind"));
                }
            }
            RuleCondition::AllOf(children) | RuleCondition::AnyOf(children) => {
                if children.is_empty() {
                    return Err(EngineError::invalid_rule("empty all_of/any_of combinator"));
                }
                for c in children {
                    c.validate()?;
                }
            }
            RuleCondition::LevelAtLeast(_) | RuleCondition::LevelEquals(_) => {}
        }
        Ok(())
    }
}

/// One configured alert rule. `id` must be unique per engine; triggers are
/// deduplicated by it downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    pub condition: RuleCondition,
    pub severity: RiskLevel,
    pub message: String,
    /// Action identifiers handed to the alert sink, e.g. `revoke_approval`.
    pub actions: Vec<String>,
}

impl AlertRule {
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_rule("rule with empty id"));
        }
        self.condition
            .validate()
            .map_err(|e| EngineError::invalid_rule(format!("rule '{}': {}", self.id, e)))
    }
}

/// Evaluates every configured rule against one finished verdict,
/// in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AlertRuleEvaluator {
    rules: Vec<AlertRule>,
}

impl AlertRuleEvaluator {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, facts: &RuleFacts) -> Vec<AlertTrigger> {
        let mut triggers = Vec::new();
        for rule in &self.rules {
            if rule.condition.evaluate(facts) {
                debug!(rule = %rule.id, "alert rule fired");
                triggers.push(AlertTrigger {
                    rule_id: rule.id.clone(),
                    severity: rule.severity,
                    message: rule.message.clone(),
                    actions: rule.actions.clone(),
                });
            }
        }
        triggers
    }
}
