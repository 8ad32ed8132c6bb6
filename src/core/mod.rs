pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod fp_filter;
pub mod rules;

pub use aggregator::{AggregateOutcome, SignalAggregator};
pub use classifier::Classifier;
pub use engine::Engine;
pub use fp_filter::FalsePositiveFilter;
pub use rules::{AlertRule, AlertRuleEvaluator, RuleCondition, RuleFacts};
