mod keywords;
mod policy;
mod rules;

pub use policy::{
    QualificationDecision, RejectionReason, RequiredField, RuleOutcome, MIN_VALUE,
    PERISHABLE_MIN_VALUE,
};
pub use rules::QualificationRule;

use super::domain::ItemDetails;
use serde::Serialize;

/// Stateless evaluator applying the ordered acceptance rules to a report.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    rules: Vec<QualificationRule>,
}

impl Default for QualificationEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl QualificationEngine {
    /// The desk's fixed eight-rule policy.
    pub fn standard() -> Self {
        Self {
            rules: QualificationRule::ORDERED.to_vec(),
        }
    }

    pub fn rules(&self) -> &[QualificationRule] {
        &self.rules
    }

    /// Apply rules in order and stop at the first failure.
    pub fn evaluate(&self, details: &ItemDetails) -> QualificationDecision {
        for rule in &self.rules {
            if let RuleOutcome::Fail { reason } = rule.check(details) {
                return QualificationDecision::Rejected { reason };
            }
        }
        QualificationDecision::Accepted
    }

    /// Outcome of every rule, for a checklist view. Acceptance is still
    /// decided by [`QualificationEngine::evaluate`].
    pub fn evaluate_all(&self, details: &ItemDetails) -> Vec<RuleCheck> {
        self.rules
            .iter()
            .map(|rule| RuleCheck {
                rule: *rule,
                label: rule.label(),
                outcome: rule.check(details),
            })
            .collect()
    }

    pub fn criteria(&self) -> QualificationCriteria {
        QualificationCriteria {
            rules: self.rules.iter().map(QualificationRule::label).collect(),
            acceptable_keywords: keywords::ACCEPTABLE,
            excluded_keywords: keywords::EXCLUDED,
            disposable_keywords: keywords::DISPOSABLE,
            non_tangible_keywords: keywords::NON_TANGIBLE,
            high_value_keywords: keywords::HIGH_VALUE,
            minimum_value: MIN_VALUE,
            perishable_minimum_value: PERISHABLE_MIN_VALUE,
        }
    }
}

/// Single row of an `evaluate_all` checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCheck {
    pub rule: QualificationRule,
    pub label: &'static str,
    pub outcome: RuleOutcome,
}

/// Published acceptance policy, for display to reporters and staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualificationCriteria {
    pub rules: Vec<&'static str>,
    pub acceptable_keywords: &'static [&'static str],
    pub excluded_keywords: &'static [&'static str],
    pub disposable_keywords: &'static [&'static str],
    pub non_tangible_keywords: &'static [&'static str],
    pub high_value_keywords: &'static [&'static str],
    pub minimum_value: f64,
    pub perishable_minimum_value: f64,
}
