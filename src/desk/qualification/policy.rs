use serde::{Deserialize, Serialize};
use std::fmt;

/// Items valued at or above this are kept whatever they are.
pub const MIN_VALUE: f64 = 50.0;
/// Perishables valued below this are refused.
pub const PERISHABLE_MIN_VALUE: f64 = 100.0;

/// Report fields that must be non-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Name,
    Description,
    Location,
    Contact,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Name => "name",
            RequiredField::Description => "description",
            RequiredField::Location => "location",
            RequiredField::Contact => "contact",
        }
    }
}

/// Why a report was refused. One variant per qualification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingRequiredField { field: RequiredField },
    InvalidContact,
    MissingLocation,
    ExcludedCategory,
    NotTangible,
    NotPersonalObject,
    InsufficientValue { estimated_value: f64 },
    PerishableBelowMinimum { estimated_value: f64 },
}

impl RejectionReason {
    /// Reason string shown to reporters.
    pub fn summary(&self) -> &'static str {
        match self {
            RejectionReason::MissingRequiredField { .. } => "missing required field",
            RejectionReason::InvalidContact => "invalid contact",
            RejectionReason::MissingLocation => "missing location",
            RejectionReason::ExcludedCategory => "excluded category",
            RejectionReason::NotTangible => "not tangible",
            RejectionReason::NotPersonalObject => "not a recognized personal object",
            RejectionReason::InsufficientValue { .. } => "insufficient value/importance",
            RejectionReason::PerishableBelowMinimum { .. } => "perishable below minimum value",
        }
    }

    /// Longer guidance for staff, naming the offending field or amount.
    pub fn detail(&self) -> String {
        match self {
            RejectionReason::MissingRequiredField { field } => {
                format!("{} is required and cannot be blank", field.label())
            }
            RejectionReason::InvalidContact => {
                "contact must contain a phone number (digits) or an email address (@)".to_string()
            }
            RejectionReason::MissingLocation => "location is required".to_string(),
            RejectionReason::ExcludedCategory => {
                "food, beverages and disposable items are not accepted".to_string()
            }
            RejectionReason::NotTangible => {
                "digital or virtual items cannot be stored".to_string()
            }
            RejectionReason::NotPersonalObject => {
                "only personal or movable objects are accepted".to_string()
            }
            RejectionReason::InsufficientValue { estimated_value } => format!(
                "estimated value {estimated_value:.2} is below {MIN_VALUE:.2} and no valuable keyword was found"
            ),
            RejectionReason::PerishableBelowMinimum { estimated_value } => format!(
                "perishable item valued {estimated_value:.2} is below {PERISHABLE_MIN_VALUE:.2}"
            ),
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

/// Result of applying a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    Pass,
    Fail { reason: RejectionReason },
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }
}

/// Adjudication for a found-item report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum QualificationDecision {
    Accepted,
    Rejected { reason: RejectionReason },
}

impl QualificationDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, QualificationDecision::Accepted)
    }

    pub fn reason(&self) -> Option<&RejectionReason> {
        match self {
            QualificationDecision::Accepted => None,
            QualificationDecision::Rejected { reason } => Some(reason),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            QualificationDecision::Accepted => "item meets all qualification criteria".to_string(),
            QualificationDecision::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}
