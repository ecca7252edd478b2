use serde::{Deserialize, Serialize};

use super::super::domain::ItemDetails;
use super::super::normalizer::contains_any;
use super::keywords;
use super::policy::{RejectionReason, RequiredField, RuleOutcome, MIN_VALUE, PERISHABLE_MIN_VALUE};

/// Named acceptance rules, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationRule {
    RequiredFields,
    ContactFormat,
    LocationPresent,
    NotExcluded,
    Tangible,
    PersonalObject,
    ValueOrImportance,
    PerishableThreshold,
}

impl QualificationRule {
    pub const ORDERED: [QualificationRule; 8] = [
        QualificationRule::RequiredFields,
        QualificationRule::ContactFormat,
        QualificationRule::LocationPresent,
        QualificationRule::NotExcluded,
        QualificationRule::Tangible,
        QualificationRule::PersonalObject,
        QualificationRule::ValueOrImportance,
        QualificationRule::PerishableThreshold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualificationRule::RequiredFields => "Required fields",
            QualificationRule::ContactFormat => "Contact format",
            QualificationRule::LocationPresent => "Institution location",
            QualificationRule::NotExcluded => "Not excluded category",
            QualificationRule::Tangible => "Tangible and storable",
            QualificationRule::PersonalObject => "Personal/movable object",
            QualificationRule::ValueOrImportance => "Sufficient value/importance",
            QualificationRule::PerishableThreshold => "Perishable minimum value",
        }
    }

    pub(crate) fn check(&self, details: &ItemDetails) -> RuleOutcome {
        match self.violation(details) {
            Some(reason) => RuleOutcome::Fail { reason },
            None => RuleOutcome::Pass,
        }
    }

    fn violation(&self, details: &ItemDetails) -> Option<RejectionReason> {
        match self {
            QualificationRule::RequiredFields => first_blank_field(details)
                .map(|field| RejectionReason::MissingRequiredField { field }),
            QualificationRule::ContactFormat => {
                let contact = &details.contact;
                let reachable =
                    contact.chars().any(|c| c.is_ascii_digit()) || contact.contains('@');
                (!reachable).then_some(RejectionReason::InvalidContact)
            }
            QualificationRule::LocationPresent => details
                .location
                .trim()
                .is_empty()
                .then_some(RejectionReason::MissingLocation),
            QualificationRule::NotExcluded => {
                let text = details.keyword_text();
                (contains_any(&text, keywords::EXCLUDED)
                    || contains_any(&text, keywords::DISPOSABLE))
                .then_some(RejectionReason::ExcludedCategory)
            }
            QualificationRule::Tangible => {
                contains_any(&details.keyword_text(), keywords::NON_TANGIBLE)
                    .then_some(RejectionReason::NotTangible)
            }
            QualificationRule::PersonalObject => {
                (!contains_any(&details.keyword_text(), keywords::ACCEPTABLE))
                    .then_some(RejectionReason::NotPersonalObject)
            }
            QualificationRule::ValueOrImportance => {
                let important = details.estimated_value >= MIN_VALUE
                    || contains_any(&details.keyword_text(), keywords::HIGH_VALUE);
                (!important).then_some(RejectionReason::InsufficientValue {
                    estimated_value: details.estimated_value,
                })
            }
            QualificationRule::PerishableThreshold => {
                (details.perishable && details.estimated_value < PERISHABLE_MIN_VALUE).then_some(
                    RejectionReason::PerishableBelowMinimum {
                        estimated_value: details.estimated_value,
                    },
                )
            }
        }
    }
}

fn first_blank_field(details: &ItemDetails) -> Option<RequiredField> {
    [
        (RequiredField::Name, &details.name),
        (RequiredField::Description, &details.description),
        (RequiredField::Location, &details.location),
        (RequiredField::Contact, &details.contact),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
}
