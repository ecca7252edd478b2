use super::common::*;

use crate::desk::qualification::{
    QualificationDecision, QualificationEngine, QualificationRule, RejectionReason, RequiredField,
    RuleOutcome,
};

fn rejection(engine: &QualificationEngine, details: &crate::desk::ItemDetails) -> RejectionReason {
    match engine.evaluate(details) {
        QualificationDecision::Rejected { reason } => reason,
        QualificationDecision::Accepted => panic!("expected {details:?} to be rejected"),
    }
}

#[test]
fn wallet_report_passes_every_rule() {
    let engine = QualificationEngine::standard();
    let decision = engine.evaluate(&wallet_report());
    assert!(decision.is_accepted());
    assert!(decision.reason().is_none());

    let checks = engine.evaluate_all(&wallet_report());
    assert_eq!(checks.len(), 8);
    assert!(checks.iter().all(|check| check.outcome.is_pass()));
}

#[test]
fn food_is_rejected_at_exclusion_regardless_of_value() {
    let engine = QualificationEngine::standard();
    let reason = rejection(&engine, &banana_report());
    assert_eq!(reason, RejectionReason::ExcludedCategory);
    assert_eq!(reason.to_string(), "excluded category");

    let mut expensive = banana_report();
    expensive.estimated_value = 500.0;
    assert_eq!(rejection(&engine, &expensive), RejectionReason::ExcludedCategory);
}

#[test]
fn first_violated_rule_wins() {
    let engine = QualificationEngine::standard();
    let details = banana_report();

    let failing: Vec<QualificationRule> = engine
        .evaluate_all(&details)
        .into_iter()
        .filter(|check| !check.outcome.is_pass())
        .map(|check| check.rule)
        .collect();
    assert!(failing.contains(&QualificationRule::NotExcluded));
    assert!(failing.contains(&QualificationRule::ValueOrImportance));

    assert_eq!(rejection(&engine, &details), RejectionReason::ExcludedCategory);
}

#[test]
fn blank_fields_are_reported_in_field_order() {
    let engine = QualificationEngine::standard();

    let mut details = wallet_report();
    details.name = "   ".to_string();
    details.contact = String::new();
    assert_eq!(
        rejection(&engine, &details),
        RejectionReason::MissingRequiredField {
            field: RequiredField::Name
        }
    );

    let mut details = wallet_report();
    details.contact = " ".to_string();
    let reason = rejection(&engine, &details);
    assert_eq!(
        reason,
        RejectionReason::MissingRequiredField {
            field: RequiredField::Contact
        }
    );
    assert_eq!(reason.summary(), "missing required field");
    assert!(reason.detail().starts_with("contact"));
}

#[test]
fn blank_location_fails_required_fields_and_location_rules() {
    let engine = QualificationEngine::standard();
    let mut details = wallet_report();
    details.location = String::new();

    let checks = engine.evaluate_all(&details);
    let location = checks
        .iter()
        .find(|check| check.rule == QualificationRule::LocationPresent)
        .expect("location rule present");
    assert_eq!(
        location.outcome,
        RuleOutcome::Fail {
            reason: RejectionReason::MissingLocation
        }
    );
    assert_eq!(
        rejection(&engine, &details),
        RejectionReason::MissingRequiredField {
            field: RequiredField::Location
        }
    );
}

#[test]
fn contact_needs_digits_or_email() {
    let engine = QualificationEngine::standard();

    let mut details = wallet_report();
    details.contact = "ask at the front desk".to_string();
    assert_eq!(rejection(&engine, &details), RejectionReason::InvalidContact);

    details.contact = "guard@campus.edu".to_string();
    assert!(engine.evaluate(&details).is_accepted());

    details.contact = "ext 4412".to_string();
    assert!(engine.evaluate(&details).is_accepted());
}

#[test]
fn digital_items_are_not_tangible() {
    let engine = QualificationEngine::standard();
    let details = report("Software license", "activation code on a sticky note");
    assert_eq!(rejection(&engine, &details), RejectionReason::NotTangible);
}

#[test]
fn unrecognized_objects_are_refused() {
    let engine = QualificationEngine::standard();
    let mut details = report("Umbrella", "large umbrella");
    details.estimated_value = 80.0;
    let reason = rejection(&engine, &details);
    assert_eq!(reason, RejectionReason::NotPersonalObject);
    assert_eq!(reason.summary(), "not a recognized personal object");
}

#[test]
fn low_value_items_need_an_important_keyword() {
    let engine = QualificationEngine::standard();

    let mut shirt = report("Black shirt", "plain cotton shirt");
    shirt.estimated_value = 10.0;
    assert_eq!(
        rejection(&engine, &shirt),
        RejectionReason::InsufficientValue {
            estimated_value: 10.0
        }
    );

    shirt.estimated_value = 50.0;
    assert!(engine.evaluate(&shirt).is_accepted());

    let keys = report("House keys", "two keys on a red keychain");
    assert!(engine.evaluate(&keys).is_accepted());
}

#[test]
fn perishables_need_a_higher_value() {
    let engine = QualificationEngine::standard();
    let mut jacket = report("Leather jacket", "brown leather jacket");
    jacket.estimated_value = 80.0;
    jacket.perishable = true;

    let reason = rejection(&engine, &jacket);
    assert_eq!(
        reason,
        RejectionReason::PerishableBelowMinimum {
            estimated_value: 80.0
        }
    );
    assert_eq!(reason.summary(), "perishable below minimum value");

    jacket.estimated_value = 100.0;
    assert!(engine.evaluate(&jacket).is_accepted());
}

#[test]
fn criteria_lists_rules_in_evaluation_order() {
    let engine = QualificationEngine::default();
    assert_eq!(engine.rules(), QualificationRule::ORDERED.as_slice());

    let criteria = engine.criteria();
    let expected: Vec<&str> = QualificationRule::ORDERED
        .iter()
        .map(QualificationRule::label)
        .collect();
    assert_eq!(criteria.rules, expected);
    assert_eq!(criteria.minimum_value, 50.0);
    assert_eq!(criteria.perishable_minimum_value, 100.0);
    assert!(criteria.excluded_keywords.contains(&"food"));
    assert!(criteria.acceptable_keywords.contains(&"wallet"));
}

#[test]
fn decisions_serialize_with_tagged_reasons() {
    let decision = QualificationDecision::Rejected {
        reason: RejectionReason::MissingRequiredField {
            field: RequiredField::Description,
        },
    };
    let value = serde_json::to_value(&decision).expect("serializes");
    assert_eq!(value["decision"], "rejected");
    assert_eq!(value["reason"]["rule"], "missing_required_field");
    assert_eq!(value["reason"]["field"], "description");
}
