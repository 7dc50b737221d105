//! Integration specifications for the review lifecycle.
//!
//! Records and principals are read from the JSON the roster application
//! stores, then driven through the public review service.

mod common {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use shift_eligibility::approvals::{
        ApprovalPolicy, InMemoryReviewRepository, LongTermAbsence, LongTermWish, Principal,
        ReviewService,
    };

    pub(super) type Store<T> = InMemoryReviewRepository<T>;

    pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn principal(id: &str, role: &str) -> Principal {
        serde_json::from_value(json!({ "employeeId": id, "appRole": "User", "role": role }))
            .expect("principal parses")
    }

    pub(super) fn draft_wish() -> LongTermWish {
        serde_json::from_value(json!({
            "id": "w-1",
            "employeeId": "e-gruber",
            "rules": [
                {
                    "kind": "ALWAYS_OFF",
                    "weekday": "Fri",
                    "serviceType": "kreisssaal",
                    "strength": "HARD"
                },
                { "kind": "PREFER_ON", "weekday": "Mon", "serviceType": "any", "strength": "SOFT" }
            ],
            "notes": "Kinderbetreuung"
        }))
        .expect("wish parses")
    }

    pub(super) fn draft_leave() -> LongTermAbsence {
        serde_json::from_value(json!({
            "id": "lt-9",
            "employeeId": "e-gruber",
            "startDate": "2025-09-01",
            "endDate": "2025-09-30",
            "reason": "Bildungskarenz"
        }))
        .expect("absence parses")
    }

    pub(super) fn review_service<T>(
        policy: ApprovalPolicy,
    ) -> (ReviewService<T, Store<T>>, Arc<Store<T>>)
    where
        T: shift_eligibility::approvals::ReviewRecord,
    {
        let repository = Arc::new(Store::default());
        (ReviewService::new(repository.clone(), policy), repository)
    }
}

use common::*;
use shift_eligibility::approvals::{
    ApprovalPolicy, ErrorKind, LifecycleError, LongTermWish, RecordStatus, StateConflict,
};
use shift_eligibility::scheduling::{is_absent, Employee, ServiceLineKey};

#[test]
fn only_the_first_of_two_approvers_reading_the_same_submission_wins() {
    let (service, _) = review_service::<LongTermWish>(ApprovalPolicy::default());
    let owner = principal("e-gruber", "Assistenzarzt");
    let chief = principal("e-chief", "Primarärztin");
    let deputy = principal("e-deputy", "1. Oberärztin");

    service.save(draft_wish(), &owner).expect("draft saved");
    let submitted = service
        .submit(draft_wish(), &owner, at(2, 9))
        .expect("submitted");

    let approved = service
        .approve(&submitted, &chief, Some("passt".to_string()), at(3, 10))
        .expect("first decision stored");
    assert_eq!(approved.review.status, RecordStatus::Genehmigt);

    let err = service
        .reject(&submitted, &deputy, None, at(3, 11))
        .expect_err("second decision is stale");
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert!(matches!(
        err,
        LifecycleError::StateConflict(StateConflict::Stale {
            expected: RecordStatus::Eingereicht,
            found: RecordStatus::Genehmigt,
            ..
        })
    ));

    let stored = service.get(&submitted.id).expect("stored");
    assert_eq!(stored, approved);
    assert_eq!(stored.effective_rules().len(), 2);
    let stamp = stored.review.approval.as_ref().expect("stamp set");
    assert_eq!(stamp.approved_by_id.0, "e-chief");
}

#[test]
fn approved_wish_serialises_with_its_review_fields() {
    let (service, _) = review_service::<LongTermWish>(ApprovalPolicy::default());
    let owner = principal("e-gruber", "Assistenzarzt");
    let submitted = service
        .submit(draft_wish(), &owner, at(2, 9))
        .expect("submitted");
    let approved = service
        .approve(&submitted, &principal("e-chief", "Primar"), None, at(3, 10))
        .expect("approved");

    let value = serde_json::to_value(&approved).expect("serialises");
    assert_eq!(value["status"], "Genehmigt");
    assert_eq!(value["approvedById"], "e-chief");
    assert_eq!(value["submittedAt"], "2025-06-02T09:00:00Z");
    assert!(value["approvalNotes"].is_null());

    let friday = chrono::NaiveDate::from_ymd_opt(2025, 6, 6).expect("valid date");
    assert_eq!(
        approved
            .rules_for(friday, &ServiceLineKey::new("kreisssaal"))
            .len(),
        1
    );
}

#[test]
fn refusals_are_classified_for_callers() {
    let (service, repository) = review_service::<LongTermWish>(ApprovalPolicy::default());
    let owner = principal("e-gruber", "Assistenzarzt");
    let submitted = service
        .submit(draft_wish(), &owner, at(2, 9))
        .expect("submitted");

    let err = service
        .approve(&submitted, &owner, None, at(2, 10))
        .expect_err("residents cannot approve");
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = service
        .save(draft_wish(), &principal("e-other", "Oberarzt"))
        .expect_err("only the owner edits");
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = service
        .save(draft_wish(), &owner)
        .expect_err("submitted records are locked");
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let mut blank = draft_wish();
    blank.id.0 = "  ".to_string();
    let err = service.save(blank, &owner).expect_err("blank id");
    assert_eq!(err.kind(), ErrorKind::Validation);

    let mut unknown = draft_wish();
    unknown.id.0 = "w-404".to_string();
    let err = service.get(&unknown.id).expect_err("never stored");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(repository.len(), 1);
}

#[test]
fn configured_approver_roles_replace_the_defaults() {
    let policy = ApprovalPolicy::from_labels(["Oberarzt"]);
    let (service, _) = review_service::<LongTermWish>(policy);
    let owner = principal("e-gruber", "Assistenzarzt");
    let submitted = service
        .submit(draft_wish(), &owner, at(2, 9))
        .expect("submitted");

    let err = service
        .approve(&submitted, &principal("e-chief", "Primararzt"), None, at(3, 8))
        .expect_err("head of department no longer configured");
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let rejected = service
        .reject(
            &submitted,
            &principal("e-huber", "Oberärztin"),
            Some("  zu viele Freitage  ".to_string()),
            at(3, 9),
        )
        .expect("attending may reject");
    assert_eq!(rejected.review.status, RecordStatus::Abgelehnt);
    assert_eq!(
        rejected.review.approval_notes.as_deref(),
        Some("zu viele Freitage")
    );
}

#[test]
fn approved_long_term_leave_blocks_availability_only_once_decided() {
    let (service, _) = review_service(ApprovalPolicy::default());
    let owner = principal("e-gruber", "Assistenzarzt");
    let employee = Employee::new("e-gruber", Some("Assistenzarzt"));
    let day = chrono::NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date");

    let submitted = service
        .submit(draft_leave(), &owner, at(2, 9))
        .expect("submitted");
    assert!(!is_absent(&employee, day, &[], &[submitted.clone()]));

    let rejected = service
        .reject(&submitted, &principal("e-chief", "Primarärztin"), None, at(4, 9))
        .expect("rejected");
    assert!(!is_absent(&employee, day, &[], &[rejected.clone()]));

    let resubmitted = service
        .submit(rejected, &owner, at(5, 9))
        .expect("resubmitted");
    assert!(resubmitted.absence.review.approval.is_none());

    let approved = service
        .approve(&resubmitted, &principal("e-chief", "Primarärztin"), None, at(6, 9))
        .expect("approved");
    assert!(is_absent(&employee, day, &[], &[approved]));
}
