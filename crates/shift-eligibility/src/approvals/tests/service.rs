use std::sync::Arc;

use chrono::Weekday;

use super::common::*;
use crate::approvals::{
    ApprovalPolicy, ErrorKind, InMemoryReviewRepository, LifecycleError, PlannedAbsence,
    RecordId, RecordStatus, ReviewRecord, ReviewRepository, ReviewService, StateConflict,
};
use crate::scheduling::EmployeeId;

#[test]
fn wish_goes_from_draft_to_approved() {
    let (service, repository) = wish_service(Vec::new());

    let draft = service
        .save(wish("w-1", RecordStatus::Entwurf), &owner())
        .expect("draft saved");
    assert_eq!(draft.status(), RecordStatus::Entwurf);

    let submitted = service.submit(draft, &owner(), at(2, 8)).expect("submitted");
    assert_eq!(submitted.status(), RecordStatus::Eingereicht);

    let approved = service
        .approve(&submitted, &chief(), Some("ok".to_string()), at(3, 9))
        .expect("approved");
    assert_eq!(approved.status(), RecordStatus::Genehmigt);
    assert_eq!(approved.effective_rules().len(), 1);

    let stored = repository
        .fetch(&RecordId("w-1".to_string()))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, approved);
    assert_eq!(repository.len(), 1);
}

#[test]
fn submit_inserts_a_record_that_was_never_saved() {
    let (service, repository) = wish_service(Vec::new());
    let submitted = service
        .submit(wish("w-9", RecordStatus::Entwurf), &owner(), at(2, 8))
        .expect("create and submit");
    assert_eq!(submitted.status(), RecordStatus::Eingereicht);
    assert_eq!(
        service.get(&RecordId("w-9".to_string())).expect("stored"),
        submitted
    );
    assert!(!repository.is_empty());
}

#[test]
fn refused_transitions_leave_the_store_untouched() {
    let (service, repository) = wish_service(vec![submitted_wish("w-1")]);
    let before = service.get(&RecordId("w-1".to_string())).expect("stored");

    let err = service
        .approve(&before, &colleague(), None, at(3, 9))
        .expect_err("not an approver");
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = service
        .save(before.clone(), &owner())
        .expect_err("submitted record is locked");
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let stored = repository
        .fetch(&RecordId("w-1".to_string()))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, before);
}

#[test]
fn second_approval_from_the_same_snapshot_is_stale() {
    let (service, _) = wish_service(vec![submitted_wish("w-1")]);
    let snapshot = service.get(&RecordId("w-1".to_string())).expect("stored");

    let approved = service
        .approve(&snapshot, &chief(), Some("ok".to_string()), at(3, 9))
        .expect("first approval wins");
    assert_eq!(approved.status(), RecordStatus::Genehmigt);
    assert!(approved.review.approval.is_some());
    assert_eq!(approved.review.approval_notes.as_deref(), Some("ok"));

    let err = service
        .approve(&snapshot, &chief(), Some("ok".to_string()), at(3, 10))
        .expect_err("stale snapshot");
    assert_eq!(
        err,
        LifecycleError::StateConflict(StateConflict::Stale {
            id: RecordId("w-1".to_string()),
            expected: RecordStatus::Eingereicht,
            found: RecordStatus::Genehmigt,
        })
    );
    assert_eq!(
        service.get(&RecordId("w-1".to_string())).expect("stored"),
        approved
    );
}

#[test]
fn decisions_apply_to_the_stored_record_not_the_approvers_copy() {
    let (service, repository) = wish_service(vec![submitted_wish("w-1")]);
    let mut copy = service.get(&RecordId("w-1".to_string())).expect("stored");
    copy.employee_id = EmployeeId("e-chief".to_string());
    copy.rules.clear();
    copy.notes = None;

    let approved = service
        .approve(&copy, &chief(), None, at(3, 9))
        .expect("revision still current");
    assert_eq!(approved.status(), RecordStatus::Genehmigt);
    assert_eq!(approved.employee_id, EmployeeId("e-owner".to_string()));
    assert_eq!(approved.effective_rules().len(), 1);
    assert_eq!(approved.notes.as_deref(), Some("Kinderbetreuung"));

    let stored = repository
        .fetch(&RecordId("w-1".to_string()))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, approved);
}

#[test]
fn decision_read_before_a_resubmission_is_stale() {
    let (service, _) = wish_service(vec![submitted_wish("w-1")]);
    let first_read = service.get(&RecordId("w-1".to_string())).expect("stored");

    let rejected = service
        .reject(&first_read, &chief(), Some("kein Freitag".to_string()), at(3, 9))
        .expect("rejected");
    let mut edited = rejected.clone();
    edited.rules[0].weekday = Weekday::Thu;
    let resubmitted = service
        .submit(edited, &owner(), at(4, 8))
        .expect("resubmitted");
    assert_eq!(resubmitted.status(), first_read.status());

    let err = service
        .approve(&first_read, &chief(), None, at(4, 9))
        .expect_err("read predates the resubmission");
    assert_eq!(
        err,
        LifecycleError::StateConflict(StateConflict::Stale {
            id: RecordId("w-1".to_string()),
            expected: RecordStatus::Eingereicht,
            found: RecordStatus::Eingereicht,
        })
    );

    let stored = service.get(&RecordId("w-1".to_string())).expect("stored");
    assert_eq!(stored, resubmitted);
    assert_eq!(stored.rules[0].weekday, Weekday::Thu);
    assert_eq!(stored.review.submitted_at, Some(at(4, 8)));

    let approved = service
        .approve(&resubmitted, &chief(), None, at(4, 10))
        .expect("current read may be decided");
    assert_eq!(approved.rules[0].weekday, Weekday::Thu);
}

#[test]
fn missing_records_are_reported_as_not_found() {
    let (service, _) = wish_service(Vec::new());
    let err = service
        .get(&RecordId("nope".to_string()))
        .expect_err("nothing stored");
    assert_eq!(err, LifecycleError::NotFound(RecordId("nope".to_string())));

    let err = service
        .approve(&submitted_wish("ghost"), &chief(), None, at(3, 9))
        .expect_err("never stored");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn planned_absences_share_the_same_lifecycle() {
    let repository = Arc::new(InMemoryReviewRepository::<PlannedAbsence>::default());
    let service = ReviewService::new(repository, ApprovalPolicy::default());

    let submitted = service
        .submit(
            planned_absence("p-1", date(2025, 7, 7), date(2025, 7, 11)),
            &owner(),
            at(2, 8),
        )
        .expect("submitted");
    let rejected = service
        .reject(&submitted, &chief(), Some("Urlaubssperre".to_string()), at(3, 9))
        .expect("rejected");
    assert_eq!(rejected.status(), RecordStatus::Abgelehnt);
    assert_eq!(rejected.review().approval_notes.as_deref(), Some("Urlaubssperre"));

    let resubmitted = service
        .submit(rejected, &owner(), at(4, 8))
        .expect("rejected records can be resubmitted");
    assert_eq!(resubmitted.status(), RecordStatus::Eingereicht);
    assert_eq!(resubmitted.review().approval, None);
}
