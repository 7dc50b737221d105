use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};

use crate::approvals::{
    Absence, AppRole, ApprovalPolicy, InMemoryReviewRepository, LongTermWish, PlannedAbsence,
    Principal, RecordId, RecordStatus, ReviewService, ReviewState, ServiceSelector, Strength,
    WishKind, WishRule,
};
use crate::scheduling::{EmployeeId, ServiceLineKey};

pub(super) type WishService = ReviewService<LongTermWish, InMemoryReviewRepository<LongTermWish>>;

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Resident who owns the records under review.
pub(super) fn owner() -> Principal {
    Principal::new("e-owner", AppRole::User, Some("Assistenzärztin"))
}

pub(super) fn chief() -> Principal {
    Principal::new("e-chief", AppRole::User, Some("Primarärztin"))
}

pub(super) fn colleague() -> Principal {
    Principal::new("e-colleague", AppRole::User, Some("Oberarzt"))
}

pub(super) fn wish(id: &str, status: RecordStatus) -> LongTermWish {
    LongTermWish {
        id: RecordId(id.to_string()),
        employee_id: EmployeeId("e-owner".to_string()),
        rules: vec![WishRule {
            kind: WishKind::AlwaysOff,
            weekday: Weekday::Fri,
            service_type: ServiceSelector::Line(ServiceLineKey::new("kreisssaal")),
            strength: Strength::Hard,
        }],
        notes: Some("Kinderbetreuung".to_string()),
        review: ReviewState {
            status,
            ..ReviewState::default()
        },
    }
}

pub(super) fn submitted_wish(id: &str) -> LongTermWish {
    let mut record = wish(id, RecordStatus::Eingereicht);
    record.review = ReviewState::submitted(at(1, 8));
    record
}

pub(super) fn planned_absence(id: &str, start: NaiveDate, end: NaiveDate) -> PlannedAbsence {
    PlannedAbsence {
        absence: Absence {
            id: RecordId(id.to_string()),
            employee_id: EmployeeId("e-owner".to_string()),
            start_date: start,
            end_date: end,
            reason: "Urlaub".to_string(),
            review: ReviewState::draft(),
        },
        year: 2025,
        month: 7,
    }
}

pub(super) fn wish_service(
    records: Vec<LongTermWish>,
) -> (WishService, Arc<InMemoryReviewRepository<LongTermWish>>) {
    let repository = Arc::new(InMemoryReviewRepository::with_records(records));
    let service = ReviewService::new(repository.clone(), ApprovalPolicy::default());
    (service, repository)
}
