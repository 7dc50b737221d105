use chrono::{Datelike, NaiveDate};

use crate::approvals::{
    Absence, LongTermAbsence, PlannedAbsence, RecordId, RecordStatus, ReviewState,
};
use crate::scheduling::domain::{
    CompetencyId, CompetencyRequirement, Employee, EmployeeId, RelationType, RosterShift,
    ServiceLine, ServiceLineKey, WeekdaySetting, Workplace, WorkplaceId,
};
use crate::scheduling::roles::{CapabilityKey, RoleGroup};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn employee(id: &str, role: Option<&str>) -> Employee {
    let mut employee = Employee::new(id, role);
    employee.display_name = format!("Dr. {id}");
    employee
}

pub(super) fn with_competencies(mut employee: Employee, competencies: &[&str]) -> Employee {
    employee.competencies = competencies.iter().map(|entry| entry.to_string()).collect();
    employee
}

pub(super) fn requirement(
    id: &str,
    relation_type: RelationType,
    code: Option<&str>,
    name: Option<&str>,
) -> CompetencyRequirement {
    CompetencyRequirement {
        competency_id: CompetencyId(id.to_string()),
        relation_type,
        competency_code: code.map(str::to_string),
        competency_name: name.map(str::to_string),
    }
}

/// Delivery room open every weekday, attending physicians only.
pub(super) fn delivery_room() -> Workplace {
    Workplace {
        id: WorkplaceId("kreisssaal".to_string()),
        name: "Kreißsaal".to_string(),
        weekday_settings: (1..=5).map(|day| WeekdaySetting::open(day, None)).collect(),
        required_competencies: vec![requirement(
            "c-geb",
            RelationType::And,
            Some("GEB"),
            Some("Geburtshilfe"),
        )],
        required_roles: [CapabilityKey::Facharzt].into_iter().collect(),
        alternative_roles: Default::default(),
    }
}

pub(super) fn absence(
    id: &str,
    employee_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: RecordStatus,
) -> Absence {
    Absence {
        id: RecordId(id.to_string()),
        employee_id: EmployeeId(employee_id.to_string()),
        start_date: start,
        end_date: end,
        reason: "Urlaub".to_string(),
        review: ReviewState {
            status,
            ..ReviewState::default()
        },
    }
}

pub(super) fn long_term(
    id: &str,
    employee_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: RecordStatus,
) -> LongTermAbsence {
    LongTermAbsence {
        absence: absence(id, employee_id, start, end, status),
    }
}

pub(super) fn planned(
    id: &str,
    employee_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: RecordStatus,
) -> PlannedAbsence {
    PlannedAbsence {
        absence: absence(id, employee_id, start, end, status),
        year: start.year(),
        month: start.month(),
    }
}

pub(super) fn shift(employee_id: &str, on: NaiveDate, service: &str) -> RosterShift {
    RosterShift {
        employee_id: EmployeeId(employee_id.to_string()),
        date: on,
        service_type: ServiceLineKey::new(service),
        workplace_id: None,
    }
}

pub(super) fn service_line(
    key: &str,
    role_group: Option<RoleGroup>,
    sort_order: i32,
    is_active: bool,
) -> ServiceLine {
    ServiceLine {
        key: ServiceLineKey::new(key),
        label: key.to_uppercase(),
        role_group,
        sort_order,
        is_active,
    }
}

pub(super) fn service_catalog() -> Vec<ServiceLine> {
    vec![
        service_line("gyn", Some(RoleGroup::Physicians), 20, true),
        service_line("kreisssaal", Some(RoleGroup::Physicians), 10, true),
        service_line("rotation", Some(RoleGroup::Residents), 30, true),
        service_line("overduty", Some(RoleGroup::Physicians), 5, true),
        service_line("ambulanz", Some(RoleGroup::Physicians), 40, false),
    ]
}
