//! Absent / available verdicts combining approved long-term leave, planned
//! leave and the employee's own inactive window.

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Employee, EmployeeId, RosterShift, DEFAULT_STANDBY_SERVICE_KEY};
use crate::approvals::{LongTermAbsence, PlannedAbsence, RecordId, RecordStatus};

/// Collections an availability or assignment check reads from.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityInputs<'a> {
    pub planned_absences: &'a [PlannedAbsence],
    pub long_term_absences: &'a [LongTermAbsence],
    pub roster_shifts: &'a [RosterShift],
    pub standby_key: &'a str,
}

impl<'a> AvailabilityInputs<'a> {
    pub fn new(
        planned_absences: &'a [PlannedAbsence],
        long_term_absences: &'a [LongTermAbsence],
        roster_shifts: &'a [RosterShift],
    ) -> Self {
        Self {
            planned_absences,
            long_term_absences,
            roster_shifts,
            standby_key: DEFAULT_STANDBY_SERVICE_KEY,
        }
    }

    pub fn with_standby_key(mut self, standby_key: &'a str) -> Self {
        self.standby_key = standby_key;
        self
    }

    pub fn availability_of(&self, employee: &Employee, date: NaiveDate) -> Availability {
        resolve_availability(
            employee,
            date,
            self.planned_absences,
            self.long_term_absences,
        )
    }

    pub fn on_duty(&self, employee_id: &EmployeeId, date: NaiveDate) -> bool {
        is_on_duty_excluding(employee_id, date, self.roster_shifts, self.standby_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum AbsenceCause {
    LongTermAbsence {
        absence_id: RecordId,
        reason: String,
    },
    PlannedAbsence {
        absence_id: RecordId,
        reason: String,
        status: RecordStatus,
    },
    Inactive {
        reason: Option<String>,
    },
}

impl AbsenceCause {
    pub fn summary(&self) -> String {
        match self {
            Self::LongTermAbsence { reason, .. } if reason.is_empty() => {
                "long-term absence".to_string()
            }
            Self::LongTermAbsence { reason, .. } => format!("long-term absence: {reason}"),
            Self::PlannedAbsence { reason, status, .. } if reason.is_empty() => {
                format!("planned absence ({})", status.label())
            }
            Self::PlannedAbsence { reason, status, .. } => {
                format!("planned absence ({}): {reason}", status.label())
            }
            Self::Inactive { reason: Some(reason) } => format!("inactive: {reason}"),
            Self::Inactive { reason: None } => "inactive".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Absent(AbsenceCause),
}

impl Availability {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent(_))
    }

    pub fn cause(&self) -> Option<&AbsenceCause> {
        match self {
            Self::Available => None,
            Self::Absent(cause) => Some(cause),
        }
    }
}

/// Resolve availability in fixed order: approved long-term absence, then any
/// non-rejected planned absence, then the employee's inactive window.
pub fn resolve_availability(
    employee: &Employee,
    date: NaiveDate,
    planned_absences: &[PlannedAbsence],
    long_term_absences: &[LongTermAbsence],
) -> Availability {
    if let Some(long_term) = long_term_absences
        .iter()
        .find(|absence| absence.blocks(&employee.id, date))
    {
        return Availability::Absent(AbsenceCause::LongTermAbsence {
            absence_id: long_term.absence.id.clone(),
            reason: long_term.absence.reason.clone(),
        });
    }

    if let Some(planned) = planned_absences
        .iter()
        .find(|absence| absence.blocks(&employee.id, date))
    {
        return Availability::Absent(AbsenceCause::PlannedAbsence {
            absence_id: planned.absence.id.clone(),
            reason: planned.absence.reason.clone(),
            status: planned.absence.review.status,
        });
    }

    if inactive_on(employee, date) {
        return Availability::Absent(AbsenceCause::Inactive {
            reason: employee.inactive_reason.clone(),
        });
    }

    Availability::Available
}

pub fn is_absent(
    employee: &Employee,
    date: NaiveDate,
    planned_absences: &[PlannedAbsence],
    long_term_absences: &[LongTermAbsence],
) -> bool {
    resolve_availability(employee, date, planned_absences, long_term_absences).is_absent()
}

/// A window with only one bound stays active from that bound onward (or up to it).
fn inactive_on(employee: &Employee, date: NaiveDate) -> bool {
    if !employee.has_inactive_window() {
        return false;
    }
    if employee.inactive_from.is_some_and(|from| from > date) {
        return false;
    }
    if employee.inactive_until.is_some_and(|until| until < date) {
        return false;
    }
    true
}

/// Whether the employee already holds a roster duty on the date. Standby duty
/// is not counted.
pub fn is_on_duty(employee_id: &EmployeeId, date: NaiveDate, roster_shifts: &[RosterShift]) -> bool {
    is_on_duty_excluding(employee_id, date, roster_shifts, DEFAULT_STANDBY_SERVICE_KEY)
}

pub fn is_on_duty_excluding(
    employee_id: &EmployeeId,
    date: NaiveDate,
    roster_shifts: &[RosterShift],
    standby_key: &str,
) -> bool {
    roster_shifts.iter().any(|shift| {
        &shift.employee_id == employee_id
            && shift.date == date
            && !shift.service_type.is_standby(standby_key)
    })
}
