use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use super::availability::{AbsenceCause, Availability, AvailabilityInputs};
use super::domain::{Employee, EmployeeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttendanceStatus {
    OnDuty,
    Present,
    Absent(AbsenceCause),
}

impl AttendanceStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OnDuty => "on duty",
            Self::Present => "present",
            Self::Absent(_) => "absent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub employee_id: EmployeeId,
    pub display_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub on_duty: usize,
    pub present: usize,
    pub absent: usize,
}

/// Who is around on one date. Absence wins over a conflicting roster duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSnapshot {
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

impl AttendanceSnapshot {
    pub fn build(date: NaiveDate, employees: &[Employee], inputs: &AvailabilityInputs<'_>) -> Self {
        let mut entries: Vec<AttendanceEntry> = employees
            .iter()
            .filter(|employee| employee.is_employed_on(date))
            .map(|employee| {
                let status = match inputs.availability_of(employee, date) {
                    Availability::Absent(cause) => AttendanceStatus::Absent(cause),
                    Availability::Available if inputs.on_duty(&employee.id, date) => {
                        AttendanceStatus::OnDuty
                    }
                    Availability::Available => AttendanceStatus::Present,
                };
                AttendanceEntry {
                    employee_id: employee.id.clone(),
                    display_name: display_name(employee),
                    status,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        Self { date, entries }
    }

    pub fn counts(&self) -> AttendanceCounts {
        let mut counts = AttendanceCounts::default();
        for entry in &self.entries {
            match entry.status {
                AttendanceStatus::OnDuty => counts.on_duty += 1,
                AttendanceStatus::Present => counts.present += 1,
                AttendanceStatus::Absent(_) => counts.absent += 1,
            }
        }
        counts
    }

    pub fn absentees(&self) -> impl Iterator<Item = &AttendanceEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.status, AttendanceStatus::Absent(_)))
    }

    /// One row per employee: date, id, name, status, detail.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["date", "employee_id", "name", "status", "detail"])?;
        let date = self.date.format("%Y-%m-%d").to_string();
        for entry in &self.entries {
            let detail = match &entry.status {
                AttendanceStatus::Absent(cause) => cause.summary(),
                AttendanceStatus::OnDuty | AttendanceStatus::Present => String::new(),
            };
            csv_writer.write_record([
                date.as_str(),
                entry.employee_id.0.as_str(),
                entry.display_name.as_str(),
                entry.status.label(),
                detail.as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn display_name(employee: &Employee) -> String {
    if employee.display_name.trim().is_empty() {
        employee.id.0.clone()
    } else {
        employee.display_name.trim().to_string()
    }
}

/// Today/tomorrow pair shown on the dashboard. `today` comes from the caller;
/// `tomorrow` is absent only when `today` is the last representable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceBoard {
    pub today: AttendanceSnapshot,
    pub tomorrow: Option<AttendanceSnapshot>,
}

impl AttendanceBoard {
    pub fn for_today(
        today: NaiveDate,
        employees: &[Employee],
        inputs: &AvailabilityInputs<'_>,
    ) -> Self {
        Self {
            today: AttendanceSnapshot::build(today, employees, inputs),
            tomorrow: today
                .succ_opt()
                .map(|next| AttendanceSnapshot::build(next, employees, inputs)),
        }
    }
}
