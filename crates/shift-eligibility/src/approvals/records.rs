use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::status::{RecordStatus, ReviewState, Revision};
use crate::scheduling::{EmployeeId, ServiceLineKey};
use crate::validation::{ensure_ordered, ensure_present, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    LongTermWish,
    LongTermAbsence,
    PlannedAbsence,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LongTermWish => "long-term wish",
            Self::LongTermAbsence => "long-term absence",
            Self::PlannedAbsence => "planned absence",
        }
    }
}

/// A record owned by one employee that moves through review.
pub trait ReviewRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> &RecordId;
    fn owner_id(&self) -> &EmployeeId;
    fn review(&self) -> &ReviewState;
    fn review_mut(&mut self) -> &mut ReviewState;
    fn validate(&self) -> Result<(), ValidationError>;

    fn status(&self) -> RecordStatus {
        self.review().status
    }

    fn revision(&self) -> Revision {
        Revision {
            status: self.status(),
            number: self.review().revision,
        }
    }
}

/// Inclusive date range an employee is away, shared by both absence kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(flatten)]
    pub review: ReviewState,
}

impl Absence {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn belongs_to(&self, employee_id: &EmployeeId) -> bool {
        &self.employee_id == employee_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("absence.id", &self.id.0)?;
        ensure_present("absence.employeeId", &self.employee_id.0)?;
        ensure_ordered("absence", self.start_date, self.end_date)
    }
}

/// Extended leave; counts toward availability only once approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongTermAbsence {
    pub absence: Absence,
}

impl LongTermAbsence {
    pub fn blocks(&self, employee_id: &EmployeeId, date: NaiveDate) -> bool {
        self.absence.belongs_to(employee_id)
            && self.absence.review.status == RecordStatus::Genehmigt
            && self.absence.covers(date)
    }
}

/// Short-term leave grouped by planning month. Blocks the slot in every
/// status except `Abgelehnt` so nobody is double-booked while it is reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedAbsence {
    #[serde(flatten)]
    pub absence: Absence,
    pub year: i32,
    pub month: u32,
}

impl PlannedAbsence {
    pub fn blocks(&self, employee_id: &EmployeeId, date: NaiveDate) -> bool {
        self.absence.belongs_to(employee_id)
            && self.absence.covers(date)
            && self.absence.review.status != RecordStatus::Abgelehnt
    }

    fn validate_period(&self) -> Result<(), ValidationError> {
        if !(1..=12).contains(&self.month) {
            return Err(ValidationError::InvalidMonth(self.month));
        }
        let start = (self.absence.start_date.year(), self.absence.start_date.month());
        let end = (self.absence.end_date.year(), self.absence.end_date.month());
        let period = (self.year, self.month);
        if period < start || period > end {
            return Err(ValidationError::PeriodMismatch {
                year: self.year,
                month: self.month,
                start: self.absence.start_date,
            });
        }
        Ok(())
    }
}

impl ReviewRecord for LongTermAbsence {
    const KIND: RecordKind = RecordKind::LongTermAbsence;

    fn id(&self) -> &RecordId {
        &self.absence.id
    }

    fn owner_id(&self) -> &EmployeeId {
        &self.absence.employee_id
    }

    fn review(&self) -> &ReviewState {
        &self.absence.review
    }

    fn review_mut(&mut self) -> &mut ReviewState {
        &mut self.absence.review
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.absence.validate()
    }
}

impl ReviewRecord for PlannedAbsence {
    const KIND: RecordKind = RecordKind::PlannedAbsence;

    fn id(&self) -> &RecordId {
        &self.absence.id
    }

    fn owner_id(&self) -> &EmployeeId {
        &self.absence.employee_id
    }

    fn review(&self) -> &ReviewState {
        &self.absence.review
    }

    fn review_mut(&mut self) -> &mut ReviewState {
        &mut self.absence.review
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.absence.validate()?;
        self.validate_period()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WishKind {
    AlwaysOff,
    PreferOn,
    AvoidOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    Soft,
    Hard,
}

/// Service line a wish rule targets; `any` covers every line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceSelector {
    Any,
    Line(ServiceLineKey),
}

impl ServiceSelector {
    pub fn matches(&self, service: &ServiceLineKey) -> bool {
        match self {
            Self::Any => true,
            Self::Line(key) => key == service,
        }
    }
}

impl From<String> for ServiceSelector {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("any") {
            Self::Any
        } else {
            Self::Line(ServiceLineKey(value))
        }
    }
}

impl From<ServiceSelector> for String {
    fn from(value: ServiceSelector) -> Self {
        match value {
            ServiceSelector::Any => "any".to_string(),
            ServiceSelector::Line(key) => key.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishRule {
    pub kind: WishKind,
    pub weekday: Weekday,
    pub service_type: ServiceSelector,
    pub strength: Strength,
}

impl WishRule {
    pub fn applies_to(&self, date: NaiveDate, service: &ServiceLineKey) -> bool {
        date.weekday() == self.weekday && self.service_type.matches(service)
    }
}

/// Standing weekly preferences of one employee. Rules are kept in the order
/// given; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermWish {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub rules: Vec<WishRule>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub review: ReviewState,
}

impl LongTermWish {
    /// Rules a roster builder should honour: none until the wish is approved.
    pub fn effective_rules(&self) -> &[WishRule] {
        match self.review.status {
            RecordStatus::Genehmigt => &self.rules,
            RecordStatus::Entwurf | RecordStatus::Eingereicht | RecordStatus::Abgelehnt => &[],
        }
    }

    /// Rules with repeats removed, first occurrence kept.
    pub fn deduplicated_rules(&self) -> Vec<WishRule> {
        let mut unique: Vec<WishRule> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !unique.contains(rule) {
                unique.push(rule.clone());
            }
        }
        unique
    }

    pub fn rules_for(&self, date: NaiveDate, service: &ServiceLineKey) -> Vec<&WishRule> {
        self.effective_rules()
            .iter()
            .filter(|rule| rule.applies_to(date, service))
            .collect()
    }
}

impl ReviewRecord for LongTermWish {
    const KIND: RecordKind = RecordKind::LongTermWish;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn owner_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    fn review(&self) -> &ReviewState {
        &self.review
    }

    fn review_mut(&mut self) -> &mut ReviewState {
        &mut self.review
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("wish.id", &self.id.0)?;
        ensure_present("wish.employeeId", &self.employee_id.0)?;
        for rule in &self.rules {
            if let ServiceSelector::Line(key) = &rule.service_type {
                ensure_present("wish.rules.serviceType", &key.0)?;
            }
        }
        Ok(())
    }
}
