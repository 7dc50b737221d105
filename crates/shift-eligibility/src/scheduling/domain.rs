use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::roles::{normalize_role, role_capability_keys, role_groups, CanonicalRole};
use super::roles::{CapabilityKey, RoleGroup};
use crate::validation::{ensure_ordered, ensure_present, ValidationError};

/// Service-line key of the standby line when configuration does not name one.
pub const DEFAULT_STANDBY_SERVICE_KEY: &str = "overduty";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkplaceId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetencyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceLineKey(pub String);

impl ServiceLineKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_standby(&self, standby_key: &str) -> bool {
        self.0.trim().eq_ignore_ascii_case(standby_key.trim())
    }
}

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_id!(EmployeeId, WorkplaceId, CompetencyId, ServiceLineKey);

/// Staff member as supplied by the administration screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub competencies: Vec<String>,
    #[serde(default)]
    pub diplomas: Vec<String>,
    #[serde(default = "default_takes_shifts")]
    pub takes_shifts: bool,
    #[serde(default)]
    pub can_overduty: bool,
    #[serde(default)]
    pub inactive_from: Option<NaiveDate>,
    #[serde(default)]
    pub inactive_until: Option<NaiveDate>,
    #[serde(default)]
    pub inactive_reason: Option<String>,
    #[serde(default)]
    pub employment_from: Option<NaiveDate>,
    #[serde(default)]
    pub employment_until: Option<NaiveDate>,
    #[serde(default)]
    pub shift_preferences: ShiftPreferences,
}

fn default_takes_shifts() -> bool {
    true
}

impl Employee {
    pub fn new(id: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            id: EmployeeId(id.into()),
            display_name: String::new(),
            role: role.map(str::to_string),
            competencies: Vec::new(),
            diplomas: Vec::new(),
            takes_shifts: true,
            can_overduty: false,
            inactive_from: None,
            inactive_until: None,
            inactive_reason: None,
            employment_from: None,
            employment_until: None,
            shift_preferences: ShiftPreferences::default(),
        }
    }

    pub fn canonical_role(&self) -> Option<CanonicalRole> {
        self.role.as_deref().map(normalize_role)
    }

    pub fn capability_keys(&self) -> BTreeSet<CapabilityKey> {
        self.role
            .as_deref()
            .map(role_capability_keys)
            .unwrap_or_default()
    }

    pub fn role_groups(&self) -> BTreeSet<RoleGroup> {
        self.role.as_deref().map(role_groups).unwrap_or_default()
    }

    pub fn has_inactive_window(&self) -> bool {
        self.inactive_from.is_some() || self.inactive_until.is_some()
    }

    /// Inclusive bounded-employment check; open bounds never exclude.
    pub fn is_employed_on(&self, date: NaiveDate) -> bool {
        let started = self.employment_from.map_or(true, |from| from <= date);
        let not_ended = self.employment_until.map_or(true, |until| date <= until);
        started && not_ended
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("employee.id", &self.id.0)?;
        if let (Some(from), Some(until)) = (self.inactive_from, self.inactive_until) {
            ensure_ordered("inactiveFrom", from, until)?;
        }
        if let (Some(from), Some(until)) = (self.employment_from, self.employment_until) {
            ensure_ordered("employmentFrom", from, until)?;
        }
        Ok(())
    }
}

/// Typed replacement for the free-form preference bag stored with each employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPreferences {
    #[serde(default)]
    pub deployment_room_ids: Vec<WorkplaceId>,
    #[serde(default)]
    pub service_type_overrides: BTreeSet<ServiceLineKey>,
    #[serde(default)]
    pub vacation_visibility_role_groups: BTreeSet<RoleGroup>,
}

impl ShiftPreferences {
    pub fn validate(
        &self,
        catalog: &[ServiceLine],
        standby_key: &str,
    ) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.deployment_room_ids.len());
        for room in &self.deployment_room_ids {
            ensure_present("deploymentRoomIds", &room.0)?;
            if !seen.insert(room) {
                return Err(ValidationError::DuplicateDeploymentRoom(room.0.clone()));
            }
        }

        for key in &self.service_type_overrides {
            if key.is_standby(standby_key) {
                return Err(ValidationError::StandbyOverride(key.0.clone()));
            }
            if !catalog.iter().any(|line| &line.key == key) {
                return Err(ValidationError::UnknownServiceLine(key.0.clone()));
            }
        }
        Ok(())
    }

    pub fn allows_room(&self, room: &WorkplaceId) -> bool {
        self.deployment_room_ids.is_empty() || self.deployment_room_ids.contains(room)
    }
}

/// Room or workplace with its opening pattern and staffing requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workplace {
    pub id: WorkplaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weekday_settings: Vec<WeekdaySetting>,
    #[serde(default)]
    pub required_competencies: Vec<CompetencyRequirement>,
    #[serde(default)]
    pub required_roles: BTreeSet<CapabilityKey>,
    #[serde(default)]
    pub alternative_roles: BTreeSet<CapabilityKey>,
}

impl Workplace {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("workplace.id", &self.id.0)?;
        for setting in &self.weekday_settings {
            if !(1..=7).contains(&setting.weekday) {
                return Err(ValidationError::InvalidWeekday(setting.weekday));
            }
        }
        for requirement in &self.required_competencies {
            ensure_present("requiredCompetencies.competencyId", &requirement.competency_id.0)?;
        }
        Ok(())
    }
}

/// ISO weekday (Monday = 1) opening rule for a workplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySetting {
    pub weekday: u8,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub time_from: Option<String>,
    #[serde(default)]
    pub time_to: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub closed_reason: Option<String>,
}

impl WeekdaySetting {
    pub fn open(weekday: u8, recurrence: Option<Recurrence>) -> Self {
        Self {
            weekday,
            recurrence,
            time_from: None,
            time_to: None,
            is_closed: false,
            closed_reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Weekly,
    MonthlyFirstThird,
    MonthlyOnce,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

/// Competency a workplace asks for. Code and name are denormalised copies so
/// matching can run without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyRequirement {
    pub competency_id: CompetencyId,
    pub relation_type: RelationType,
    #[serde(default)]
    pub competency_code: Option<String>,
    #[serde(default)]
    pub competency_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    pub id: CompetencyId,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
}

/// Duty category such as delivery room or gynecology ward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub key: ServiceLineKey,
    pub label: String,
    #[serde(default)]
    pub role_group: Option<RoleGroup>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A duty already placed on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterShift {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub service_type: ServiceLineKey,
    #[serde(default)]
    pub workplace_id: Option<WorkplaceId>,
}
