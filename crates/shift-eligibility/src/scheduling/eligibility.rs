//! Whether an employee's role and competencies satisfy a workplace, and
//! which service lines they may be rostered on.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::availability::{AbsenceCause, Availability, AvailabilityInputs};
use super::domain::{
    Competency, CompetencyRequirement, Employee, RelationType, ServiceLine, WeekdaySetting,
    Workplace,
};
use super::recurrence::{schedule_for_date, ScheduleGap};
use super::roles::{fold_label, CapabilityKey};

/// Every `required` key must be present and, when `alternative` is non-empty,
/// at least one of its keys. An employee without a role fails any non-empty
/// requirement.
pub fn matches_role_requirements(
    employee: &Employee,
    required: &BTreeSet<CapabilityKey>,
    alternative: &BTreeSet<CapabilityKey>,
) -> bool {
    if required.is_empty() && alternative.is_empty() {
        return true;
    }

    let keys = employee.capability_keys();
    let required_met = required.iter().all(|key| keys.contains(key));
    let alternative_met =
        alternative.is_empty() || alternative.iter().any(|key| keys.contains(key));
    required_met && alternative_met
}

/// AND requirements must all match, and at least one OR requirement must match
/// when any exist. Requirements are matched on their denormalised code/name.
pub fn matches_competencies(employee: &Employee, requirements: &[CompetencyRequirement]) -> bool {
    matches_competencies_with_catalog(employee, requirements, &[])
}

/// As [`matches_competencies`], resolving requirements without a denormalised
/// code or name through `catalog`. Unresolvable requirements are unmet.
pub fn matches_competencies_with_catalog(
    employee: &Employee,
    requirements: &[CompetencyRequirement],
    catalog: &[Competency],
) -> bool {
    let held: BTreeSet<String> = employee
        .competencies
        .iter()
        .map(|entry| fold_label(entry))
        .filter(|entry| !entry.is_empty())
        .collect();

    let satisfied = |requirement: &CompetencyRequirement| {
        resolve_terms(requirement, catalog)
            .map(|terms| terms.iter().any(|term| held.contains(term)))
            .unwrap_or(false)
    };

    let mut and_requirements = requirements
        .iter()
        .filter(|requirement| requirement.relation_type == RelationType::And);
    let mut or_requirements = requirements
        .iter()
        .filter(|requirement| requirement.relation_type == RelationType::Or)
        .peekable();

    let and_met = and_requirements.all(|requirement| satisfied(requirement));
    let or_met = or_requirements.peek().is_none()
        || or_requirements.any(|requirement| satisfied(requirement));
    and_met && or_met
}

/// Folded identifiers a requirement can be matched on, or `None` when it cannot be resolved.
fn resolve_terms(
    requirement: &CompetencyRequirement,
    catalog: &[Competency],
) -> Option<Vec<String>> {
    let mut terms: Vec<String> = [
        requirement.competency_code.as_deref(),
        requirement.competency_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(fold_label)
    .filter(|term| !term.is_empty())
    .collect();

    if terms.is_empty() {
        let entry = catalog
            .iter()
            .find(|competency| competency.id == requirement.competency_id)?;
        terms.extend(entry.code.as_deref().map(fold_label));
        terms.push(fold_label(&entry.name));
        terms.retain(|term| !term.is_empty());
        if terms.is_empty() {
            return None;
        }
    }

    terms.push(fold_label(&requirement.competency_id.0));
    Some(terms)
}

pub fn is_eligible_for_room(employee: &Employee, workplace: &Workplace) -> bool {
    is_eligible_for_room_with_catalog(employee, workplace, &[])
}

pub fn is_eligible_for_room_with_catalog(
    employee: &Employee,
    workplace: &Workplace,
    catalog: &[Competency],
) -> bool {
    matches_role_requirements(
        employee,
        &workplace.required_roles,
        &workplace.alternative_roles,
    ) && matches_competencies_with_catalog(employee, &workplace.required_competencies, catalog)
}

/// Active lines an employee may pick as overrides: everything but the standby line.
pub fn selectable_override_lines<'a>(
    catalog: &'a [ServiceLine],
    standby_key: &str,
) -> Vec<&'a ServiceLine> {
    let mut lines: Vec<&ServiceLine> = catalog
        .iter()
        .filter(|line| line.is_active && !line.key.is_standby(standby_key))
        .collect();
    lines.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.key.cmp(&b.key)));
    lines
}

/// Service lines the employee can be rostered on. Explicit overrides replace
/// the role-group default; the standby line additionally needs `can_overduty`.
pub fn eligible_service_lines<'a>(
    employee: &Employee,
    catalog: &'a [ServiceLine],
    standby_key: &str,
) -> Vec<&'a ServiceLine> {
    if !employee.takes_shifts {
        return Vec::new();
    }

    let overrides = &employee.shift_preferences.service_type_overrides;
    let groups = employee.role_groups();

    let mut lines: Vec<&ServiceLine> = catalog
        .iter()
        .filter(|line| line.is_active)
        .filter(|line| {
            if line.key.is_standby(standby_key) {
                return employee.can_overduty
                    && line.role_group.map_or(true, |group| groups.contains(&group));
            }
            if overrides.is_empty() {
                line.role_group.is_some_and(|group| groups.contains(&group))
            } else {
                overrides.contains(&line.key)
            }
        })
        .collect();
    lines.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.key.cmp(&b.key)));
    lines
}

/// Reason an employee cannot be placed on a workplace on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlockReason {
    NotEmployed,
    OptedOut,
    NoSchedule,
    WorkplaceClosed { closed_reason: Option<String> },
    NotDeployable,
    IneligibleRole,
    MissingCompetencies,
    Absent { cause: AbsenceCause },
}

impl BlockReason {
    pub fn summary(&self) -> String {
        match self {
            Self::NotEmployed => "outside employment period".to_string(),
            Self::OptedOut => "does not take shifts".to_string(),
            Self::NoSchedule => "workplace has no schedule on this date".to_string(),
            Self::WorkplaceClosed {
                closed_reason: Some(reason),
            } => format!("workplace closed: {reason}"),
            Self::WorkplaceClosed { closed_reason: None } => "workplace closed".to_string(),
            Self::NotDeployable => "workplace not among deployment rooms".to_string(),
            Self::IneligibleRole => "role does not meet workplace requirements".to_string(),
            Self::MissingCompetencies => "missing required competencies".to_string(),
            Self::Absent { cause } => cause.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentVerdict<'a> {
    Assignable(&'a WeekdaySetting),
    Blocked(Vec<BlockReason>),
}

impl AssignmentVerdict<'_> {
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Assignable(_))
    }

    pub fn reasons(&self) -> &[BlockReason] {
        match self {
            Self::Assignable(_) => &[],
            Self::Blocked(reasons) => reasons,
        }
    }
}

/// Full check for placing an employee on a workplace, collecting every reason
/// that blocks the placement.
pub fn assignment_verdict<'a>(
    employee: &Employee,
    workplace: &'a Workplace,
    date: NaiveDate,
    catalog: &[Competency],
    inputs: &AvailabilityInputs<'_>,
) -> AssignmentVerdict<'a> {
    let mut reasons = Vec::new();

    if !employee.is_employed_on(date) {
        reasons.push(BlockReason::NotEmployed);
    }
    if !employee.takes_shifts {
        reasons.push(BlockReason::OptedOut);
    }

    let setting = match schedule_for_date(workplace, date) {
        Ok(setting) => Some(setting),
        Err(ScheduleGap::NoSchedule) => {
            reasons.push(BlockReason::NoSchedule);
            None
        }
        Err(ScheduleGap::Closed { reason }) => {
            reasons.push(BlockReason::WorkplaceClosed {
                closed_reason: reason,
            });
            None
        }
    };

    if !employee.shift_preferences.allows_room(&workplace.id) {
        reasons.push(BlockReason::NotDeployable);
    }
    if !matches_role_requirements(
        employee,
        &workplace.required_roles,
        &workplace.alternative_roles,
    ) {
        reasons.push(BlockReason::IneligibleRole);
    }
    if !matches_competencies_with_catalog(employee, &workplace.required_competencies, catalog) {
        reasons.push(BlockReason::MissingCompetencies);
    }
    if let Availability::Absent(cause) = inputs.availability_of(employee, date) {
        reasons.push(BlockReason::Absent { cause });
    }

    match setting {
        Some(setting) if reasons.is_empty() => AssignmentVerdict::Assignable(setting),
        _ => AssignmentVerdict::Blocked(reasons),
    }
}
