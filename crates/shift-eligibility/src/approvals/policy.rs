use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scheduling::roles::fold_label;
use crate::scheduling::{normalize_role, CanonicalRole, Employee, EmployeeId};

/// Application-level role of a signed-in user, independent of the clinical role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppRole {
    Admin,
    TechAdmin,
    #[default]
    User,
}

impl AppRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::TechAdmin => "TechAdmin",
            Self::User => "User",
        }
    }

    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Admin | Self::TechAdmin)
    }
}

/// The user acting on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub app_role: AppRole,
    #[serde(default)]
    pub role: Option<String>,
}

impl Principal {
    pub fn new(employee_id: impl Into<String>, app_role: AppRole, role: Option<&str>) -> Self {
        Self {
            employee_id: EmployeeId(employee_id.into()),
            app_role,
            role: role.map(str::to_string),
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.app_role.is_administrator()
    }
}

/// Single source of truth for who may decide on submitted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPolicy {
    approver_roles: BTreeSet<CanonicalRole>,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            approver_roles: [CanonicalRole::Primararzt, CanonicalRole::ErsterOberarzt]
                .into_iter()
                .collect(),
        }
    }
}

impl ApprovalPolicy {
    /// Build the approver class from free-text role labels. Labels outside
    /// the known vocabulary are compared after folding.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let approver_roles = labels
            .into_iter()
            .filter(|label| !label.as_ref().trim().is_empty())
            .map(|label| approver_key(label.as_ref()))
            .collect();
        Self { approver_roles }
    }

    pub fn approver_roles(&self) -> impl Iterator<Item = &CanonicalRole> {
        self.approver_roles.iter()
    }

    pub fn is_approver(&self, principal: &Principal) -> bool {
        if principal.is_administrator() {
            return true;
        }
        principal
            .role
            .as_deref()
            .map(|role| self.approver_roles.contains(&approver_key(role)))
            .unwrap_or(false)
    }
}

fn approver_key(label: &str) -> CanonicalRole {
    match normalize_role(label) {
        CanonicalRole::Other(raw) => CanonicalRole::Other(fold_label(&raw)),
        known => known,
    }
}

/// Approver check against the built-in approver class.
pub fn is_approver(principal: &Principal) -> bool {
    ApprovalPolicy::default().is_approver(principal)
}

/// Absence calendars: own entries always, approvers everything, everyone else
/// only the role groups listed in their visibility preferences.
pub fn can_view_absences_of(
    viewer: &Principal,
    viewer_employee: Option<&Employee>,
    subject: &Employee,
    policy: &ApprovalPolicy,
) -> bool {
    if viewer.employee_id == subject.id || policy.is_approver(viewer) {
        return true;
    }
    let Some(viewer_employee) = viewer_employee else {
        return false;
    };
    let visible = &viewer_employee
        .shift_preferences
        .vacation_visibility_role_groups;
    subject
        .role_groups()
        .iter()
        .any(|group| visible.contains(group))
}

/// Staff may edit their own profile; staffing-relevant fields stay with administrators.
pub fn authorize_employee_update(
    actor: &Principal,
    before: &Employee,
    after: &Employee,
) -> Result<(), AuthorizationError> {
    if actor.is_administrator() {
        return Ok(());
    }
    if actor.employee_id != before.id {
        return Err(AuthorizationError::NotOwner {
            actor: actor.employee_id.clone(),
            owner: before.id.clone(),
        });
    }
    let guarded = [
        ("id", before.id != after.id),
        ("role", before.role != after.role),
        ("competencies", before.competencies != after.competencies),
        ("takesShifts", before.takes_shifts != after.takes_shifts),
    ];
    match guarded.into_iter().find(|(_, changed)| *changed) {
        Some((field, _)) => Err(AuthorizationError::AdministratorRequired(field)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("{actor} does not own this record (owner {owner})")]
    NotOwner { actor: EmployeeId, owner: EmployeeId },
    #[error("{0} is not allowed to approve or reject records")]
    NotApprover(EmployeeId),
    #[error("changing {0} requires an administrator")]
    AdministratorRequired(&'static str),
}
