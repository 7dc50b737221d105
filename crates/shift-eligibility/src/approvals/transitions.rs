//! Lifecycle transitions as pure functions over record values.
//!
//! Each function either returns the next version of the record or an error;
//! the input is never touched. Persisting the result under a revision
//! compare-and-set is the caller's job (see [`super::ReviewService`]).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::policy::{ApprovalPolicy, AuthorizationError, Principal};
use super::records::{RecordId, ReviewRecord};
use super::repository::RepositoryError;
use super::status::{ApprovalStamp, LifecycleAction, RecordStatus, ReviewState};
use crate::validation::ValidationError;

/// Persist owner edits without changing status. A new record starts as `Entwurf`.
pub fn save<R: ReviewRecord>(
    current: Option<&R>,
    draft: R,
    actor: &Principal,
) -> Result<R, LifecycleError> {
    let mut next = prepare_owner_action(current, draft, actor, LifecycleAction::Save)?;
    let review = current.map(|record| record.review().clone()).unwrap_or_default();
    *next.review_mut() = review;
    Ok(next)
}

/// Create-or-update, then hand the record to an approver.
pub fn submit<R: ReviewRecord>(
    current: Option<&R>,
    draft: R,
    actor: &Principal,
    now: DateTime<Utc>,
) -> Result<R, LifecycleError> {
    let mut next = prepare_owner_action(current, draft, actor, LifecycleAction::Submit)?;
    *next.review_mut() = ReviewState::submitted(now);
    Ok(next)
}

pub fn approve<R: ReviewRecord>(
    current: &R,
    actor: &Principal,
    policy: &ApprovalPolicy,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<R, LifecycleError> {
    decide(current, actor, policy, LifecycleAction::Approve, notes, now)
}

/// Same precondition as [`approve`]. The decision stamp is recorded as well.
pub fn reject<R: ReviewRecord>(
    current: &R,
    actor: &Principal,
    policy: &ApprovalPolicy,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<R, LifecycleError> {
    decide(current, actor, policy, LifecycleAction::Reject, notes, now)
}

fn prepare_owner_action<R: ReviewRecord>(
    current: Option<&R>,
    draft: R,
    actor: &Principal,
    action: LifecycleAction,
) -> Result<R, LifecycleError> {
    draft.validate()?;
    ensure_owner(&draft, actor)?;
    if let Some(current) = current {
        ensure_owner(current, actor)?;
    }
    let from = current.map(|record| record.status()).unwrap_or_default();
    transition(from, action)?;
    Ok(draft)
}

fn decide<R: ReviewRecord>(
    current: &R,
    actor: &Principal,
    policy: &ApprovalPolicy,
    action: LifecycleAction,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<R, LifecycleError> {
    ensure_approver(actor, policy)?;
    let to = transition(current.status(), action)?;

    let mut next = current.clone();
    let review = next.review_mut();
    review.status = to;
    review.approval = Some(ApprovalStamp {
        approved_at: now,
        approved_by_id: actor.employee_id.clone(),
    });
    review.approval_notes = notes
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    Ok(next)
}

pub(crate) fn ensure_approver(
    actor: &Principal,
    policy: &ApprovalPolicy,
) -> Result<(), AuthorizationError> {
    if policy.is_approver(actor) {
        Ok(())
    } else {
        Err(AuthorizationError::NotApprover(actor.employee_id.clone()))
    }
}

fn ensure_owner<R: ReviewRecord>(record: &R, actor: &Principal) -> Result<(), AuthorizationError> {
    if record.owner_id() == &actor.employee_id {
        Ok(())
    } else {
        Err(AuthorizationError::NotOwner {
            actor: actor.employee_id.clone(),
            owner: record.owner_id().clone(),
        })
    }
}

fn transition(from: RecordStatus, action: LifecycleAction) -> Result<RecordStatus, StateConflict> {
    from.next(action)
        .ok_or(StateConflict::InvalidTransition { from, action })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateConflict {
    #[error("cannot {} a record that is {}", .action.label(), .from.label())]
    InvalidTransition {
        from: RecordStatus,
        action: LifecycleAction,
    },
    #[error(
        "record {id} changed since it was read: expected {}, found {}",
        .expected.label(),
        .found.label()
    )]
    Stale {
        id: RecordId,
        expected: RecordStatus,
        found: RecordStatus,
    },
    #[error("record {0} already exists")]
    Duplicate(RecordId),
}

/// Coarse error class callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    StateConflict,
    NotFound,
    Unavailable,
}

impl ErrorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::StateConflict => "state_conflict",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    StateConflict(#[from] StateConflict),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl LifecycleError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::StateConflict(_) => ErrorKind::StateConflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<RepositoryError> for LifecycleError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Stale {
                id,
                expected,
                found,
            } => Self::StateConflict(StateConflict::Stale {
                id,
                expected: expected.status,
                found: found.status,
            }),
            RepositoryError::Conflict(id) => Self::StateConflict(StateConflict::Duplicate(id)),
            RepositoryError::NotFound(id) => Self::NotFound(id),
            RepositoryError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}
