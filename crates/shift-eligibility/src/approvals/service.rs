use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::policy::{ApprovalPolicy, Principal};
use super::records::{RecordId, ReviewRecord};
use super::repository::ReviewRepository;
use super::status::{LifecycleAction, RecordStatus};
use super::transitions::{self, LifecycleError, StateConflict};

/// Service composing the review repository, the approver policy and the
/// pure transitions. Every write goes through the repository's revision
/// compare-and-set, so of two racing transitions from the same read only one
/// is stored.
pub struct ReviewService<T, R> {
    repository: Arc<R>,
    policy: Arc<ApprovalPolicy>,
    _record: PhantomData<fn() -> T>,
}

impl<T, R> ReviewService<T, R>
where
    T: ReviewRecord,
    R: ReviewRepository<T> + 'static,
{
    pub fn new(repository: Arc<R>, policy: ApprovalPolicy) -> Self {
        Self {
            repository,
            policy: Arc::new(policy),
            _record: PhantomData,
        }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    pub fn get(&self, id: &RecordId) -> Result<T, LifecycleError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    /// Create or update the owner's draft.
    pub fn save(&self, draft: T, actor: &Principal) -> Result<T, LifecycleError> {
        let id = draft.id().clone();
        let current = self.repository.fetch(&id)?;
        let from = current.as_ref().map(|record| record.status()).unwrap_or_default();
        let outcome = transitions::save(current.as_ref(), draft, actor)
            .and_then(|next| self.commit(current.as_ref(), next));
        self.trace(&id, LifecycleAction::Save, from, actor, outcome)
    }

    /// Submit the owner's record, inserting it first when it is new.
    pub fn submit(
        &self,
        draft: T,
        actor: &Principal,
        now: DateTime<Utc>,
    ) -> Result<T, LifecycleError> {
        let id = draft.id().clone();
        let current = self.repository.fetch(&id)?;
        let from = current.as_ref().map(|record| record.status()).unwrap_or_default();
        let outcome = transitions::submit(current.as_ref(), draft, actor, now)
            .and_then(|next| self.commit(current.as_ref(), next));
        self.trace(&id, LifecycleAction::Submit, from, actor, outcome)
    }

    /// Approve the stored record, provided it is still the revision the
    /// approver saw in `seen`. Only the id and revision of `seen` are read;
    /// its content never reaches the store.
    pub fn approve(
        &self,
        seen: &T,
        actor: &Principal,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<T, LifecycleError> {
        let outcome = self.stored_as_seen(seen, actor).and_then(|stored| {
            transitions::approve(&stored, actor, &self.policy, notes, now)
                .and_then(|next| self.commit(Some(&stored), next))
        });
        self.trace(seen.id(), LifecycleAction::Approve, seen.status(), actor, outcome)
    }

    pub fn reject(
        &self,
        seen: &T,
        actor: &Principal,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<T, LifecycleError> {
        let outcome = self.stored_as_seen(seen, actor).and_then(|stored| {
            transitions::reject(&stored, actor, &self.policy, notes, now)
                .and_then(|next| self.commit(Some(&stored), next))
        });
        self.trace(seen.id(), LifecycleAction::Reject, seen.status(), actor, outcome)
    }

    fn stored_as_seen(&self, seen: &T, actor: &Principal) -> Result<T, LifecycleError> {
        transitions::ensure_approver(actor, &self.policy)?;
        let stored = self.get(seen.id())?;
        if stored.revision() != seen.revision() {
            return Err(StateConflict::Stale {
                id: seen.id().clone(),
                expected: seen.status(),
                found: stored.status(),
            }
            .into());
        }
        Ok(stored)
    }

    fn commit(&self, before: Option<&T>, mut next: T) -> Result<T, LifecycleError> {
        let stored = match before {
            None => {
                next.review_mut().revision = 1;
                self.repository.insert(next)?
            }
            Some(before) => {
                next.review_mut().revision = before.revision().number.wrapping_add(1);
                self.repository.replace_if_current(next, before.revision())?
            }
        };
        Ok(stored)
    }

    fn trace(
        &self,
        id: &RecordId,
        action: LifecycleAction,
        from: RecordStatus,
        actor: &Principal,
        outcome: Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        match &outcome {
            Ok(record) => info!(
                record = %id,
                kind = T::KIND.label(),
                action = action.label(),
                from = from.label(),
                to = record.status().label(),
                actor = %actor.employee_id,
                "review transition applied"
            ),
            Err(err) => debug!(
                record = %id,
                kind = T::KIND.label(),
                action = action.label(),
                from = from.label(),
                actor = %actor.employee_id,
                error_kind = err.kind().label(),
                error = %err,
                "review transition refused"
            ),
        }
        outcome
    }
}

impl<T, R> Clone for ReviewService<T, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            policy: Arc::clone(&self.policy),
            _record: PhantomData,
        }
    }
}

/// Actions a user may take on a record in `status`: owners edit and submit,
/// approvers decide.
pub fn available_actions(
    status: RecordStatus,
    is_owner: bool,
    is_approver: bool,
) -> Vec<LifecycleAction> {
    [
        LifecycleAction::Save,
        LifecycleAction::Submit,
        LifecycleAction::Approve,
        LifecycleAction::Reject,
    ]
    .into_iter()
    .filter(|action| status.permits(*action))
    .filter(|action| {
        if action.is_decision() {
            is_approver
        } else {
            is_owner
        }
    })
    .collect()
}
