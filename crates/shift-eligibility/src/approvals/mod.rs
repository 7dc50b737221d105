//! Review lifecycle for long-term wishes and absences.
//!
//! Records move `Entwurf -> Eingereicht -> Genehmigt | Abgelehnt`; a rejected
//! record can be edited and resubmitted like a draft. Transitions are pure
//! functions in [`transitions`]; [`ReviewService`] persists them through a
//! compare-and-set on the stored [`Revision`].

pub mod policy;
pub mod records;
pub mod repository;
pub mod service;
pub mod status;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use policy::{
    authorize_employee_update, can_view_absences_of, is_approver, AppRole, ApprovalPolicy,
    AuthorizationError, Principal,
};
pub use records::{
    Absence, LongTermAbsence, LongTermWish, PlannedAbsence, RecordId, RecordKind, ReviewRecord,
    ServiceSelector, Strength, WishKind, WishRule,
};
pub use repository::{InMemoryReviewRepository, RepositoryError, ReviewRepository};
pub use service::{available_actions, ReviewService};
pub use status::{ApprovalStamp, LifecycleAction, RecordStatus, ReviewState, Revision};
pub use transitions::{ErrorKind, LifecycleError, StateConflict};
