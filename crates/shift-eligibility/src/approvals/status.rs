use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduling::EmployeeId;

/// Review status shared by wish and absence records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    Entwurf,
    Eingereicht,
    Genehmigt,
    Abgelehnt,
}

impl RecordStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entwurf => "Entwurf",
            Self::Eingereicht => "Eingereicht",
            Self::Genehmigt => "Genehmigt",
            Self::Abgelehnt => "Abgelehnt",
        }
    }

    /// Owner may still change the record.
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Entwurf | Self::Abgelehnt)
    }

    pub const fn permits(self, action: LifecycleAction) -> bool {
        self.next(action).is_some()
    }

    /// Transition table. `Save` keeps the status it was applied to.
    pub const fn next(self, action: LifecycleAction) -> Option<Self> {
        match (self, action) {
            (Self::Entwurf, LifecycleAction::Save) => Some(Self::Entwurf),
            (Self::Abgelehnt, LifecycleAction::Save) => Some(Self::Abgelehnt),
            (Self::Entwurf | Self::Abgelehnt, LifecycleAction::Submit) => Some(Self::Eingereicht),
            (Self::Eingereicht, LifecycleAction::Approve) => Some(Self::Genehmigt),
            (Self::Eingereicht, LifecycleAction::Reject) => Some(Self::Abgelehnt),
            (Self::Entwurf | Self::Abgelehnt, LifecycleAction::Approve | LifecycleAction::Reject)
            | (Self::Eingereicht, LifecycleAction::Save | LifecycleAction::Submit)
            | (Self::Genehmigt, _) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Save,
    Submit,
    Approve,
    Reject,
}

impl LifecycleAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    pub const fn is_decision(self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }
}

/// Who decided and when. Both halves exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStamp {
    pub approved_at: DateTime<Utc>,
    pub approved_by_id: EmployeeId,
}

/// Review bookkeeping embedded in every reviewable record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub approval: Option<ApprovalStamp>,
    #[serde(default)]
    pub approval_notes: Option<String>,
    /// Bumped by the review service on every stored write.
    #[serde(default)]
    pub revision: u64,
}

/// Where a stored record stands: its status and write counter. Two reads
/// with the same revision saw the same stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision {
    pub status: RecordStatus,
    pub number: u64,
}

impl ReviewState {
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn submitted(at: DateTime<Utc>) -> Self {
        Self {
            status: RecordStatus::Eingereicht,
            submitted_at: Some(at),
            approval: None,
            approval_notes: None,
            revision: 0,
        }
    }
}
