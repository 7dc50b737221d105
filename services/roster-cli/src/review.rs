use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shift_eligibility::approvals::{
    ApprovalPolicy, LongTermAbsence, LongTermWish, PlannedAbsence, Principal, ReviewRecord,
    ReviewService,
};
use shift_eligibility::config::AppConfig;
use shift_eligibility::error::AppError;

use crate::infra::{read_json, FileReviewRepository};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum RecordArg {
    /// Long-term shift wish
    Wish,
    /// Long-term absence
    Absence,
    /// Planned (monthly) absence
    Planned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ActionArg {
    Save,
    Submit,
    Approve,
    Reject,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// JSON file holding the stored records of this kind
    #[arg(long)]
    pub(crate) store: PathBuf,
    /// Kind of record in --record
    #[arg(long, value_enum)]
    pub(crate) kind: RecordArg,
    /// Lifecycle action to apply
    #[arg(long, value_enum)]
    pub(crate) action: ActionArg,
    /// JSON record: the edited draft for save/submit, or the record as read for approve/reject
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// JSON principal performing the action (employeeId, appRole, role)
    #[arg(long)]
    pub(crate) actor: PathBuf,
    /// Decision notes for approve/reject
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

pub(crate) fn run(args: ReviewArgs, config: &AppConfig) -> Result<(), AppError> {
    let actor: Principal = read_json(&args.actor)?;
    let policy = config.approval_policy();
    let now = Utc::now();

    let stored = match args.kind {
        RecordArg::Wish => apply::<LongTermWish>(&args, &actor, policy, now)?,
        RecordArg::Absence => apply::<LongTermAbsence>(&args, &actor, policy, now)?,
        RecordArg::Planned => apply::<PlannedAbsence>(&args, &actor, policy, now)?,
    };
    println!("{stored}");
    Ok(())
}

fn apply<T>(
    args: &ReviewArgs,
    actor: &Principal,
    policy: ApprovalPolicy,
    now: DateTime<Utc>,
) -> Result<String, AppError>
where
    T: ReviewRecord + Serialize + DeserializeOwned,
{
    let record: T = read_json(&args.record)?;
    let repository = Arc::new(FileReviewRepository::<T>::new(&args.store));
    let service = ReviewService::new(repository, policy);

    let stored = match args.action {
        ActionArg::Save => service.save(record, actor)?,
        ActionArg::Submit => service.submit(record, actor, now)?,
        ActionArg::Approve => service.approve(&record, actor, args.notes.clone(), now)?,
        ActionArg::Reject => service.reject(&record, actor, args.notes.clone(), now)?,
    };
    Ok(serde_json::to_string_pretty(&stored)?)
}
