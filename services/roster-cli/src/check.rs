use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use shift_eligibility::config::AppConfig;
use shift_eligibility::error::AppError;
use shift_eligibility::scheduling::{
    assignment_verdict, eligible_service_lines, AssignmentVerdict, BlockReason, CanonicalRole,
    EmployeeId, ServiceLineKey, WorkplaceId,
};
use tracing::debug;

use crate::infra::RosterSnapshot;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON roster snapshot (employees, workplaces, absences, roster shifts)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Employee id to place
    #[arg(long)]
    pub(crate) employee: String,
    /// Workplace id to place the employee on
    #[arg(long)]
    pub(crate) workplace: String,
    /// Date of the duty (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: NaiveDate,
    /// Print the verdict as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckReport {
    pub(crate) employee_id: EmployeeId,
    pub(crate) workplace_id: WorkplaceId,
    pub(crate) date: NaiveDate,
    pub(crate) role: Option<CanonicalRole>,
    pub(crate) assignable: bool,
    pub(crate) time_from: Option<String>,
    pub(crate) time_to: Option<String>,
    pub(crate) reasons: Vec<BlockReason>,
    pub(crate) service_lines: Vec<ServiceLineKey>,
}

pub(crate) fn build_report(
    snapshot: &RosterSnapshot,
    employee_id: &str,
    workplace_id: &str,
    date: NaiveDate,
    standby_key: &str,
) -> Result<CheckReport, AppError> {
    let employee = snapshot.employee(employee_id)?;
    let workplace = snapshot.workplace(workplace_id)?;
    let inputs = snapshot.inputs(standby_key);

    let verdict = assignment_verdict(employee, workplace, date, &snapshot.competencies, &inputs);
    let (time_from, time_to) = match &verdict {
        AssignmentVerdict::Assignable(setting) => {
            (setting.time_from.clone(), setting.time_to.clone())
        }
        AssignmentVerdict::Blocked(_) => (None, None),
    };

    Ok(CheckReport {
        employee_id: employee.id.clone(),
        workplace_id: workplace.id.clone(),
        date,
        role: employee.canonical_role(),
        assignable: verdict.is_assignable(),
        time_from,
        time_to,
        reasons: verdict.reasons().to_vec(),
        service_lines: eligible_service_lines(employee, &snapshot.service_lines, standby_key)
            .into_iter()
            .map(|line| line.key.clone())
            .collect(),
    })
}

pub(crate) fn run(args: CheckArgs, config: &AppConfig) -> Result<(), AppError> {
    let standby_key = config.scheduling.standby_service_key.as_str();
    let snapshot = RosterSnapshot::load(&args.snapshot, standby_key)?;
    let report = build_report(
        &snapshot,
        &args.employee,
        &args.workplace,
        args.date,
        standby_key,
    )?;
    debug!(
        employee = %report.employee_id,
        workplace = %report.workplace_id,
        assignable = report.assignable,
        "assignment checked"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(&report);
    }
    Ok(())
}

fn render(report: &CheckReport) {
    let role = report
        .role
        .as_ref()
        .map(|role| role.label().to_string())
        .unwrap_or_else(|| "no role".to_string());
    println!(
        "{} ({role}) on {} at {}",
        report.employee_id, report.date, report.workplace_id
    );
    if report.assignable {
        match (&report.time_from, &report.time_to) {
            (Some(from), Some(to)) => println!("- assignable, {from}-{to}"),
            _ => println!("- assignable"),
        }
    } else {
        println!("- blocked:");
        for reason in &report.reasons {
            println!("  - {}", reason.summary());
        }
    }
    if report.service_lines.is_empty() {
        println!("- no eligible service lines");
    } else {
        let lines: Vec<&str> = report.service_lines.iter().map(ServiceLineKey::as_str).collect();
        println!("- service lines: {}", lines.join(", "));
    }
}
