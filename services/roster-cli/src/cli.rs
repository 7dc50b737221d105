use crate::attendance::{self, AttendanceArgs};
use crate::check::{self, CheckArgs};
use crate::review::{self, ReviewArgs};
use clap::{Parser, Subcommand};
use shift_eligibility::config::AppConfig;
use shift_eligibility::error::AppError;
use shift_eligibility::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "shift-eligibility",
    about = "Check duty eligibility, attendance and record reviews against roster snapshots",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explain whether an employee can be placed on a workplace on a date
    Check(CheckArgs),
    /// Show who is on duty, present or absent today and tomorrow
    Attendance(AttendanceArgs),
    /// Save, submit, approve or reject a wish or absence record
    Review(ReviewArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Check(args) => check::run(args, &config),
        Command::Attendance(args) => attendance::run(args, &config),
        Command::Review(args) => review::run(args, &config),
    }
}
