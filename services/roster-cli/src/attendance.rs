use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use shift_eligibility::config::AppConfig;
use shift_eligibility::error::AppError;
use shift_eligibility::scheduling::{AttendanceBoard, AttendanceSnapshot, AttendanceStatus};
use tracing::info;

use crate::infra::RosterSnapshot;

#[derive(Args, Debug)]
pub(crate) struct AttendanceArgs {
    /// JSON roster snapshot (employees, absences, roster shifts)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also write today's attendance to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Print the board as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run(args: AttendanceArgs, config: &AppConfig) -> Result<(), AppError> {
    let AttendanceArgs {
        snapshot,
        today,
        csv,
        json,
    } = args;

    let standby_key = config.scheduling.standby_service_key.as_str();
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let snapshot = RosterSnapshot::load(&snapshot, standby_key)?;
    let inputs = snapshot.inputs(standby_key);
    let board = AttendanceBoard::for_today(today, &snapshot.employees, &inputs);

    if let Some(path) = csv {
        let writer = BufWriter::new(File::create(&path)?);
        board.today.write_csv(writer)?;
        info!(path = %path.display(), rows = board.today.entries.len(), "attendance exported");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        render_day("Today", &board.today);
        if let Some(tomorrow) = &board.tomorrow {
            render_day("Tomorrow", tomorrow);
        }
    }
    Ok(())
}

fn render_day(title: &str, day: &AttendanceSnapshot) {
    let counts = day.counts();
    println!(
        "{title} ({}): {} on duty | {} present | {} absent",
        day.date, counts.on_duty, counts.present, counts.absent
    );
    for entry in &day.entries {
        match &entry.status {
            AttendanceStatus::Absent(cause) => println!(
                "  - {} [{}] {}",
                entry.display_name,
                entry.status.label(),
                cause.summary()
            ),
            AttendanceStatus::OnDuty | AttendanceStatus::Present => {
                println!("  - {} [{}]", entry.display_name, entry.status.label())
            }
        }
    }
}
