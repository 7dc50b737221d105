mod attendance;
mod check;
mod cli;
mod infra;
mod review;

use shift_eligibility::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
