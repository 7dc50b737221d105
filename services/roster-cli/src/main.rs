use std::process::ExitCode;

use shift_eligibility_cli::run;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("application error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
