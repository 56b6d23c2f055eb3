//! # sbsa
//!
//! Command-line front end for SBSA addressing and wave field sampling.
//!
//! ```bash
//! sbsa --bounds 4,5,6,7 encode 1 2 3 4        # 549
//! sbsa --bounds 4,5,6,7 decode 549            # 1 2 3 4
//! sbsa --step 0.5 locate 12.3 4.0 0.5 1.0
//! sbsa sample 549 --time 0.25
//! sbsa --json frame --start 0 --count 1024 --time 1.5
//! ```
//!
//! Exit status is 0 on success, 1 when an addressing or sampling
//! precondition fails, and 2 for usage and configuration errors.

mod args;
mod commands;
mod error;

use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match commands::run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
