mod cli;
mod commands;
mod report;

use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = TermLogger::init(
        cli.global.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Logging disabled: {err}");
    }

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::report_error(&err);
            ExitCode::FAILURE
        }
    }
}
