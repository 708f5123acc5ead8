//! dupfind - duplicate file finder
//!
//! Entry point for the dupfind CLI application.

use clap::error::ErrorKind;
use clap::Parser;
use dupfind::{
    cli::{Cli, OutputFormat},
    error::{ExitCode, StructuredError},
};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                // clap's rendering carries the usage line
                eprint!("{}", err.render());
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        },
    };
    let json_errors = cli.output == OutputFormat::Json;

    match dupfind::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
