//! cryptocli - Tokenization Vault CLI

#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use cryptocli::{check_parameter_prefixes, output, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = check_parameter_prefixes(&args) {
        output::print_error(&e);
        return e.exit_code();
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cli.run().await {
        Ok(report) => {
            report.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::print_error(&e);
            e.exit_code()
        }
    }
}
