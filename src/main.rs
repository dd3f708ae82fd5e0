//! squad-token - command-line tool for squad token decorations

use std::process::ExitCode;

use squad_token::cli;

fn main() -> ExitCode {
    cli::run()
}
