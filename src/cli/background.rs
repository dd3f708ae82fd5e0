//! Background commands implementation

use std::io;
use std::process::ExitCode;

use super::session::Session;
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::background::GlobFilePicker;
use crate::settings::SettingsError;

/// Execute the set-background command
pub async fn run_set_background(session: &Session, path: &str) -> ExitCode {
    let module = session.module().await;
    let result = module.set_background(path).map(|_| Some(path.to_string()));
    finish(session, result)
}

/// Execute the select-background command
pub async fn run_select_background(session: &Session, initial: Option<&str>) -> ExitCode {
    let module = session.module().await;
    let picker = GlobFilePicker::new(session.config.assets.root.clone(), io::stdin().lock(), io::stderr());
    let result = module.select_background(&picker, initial).await;
    finish(session, result)
}

fn finish(session: &Session, result: Result<Option<String>, SettingsError>) -> ExitCode {
    match result {
        Ok(Some(path)) => {
            if !session.save() {
                return ExitCode::from(EXIT_ERROR);
            }
            println!("Background: {}", path);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(None) => {
            eprintln!("Background unchanged");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
