//! Toggle command implementation

use std::process::ExitCode;

use super::session::Session;
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::entity::ActorId;
use crate::membership::toggle;

/// Execute the toggle command
pub fn run_toggle(session: &Session, actors: &[String]) -> ExitCode {
    let actors: Vec<ActorId> = actors.iter().map(|a| ActorId::new(a.as_str())).collect();
    let report = toggle(&session.world, &actors);

    for (actor, squad) in report.toggled() {
        println!("{}: squad {}", actor, if squad { "on" } else { "off" });
    }
    for (_, error) in report.failures() {
        eprintln!("Error: {}", error);
    }

    let saved = session.save();
    if report.has_failures() || !saved {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
