//! Status command implementation

use std::process::ExitCode;

use super::session::Session;
use super::EXIT_SUCCESS;
use crate::flags::is_squad;
use crate::settings::background_path;

/// Execute the status command
pub async fn run_status(session: &Session) -> ExitCode {
    // Setup registers the background default
    let _module = session.module().await;
    println!("Background: {}", background_path(&session.world));

    let data = session.world.data();
    println!("Actors:");
    for (id, actor) in &data.actors {
        let squad = is_squad(&session.world, id).unwrap_or(false);
        let name = actor.name.as_deref().unwrap_or("");
        let locked = if actor.locked { " (locked)" } else { "" };
        println!("  {:<16} {:<20} squad={}{}", id.as_str(), name, squad, locked);
    }

    println!("Tokens:");
    for token in &data.tokens {
        println!("  {:<16} actor={:<16} img={}", token.id.as_str(), token.actor.as_str(), token.img);
    }

    ExitCode::from(EXIT_SUCCESS)
}
