//! Render command implementation

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::session::Session;
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::renderer::Renderer;

/// Execute the render command
///
/// Places every token, runs one refresh pass, and writes each token's
/// displayed image to `{out}/{token}.png`.
pub async fn run_render(session: &Session, out: &Path) -> ExitCode {
    let module = session.module().await;
    let placed = session.place_tokens().await;
    let summary = module.refresh_all().await;

    if let Err(e) = fs::create_dir_all(out) {
        eprintln!("Error: Cannot create output directory '{}': {}", out.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let mut write_failed = false;
    for token in session.renderer.tokens() {
        let Some(visual) = session.renderer.displayed(&token) else {
            continue;
        };
        let path = out.join(format!("{}.png", token));
        match visual.image().pixels().save(&path) {
            Ok(()) => println!("Saved: {}", path.display()),
            Err(e) => {
                eprintln!("Error: Failed to save '{}': {}", path.display(), e);
                write_failed = true;
            }
        }
    }

    eprintln!(
        "{} tokens: {} composited, {} unchanged, {} failed",
        placed, summary.applied, summary.unchanged, summary.failed
    );

    if write_failed || summary.failed > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
