//! CLI integration tests for the squad-token binary
//!
//! These tests run the binary against a world document in a temporary
//! directory and check exit codes, output images, and the saved world.

use image::{Rgba, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn squad_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_squad-token"))
}

/// Lay out a project: squad.toml, world.json and one 2x4 token icon.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("squad.toml"), "[world]\npath = \"world.json\"\n[assets]\nroot = \".\"\n")
        .unwrap();
    fs::create_dir_all(dir.path().join("tokens")).unwrap();
    RgbaImage::from_pixel(2, 4, Rgba([255, 0, 0, 255]))
        .save(dir.path().join("tokens/goblin.png"))
        .unwrap();
    fs::write(
        dir.path().join("world.json"),
        r#"{
            "actors": {
                "goblin": { "name": "Goblin" },
                "statue": { "locked": true }
            },
            "tokens": [ { "id": "g1", "actor": "goblin", "img": "tokens/goblin.png" } ]
        }"#,
    )
    .unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(squad_binary())
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("squad.toml"))
        .args(args)
        .output()
        .expect("Failed to execute squad-token")
}

fn world_json(dir: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(dir.join("world.json")).unwrap()).unwrap()
}

#[test]
fn test_toggle_persists_flag() {
    let dir = project();
    let output = run(dir.path(), &["toggle", "goblin"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("goblin: squad on"));

    let world = world_json(dir.path());
    assert_eq!(world["actors"]["goblin"]["flags"]["squad-token"]["is-squad"], true);
}

#[test]
fn test_toggle_locked_actor_fails_but_others_succeed() {
    let dir = project();
    let output = run(dir.path(), &["toggle", "statue", "goblin"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("locked"));

    let world = world_json(dir.path());
    assert_eq!(world["actors"]["goblin"]["flags"]["squad-token"]["is-squad"], true);
}

#[test]
fn test_render_composites_squad_tokens() {
    let dir = project();
    assert!(run(dir.path(), &["toggle", "goblin"]).status.success());

    let output = run(dir.path(), &["render", "--out", "out"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // 2x4 icon: size 4, background 14x14
    let image = image::open(dir.path().join("out/g1.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (14, 14));
    assert_eq!(*image.get_pixel(3, 2), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_render_leaves_non_squad_tokens() {
    let dir = project();
    let output = run(dir.path(), &["render", "--out", "out"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let image = image::open(dir.path().join("out/g1.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (2, 4));
}

#[test]
fn test_render_with_missing_background_keeps_original() {
    let dir = project();
    assert!(run(dir.path(), &["toggle", "goblin"]).status.success());
    assert!(run(dir.path(), &["set-background", "frames/missing.png"]).status.success());

    let output = run(dir.path(), &["render", "--out", "out"]);
    assert_eq!(output.status.code(), Some(1));

    let image = image::open(dir.path().join("out/g1.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (2, 4));
}

#[test]
fn test_set_background_persists_setting() {
    let dir = project();
    let output = run(dir.path(), &["set-background", "frames/gold.png"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let world = world_json(dir.path());
    assert_eq!(world["settings"]["squad-token.background"], "frames/gold.png");

    let status = run(dir.path(), &["status"]);
    assert!(String::from_utf8_lossy(&status.stdout).contains("Background: frames/gold.png"));
}

#[test]
fn test_select_background_from_listing() {
    let dir = project();
    fs::create_dir_all(dir.path().join("frames")).unwrap();
    RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])).save(dir.path().join("frames/blue.png")).unwrap();

    let mut child = Command::new(squad_binary())
        .current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("squad.toml"))
        .args(["select-background", "--initial"])
        .arg(dir.path().join("frames"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute squad-token");
    child.stdin.take().unwrap().write_all(b"1\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let world = world_json(dir.path());
    let chosen = world["settings"]["squad-token.background"].as_str().unwrap();
    assert!(chosen.ends_with("blue.png"), "got {}", chosen);
}

#[test]
fn test_status_lists_defaults() {
    let dir = project();
    let output = run(dir.path(), &["status"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Background: /modules/squad-token/assets/background.png"));
    assert!(stdout.contains("goblin"));
    assert!(stdout.contains("(locked)"));
}

#[test]
fn test_invalid_world_file() {
    let dir = project();
    fs::write(dir.path().join("world.json"), "{ nope").unwrap();
    let output = run(dir.path(), &["status"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse world file"));
}
