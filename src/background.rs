//! Background frame selection
//!
//! Changing the background reverts every composited token right away. The
//! compositor then rebuilds each composite with the new frame on its next
//! refresh.

use serde_json::Value;
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use glob::glob;

use crate::compositor::reset_token;
use crate::renderer::Renderer;
use crate::settings::{background_setting, SettingsError, SettingsRegistry};
use crate::{DEFAULT_BACKGROUND, FLAG_BACKGROUND, SCOPE};

/// Kind of file a picker offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
}

impl FileKind {
    /// File extensions accepted for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileKind::Image => &["png", "jpg", "jpeg", "webp", "gif"],
        }
    }
}

/// Options passed to a [`FilePicker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePickerOptions {
    pub kind: FileKind,
    /// Directory or file to browse to first
    pub initial: Option<String>,
}

/// A user-facing file selection surface.
pub trait FilePicker {
    /// Wait for the user's choice. `None` means the picker was cancelled.
    async fn pick(&self, options: FilePickerOptions) -> Option<String>;
}

/// Persist a new background and revert every composited token.
///
/// Every token is asked to redraw, whether or not it was reverted. Returns the
/// number of tokens that were showing a composite. Calling it twice with the
/// same path leaves the same state. If setup has not registered the setting
/// yet, it is registered here with the built-in default.
pub fn set_background<S, R>(settings: &S, renderer: &R, path: &str) -> Result<usize, SettingsError>
where
    S: SettingsRegistry + ?Sized,
    R: Renderer + ?Sized,
{
    let value = Value::String(path.to_string());
    match settings.set(SCOPE, FLAG_BACKGROUND, value.clone()) {
        Err(SettingsError::Unregistered { .. }) => {
            log::debug!("background setting used before setup, registering the default");
            settings.register(SCOPE, FLAG_BACKGROUND, background_setting(DEFAULT_BACKGROUND))?;
            settings.set(SCOPE, FLAG_BACKGROUND, value)?;
        }
        result => result?,
    }
    log::info!("Squad background set to {}", path);

    let mut reverted = 0;
    for token in renderer.tokens() {
        match reset_token(renderer, &token) {
            Ok(true) => reverted += 1,
            Ok(false) => renderer.refresh(&token),
            Err(e) => log::error!("Failed to reset token '{}': {}", token, e),
        }
    }
    Ok(reverted)
}

/// Ask the user for a background and apply it.
///
/// An empty `initial_path` is the same as none. Returns the chosen path, or
/// `None` when the picker was cancelled.
pub async fn select_background<P, S, R>(
    picker: &P,
    settings: &S,
    renderer: &R,
    initial_path: Option<&str>,
) -> Result<Option<String>, SettingsError>
where
    P: FilePicker + ?Sized,
    S: SettingsRegistry + ?Sized,
    R: Renderer + ?Sized,
{
    let options = FilePickerOptions {
        kind: FileKind::Image,
        initial: initial_path.filter(|p| !p.is_empty()).map(str::to_string),
    };

    match picker.pick(options).await {
        Some(path) => {
            set_background(settings, renderer, &path)?;
            Ok(Some(path))
        }
        None => {
            log::debug!("Background selection cancelled");
            Ok(None)
        }
    }
}

/// Find all files of `kind` below `dir` (recursively), sorted.
pub fn find_files(dir: &Path, kind: FileKind) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    for ext in kind.extensions() {
        if let Ok(paths) = glob(&format!("{}/**/*.{}", dir_str, ext)) {
            files.extend(paths.filter_map(Result::ok));
        }
    }

    files.sort();
    files
}

/// Terminal file picker: lists matching files and reads the choice.
///
/// The answer may be a list number or a path. An empty line cancels.
pub struct GlobFilePicker<I, O> {
    root: PathBuf,
    input: RefCell<I>,
    output: RefCell<O>,
}

impl<I: BufRead, O: Write> GlobFilePicker<I, O> {
    pub fn new(root: impl Into<PathBuf>, input: I, output: O) -> Self {
        Self { root: root.into(), input: RefCell::new(input), output: RefCell::new(output) }
    }

    fn browse_dir(&self, initial: Option<&str>) -> PathBuf {
        match initial {
            Some(path) => {
                let path = Path::new(path);
                if path.is_file() {
                    path.parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone())
                } else {
                    path.to_path_buf()
                }
            }
            None => self.root.clone(),
        }
    }

    fn prompt(&self, files: &[PathBuf]) -> std::io::Result<Option<String>> {
        let mut out = self.output.borrow_mut();
        for (i, file) in files.iter().enumerate() {
            writeln!(out, "{:>3}) {}", i + 1, file.display())?;
        }
        write!(out, "Select background (number or path, empty to cancel): ")?;
        out.flush()?;

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = answer.parse::<usize>() {
            if n >= 1 && n <= files.len() {
                return Ok(Some(files[n - 1].display().to_string()));
            }
        }
        Ok(Some(answer.to_string()))
    }
}

impl<I: BufRead, O: Write> FilePicker for GlobFilePicker<I, O> {
    async fn pick(&self, options: FilePickerOptions) -> Option<String> {
        let dir = self.browse_dir(options.initial.as_deref());
        let files = find_files(&dir, options.kind);
        match self.prompt(&files) {
            Ok(choice) => choice,
            Err(e) => {
                log::error!("File picker failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn image_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("frames")).unwrap();
        fs::write(dir.path().join("frames/gold.png"), b"").unwrap();
        fs::write(dir.path().join("frames/wood.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        dir
    }

    #[test]
    fn test_find_files_filters_by_kind() {
        let dir = image_tree();
        let files = find_files(dir.path(), FileKind::Image);
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["gold.png", "wood.jpg"]);
    }

    #[tokio::test]
    async fn test_pick_by_number() {
        let dir = image_tree();
        let picker = GlobFilePicker::new(dir.path(), "2\n".as_bytes(), Vec::new());
        let choice = picker.pick(FilePickerOptions { kind: FileKind::Image, initial: None }).await;
        assert!(choice.unwrap().ends_with("wood.jpg"));

        let listing = String::from_utf8(picker.output.into_inner()).unwrap();
        assert!(listing.contains("1) "));
        assert!(listing.contains("gold.png"));
    }

    #[tokio::test]
    async fn test_pick_by_path() {
        let dir = image_tree();
        let picker = GlobFilePicker::new(dir.path(), "custom/frame.png\n".as_bytes(), Vec::new());
        let choice = picker.pick(FilePickerOptions { kind: FileKind::Image, initial: None }).await;
        assert_eq!(choice.as_deref(), Some("custom/frame.png"));
    }

    #[tokio::test]
    async fn test_empty_answer_cancels() {
        let dir = image_tree();
        let picker = GlobFilePicker::new(dir.path(), "\n".as_bytes(), Vec::new());
        let choice = picker.pick(FilePickerOptions { kind: FileKind::Image, initial: None }).await;
        assert_eq!(choice, None);
    }

    #[tokio::test]
    async fn test_initial_directory_narrows_listing() {
        let dir = image_tree();
        fs::write(dir.path().join("top.png"), b"").unwrap();
        let initial = dir.path().join("frames").display().to_string();
        let picker = GlobFilePicker::new(dir.path(), "1\n".as_bytes(), Vec::new());
        let choice = picker
            .pick(FilePickerOptions { kind: FileKind::Image, initial: Some(initial) })
            .await;
        assert!(choice.unwrap().ends_with("gold.png"));
    }
}
