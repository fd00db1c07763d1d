//! Export sinks: where flattened tag lists and CSV files end up

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Result, TagscoutError};

/// Destination for exported tag data
pub trait ExportSink {
    /// Place text on a clipboard-like destination
    fn copy_text(&mut self, text: &str) -> Result<()>;

    /// Store a named file, returning where it was written
    fn save_file(&mut self, name: &str, contents: &str) -> Result<PathBuf>;
}

/// System clipboard via the platform's clipboard command, files into a directory
pub struct ClipboardSink {
    dir: PathBuf,
}

impl ClipboardSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Clipboard writers to try, in order
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    Ok(child.wait()?.success())
}

impl ExportSink for ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        for &(program, args) in CLIPBOARD_COMMANDS {
            match pipe_to(program, args, text) {
                Ok(true) => return Ok(()),
                Ok(false) => tracing::debug!(program, "clipboard command exited with failure"),
                Err(e) => tracing::debug!(program, error = %e, "clipboard command unavailable"),
            }
        }
        Err(TagscoutError::ClipboardError(
            "no working clipboard command found".into(),
        ))
    }

    fn save_file(&mut self, name: &str, contents: &str) -> Result<PathBuf> {
        write_into(&self.dir, name, contents)
    }
}

/// Writes files into a directory; copied text goes to stdout
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn save_file(&mut self, name: &str, contents: &str) -> Result<PathBuf> {
        write_into(&self.dir, name, contents)
    }
}

fn write_into(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(path)
}

/// Records exports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub copied: Vec<String>,
    pub files: Vec<(String, String)>,
}

impl ExportSink for MemorySink {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_string());
        Ok(())
    }

    fn save_file(&mut self, name: &str, contents: &str) -> Result<PathBuf> {
        self.files.push((name.to_string(), contents.to_string()));
        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("exports"));
        let path = sink.save_file("tags.csv", "Tag,Score,Frequency\nsky,7,1").unwrap();
        assert_eq!(path, dir.path().join("exports").join("tags.csv"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.ends_with("sky,7,1"));
    }

    #[test]
    fn test_memory_sink_records() {
        let mut sink = MemorySink::default();
        sink.copy_text("sky, sea").unwrap();
        sink.save_file("a.csv", "x").unwrap();
        assert_eq!(sink.copied, vec!["sky, sea"]);
        assert_eq!(sink.files, vec![("a.csv".to_string(), "x".to_string())]);
    }
}
