use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "calsum";

/// Per-user application data directory.
///
/// - **Windows**: `%LOCALAPPDATA%\calsum`
/// - **macOS**: `~/Library/Application Support/calsum`
/// - **Linux**: `~/.local/share/calsum`
#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => home_dir().join("Library").join("Application Support").display().to_string(),
            _ => home_dir().join(".local").join("share").display().to_string(),
        };

        Self {
            base_path: Path::new(&base_path).join(APP_NAME),
        }
    }

    /// Path of `file_name` inside the data directory, creating the directory if needed.
    pub fn get_path(&self, file_name: &str) -> io::Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// The user's home directory, `.` when it cannot be determined.
pub fn home_dir() -> PathBuf {
    let home = match OS {
        "windows" => var("USERPROFILE"),
        _ => var("HOME"),
    };
    PathBuf::from(home.unwrap_or_else(|_| ".".into()))
}
