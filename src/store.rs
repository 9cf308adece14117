// SPDX-FileCopyrightText: 2025 Hong Minhee <https://hongminhee.org/>
// SPDX-License-Identifier: GPL-3.0-or-later
//! Saved subjects, one pretty-printed JSON file per subject.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::model::Subject;

/// Extension of saved subject files.
pub const SUBJECT_EXTENSION: &str = "json";

/// Turn a subject name into a file-safe one: keep only ASCII letters,
/// digits, `-`, `_` and spaces, trim, then replace spaces with `-`.
pub fn sanitize_subject_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    kept.trim().replace(' ', "-")
}

/// A folder of saved subjects, looked up by name.
#[derive(Debug, Clone)]
pub struct SubjectStore {
    root: PathBuf,
}

impl SubjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file a subject is saved in.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let file_name = sanitize_subject_name(name);
        if file_name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self
            .root
            .join(format!("{}.{}", file_name, SUBJECT_EXTENSION)))
    }

    /// Names of all saved subjects, sorted. A missing folder has none.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let root = self.root.to_string_lossy();
        let root = if root.is_empty() { ".".into() } else { root };
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(root.trim_end_matches(['/', '\\'])),
            SUBJECT_EXTENSION
        );
        debug!("Listing subjects matching {}", pattern);

        let mut names = Vec::new();
        for entry in glob::glob(&pattern).map_err(StoreError::Glob)? {
            let path = entry.map_err(StoreError::GlobIo)?;
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }

    pub fn load(&self, name: &str) -> Result<Subject, StoreError> {
        let path = self.path_for(name)?;
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io(path.clone(), e),
        })?;
        debug!("Loaded subject from {}", path.display());
        serde_json::from_str(&content).map_err(|e| StoreError::Json(path, e))
    }

    /// Save a subject under its own name, replacing any earlier save.
    pub fn save(&self, subject: &Subject) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&subject.subject_name)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io(self.root.clone(), e))?;

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        subject
            .serialize(&mut serializer)
            .map_err(|e| StoreError::Json(path.clone(), e))?;

        fs::write(&path, buffer).map_err(|e| StoreError::Io(path.clone(), e))?;
        info!("Saved {} to {}", subject.subject_name, path.display());
        Ok(path)
    }

    /// Save a new subject, refusing to replace an existing one.
    pub fn create(&self, subject: &Subject) -> Result<PathBuf, StoreError> {
        if self.exists(&subject.subject_name) {
            return Err(StoreError::AlreadyExists(subject.subject_name.clone()));
        }
        self.save(subject)
    }

    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io(path.clone(), e),
        })?;
        info!("Deleted {}", path.display());
        Ok(())
    }
}

/// Errors that can occur when reading or writing saved subjects.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error on a subject file or the data folder.
    Io(PathBuf, io::Error),
    /// A subject file could not be read or written as JSON.
    Json(PathBuf, serde_json::Error),
    /// Error building the listing pattern.
    Glob(glob::PatternError),
    /// I/O error while listing subjects.
    GlobIo(glob::GlobError),
    /// No subject is saved under this name.
    NotFound(String),
    /// A subject is already saved under this name.
    AlreadyExists(String),
    /// Nothing usable remains of the name after sanitizing it.
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, err) => write!(f, "failed to access {}: {}", path.display(), err),
            StoreError::Json(path, err) => {
                write!(f, "malformed subject file {}: {}", path.display(), err)
            }
            StoreError::Glob(err) => write!(f, "invalid data folder pattern: {}", err),
            StoreError::GlobIo(err) => write!(f, "error reading data folder: {}", err),
            StoreError::NotFound(name) => write!(f, "no saved subject named '{}'", name),
            StoreError::AlreadyExists(name) => {
                write!(f, "a subject named '{}' already exists", name)
            }
            StoreError::InvalidName(name) => write!(f, "'{}' is not a usable subject name", name),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, err) => Some(err),
            StoreError::Json(_, err) => Some(err),
            StoreError::Glob(err) => Some(err),
            StoreError::GlobIo(err) => Some(err),
            StoreError::NotFound(_) | StoreError::AlreadyExists(_) | StoreError::InvalidName(_) => {
                None
            }
        }
    }
}
