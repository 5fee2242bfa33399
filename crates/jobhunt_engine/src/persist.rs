use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use jobhunt_logging::hunt_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Latest captcha frame, overwritten on every new revision.
pub const SNAPSHOT_FILE: &str = "snapshot.png";
/// Saved jobs of every owner.
pub const SAVED_ITEMS_FILE: &str = "saved_items.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path:?} is not a usable data directory: {reason}")]
    NotADirectory { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory holding the files a session leaves behind.
///
/// Every write goes through a temp file in the same directory followed by a
/// rename. A viewer watching `snapshot.png` or the next run reading
/// `saved_items.ron` sees either the old or the new content.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Opens `root`, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(PersistError::NotADirectory {
                    path: root,
                    reason: "exists and is a file".to_string(),
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&root).map_err(|err| PersistError::NotADirectory {
                    path: root.clone(),
                    reason: err.to_string(),
                })?;
                hunt_debug!("Created data directory {:?}", root);
            }
            Err(err) => {
                return Err(PersistError::NotADirectory {
                    path: root,
                    reason: err.to_string(),
                })
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn read_to_string(&self, name: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.file(name)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write_snapshot(&self, image: &[u8]) -> Result<PathBuf, PersistError> {
        self.replace(SNAPSHOT_FILE, image)
    }

    /// Replaces `name` with `content` in one rename.
    pub fn replace(&self, name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.file(name);
        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(content)?;
        staged.as_file_mut().sync_all()?;
        staged.persist(&target).map_err(|err| err.error)?;
        Ok(target)
    }
}
