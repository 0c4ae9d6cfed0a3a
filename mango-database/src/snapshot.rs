//! Whole-document persistence of the uid → record mapping.
//!
//! Every write replaces the previous file through a temp file in the same
//! directory followed by a rename and a sync of the directory, so a crash
//! mid-write leaves the old snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::SnapshotError;
use crate::model::user::UserRecord;

/// Version tag written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

pub type UserMap = BTreeMap<String, UserRecord>;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    users: BTreeMap<&'a str, &'a UserRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotIn {
    Versioned { version: u32, users: UserMap },
    // Bare uid → record mapping without a version tag.
    Legacy(UserMap),
}

#[derive(Clone, Debug)]
pub struct PersistedDocument {
    path: PathBuf,
}

impl PersistedDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or an empty mapping when none has been written yet.
    ///
    /// A file that exists but does not parse is an error; it is never replaced
    /// with an empty document.
    pub fn load(&self) -> Result<UserMap, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(UserMap::new()),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let parsed: SnapshotIn =
            serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Decode {
                path: self.path.clone(),
                source,
            })?;

        let mut users = match parsed {
            SnapshotIn::Versioned { version, users } => {
                if version > SNAPSHOT_VERSION {
                    return Err(SnapshotError::UnsupportedVersion {
                        path: self.path.clone(),
                        found: version,
                        supported: SNAPSHOT_VERSION,
                    });
                }
                users
            }
            SnapshotIn::Legacy(users) => users,
        };

        for (uid, record) in users.iter_mut() {
            record.uid.clone_from(uid);
        }

        Ok(users)
    }

    /// Replace the stored snapshot with `bytes`.
    pub fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        write_atomically(&self.path, bytes).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Encode a full document from `(uid, record)` pairs.
pub fn encode<'a>(
    users: impl IntoIterator<Item = (&'a str, &'a UserRecord)>,
) -> Result<Vec<u8>, SnapshotError> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        users: users.into_iter().collect(),
    };

    serde_json::to_vec_pretty(&snapshot).map_err(SnapshotError::Encode)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    sync_parent_dir(parent);

    Ok(())
}

/// Flush the rename to disk. Failures are logged and otherwise ignored.
fn sync_parent_dir(parent: &Path) {
    #[cfg(unix)]
    {
        if let Err(err) = fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            tracing::debug!(path = %parent.display(), "snapshot directory sync failed: {err}");
        }
    }
    #[cfg(not(unix))]
    {
        let _ = parent;
    }
}
