use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDateTime};

#[derive(Debug, thiserror::Error)]
pub(crate) enum TimestampError {
    #[error("failed to read metadata of {path:?}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("creation time of {path:?} is not available")]
    Unsupported {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where creation times of markdown files come from.
pub(crate) trait TimestampSource {
    /// Local wall-clock time at which `path` was created.
    fn created(&self, path: &Path) -> Result<NaiveDateTime, TimestampError>;
}

/// Birth time reported by the filesystem (`statx` on Linux).
#[derive(Debug)]
pub(crate) struct BirthTime;

impl TimestampSource for BirthTime {
    fn created(&self, path: &Path) -> Result<NaiveDateTime, TimestampError> {
        // symlinks are never candidates, but don't follow one if handed over
        let meta = std::fs::symlink_metadata(path).map_err(|source| TimestampError::Metadata {
            path: path.to_owned(),
            source,
        })?;
        let created = meta.created().map_err(|source| TimestampError::Unsupported {
            path: path.to_owned(),
            source,
        })?;

        Ok(DateTime::<Local>::from(created).naive_local())
    }
}
