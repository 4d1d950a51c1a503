use std::{
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use log::info;

use crate::metadata::{has_front_matter, FrontMatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Updated,
    AlreadyPresent,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum UpdateError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize front matter for {path:?}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to open {path:?} for writing")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to flush {path:?}")]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Prepends default front matter to `path` unless it already starts with a block.
///
/// The file is truncated and rewritten in place, so its identity (and birth time) is kept.
/// A failure after truncation leaves the file partially written; the error says which step broke.
pub(crate) fn update_file(path: &Path, created: NaiveDateTime) -> Result<Outcome, UpdateError> {
    let content = std::fs::read(path).map_err(|source| UpdateError::Read {
        path: path.to_owned(),
        source,
    })?;

    if has_front_matter(&String::from_utf8_lossy(&content)) {
        return Ok(Outcome::AlreadyPresent);
    }

    let block = FrontMatter::new(created)
        .to_block()
        .map_err(|source| UpdateError::Serialize {
            path: path.to_owned(),
            source,
        })?;

    let fd = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| UpdateError::Open {
            path: path.to_owned(),
            source,
        })?;
    let mut writer = BufWriter::new(fd);
    writer
        .write_all(block.as_bytes())
        .and_then(|()| writer.write_all(&content))
        .map_err(|source| UpdateError::Write {
            path: path.to_owned(),
            source,
        })?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .and_then(|fd| fd.sync_all())
        .map_err(|source| UpdateError::Flush {
            path: path.to_owned(),
            source,
        })?;

    info!("Front matter added to {}", path.display());
    Ok(Outcome::Updated)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    const SCENARIO_HEADER: &str =
        "---\ntag:\n- journal\n- driving-school\ndate: 2024-03-05 10:00:00\ndraft: true\n---\n";

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn prepends_front_matter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.md");
        std::fs::write(&path, "hello\n").unwrap();

        assert_eq!(update_file(&path, created()).unwrap(), Outcome::Updated);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{SCENARIO_HEADER}hello\n")
        );
    }

    #[test]
    fn keeps_existing_front_matter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("b.md");
        std::fs::write(&path, "---\ntitle: x\n---\nbody").unwrap();

        assert_eq!(
            update_file(&path, created()).unwrap(),
            Outcome::AlreadyPresent
        );
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"---\ntitle: x\n---\nbody".to_vec()
        );
    }

    #[test]
    fn second_run_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.md");
        std::fs::write(&path, "# Lesson 3\n\nparallel parking\n").unwrap();

        assert_eq!(update_file(&path, created()).unwrap(), Outcome::Updated);
        let once = std::fs::read(&path).unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            update_file(&path, later).unwrap(),
            Outcome::AlreadyPresent
        );
        assert_eq!(std::fs::read(&path).unwrap(), once);
    }

    #[test]
    fn empty_file_gets_only_front_matter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.md");
        std::fs::write(&path, "").unwrap();

        update_file(&path, created()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCENARIO_HEADER);
    }

    #[test]
    fn non_utf8_body_is_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.md");
        let body = b"caf\xe9\n".to_vec();
        std::fs::write(&path, &body).unwrap();

        update_file(&path, created()).unwrap();
        let mut expected = SCENARIO_HEADER.as_bytes().to_vec();
        expected.extend_from_slice(&body);
        assert_eq!(std::fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vanished.md");

        let err = update_file(&path, created()).unwrap_err();
        assert!(matches!(err, UpdateError::Read { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_file_is_open_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.md");
        std::fs::write(&path, "hello\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();

        // root ignores file modes
        if OpenOptions::new().write(true).open(&path).is_ok() {
            return;
        }

        let err = update_file(&path, created()).unwrap_err();
        assert!(matches!(err, UpdateError::Open { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn error_message_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vanished.md");

        let err = update_file(&path, created()).unwrap_err();
        assert!(err.to_string().contains("vanished.md"));
    }
}
