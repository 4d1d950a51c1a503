use std::{
    collections::VecDeque,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, error};

use self::{
    timestamp::TimestampSource,
    update::{update_file, Outcome},
};

pub(crate) mod timestamp;
mod update;

/// What happened to the markdown files of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub updated: usize,
    pub already_present: usize,
    /// creation time unavailable
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} already had front matter, {} skipped, {} failed",
            self.updated, self.already_present, self.skipped, self.failed
        )
    }
}

fn is_markdown(file_name: &str) -> bool {
    file_name.ends_with(".md")
}

fn stamp_file(path: &Path, source: &impl TimestampSource, summary: &mut Summary) {
    let created = match source.created(path) {
        Ok(created) => created,
        Err(e) => {
            error!("{:#}", anyhow::Error::new(e));
            summary.skipped += 1;
            return;
        }
    };
    debug!("{path:?} was created at {created}");

    match update_file(path, created) {
        Ok(Outcome::Updated) => summary.updated += 1,
        Ok(Outcome::AlreadyPresent) => {
            debug!("{path:?} already has front matter.");
            summary.already_present += 1;
        }
        Err(e) => {
            error!("{:#}", anyhow::Error::new(e));
            summary.failed += 1;
        }
    }
}

/// Adds front matter to every `*.md` regular file under `root`.
///
/// Only an unreadable `root` is an error. Anything going wrong below it is logged and counted.
pub(crate) fn stamp_dir(root: &Path, source: &impl TimestampSource) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();

    let mut q: VecDeque<PathBuf> = VecDeque::new();
    q.push_back(root.to_path_buf());
    while let Some(dir) = q.pop_front() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => {
                return Err(e).with_context(|| format!("while opening {root:?}"));
            }
            Err(e) => {
                error!("failed to list {dir:?}: {e}");
                summary.failed += 1;
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("failed to read an entry of {dir:?}: {e}");
                    summary.failed += 1;
                    continue;
                }
            };
            let path = entry.path();
            // does not follow symlinks
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    error!("failed to stat {path:?}: {e}");
                    summary.failed += 1;
                    continue;
                }
            };

            if file_type.is_dir() {
                q.push_back(path);
            } else if file_type.is_file() && is_markdown(&entry.file_name().to_string_lossy()) {
                stamp_file(&path, source, &mut summary);
            }
        }
    }

    Ok(summary)
}
