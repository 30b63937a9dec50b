//! Timestamped output directories.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::error::Result;

/// Directory name format: local date and time to the microsecond.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S%.6f";

/// Default root under which run directories are created.
pub const DEFAULT_PLOTS_ROOT: &str = "plots";

/// A run directory, created when the value is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create `<root>/<now>` using the local clock.
    pub fn create(root: &Path) -> Result<Self> {
        Self::create_at(root, &Local::now())
    }

    /// Create `<root>/<timestamp>` for the given time.
    ///
    /// Missing ancestors are created. The leaf itself must not exist yet;
    /// an existing leaf fails with [`std::io::ErrorKind::AlreadyExists`].
    pub fn create_at<Tz>(root: &Path, now: &DateTime<Tz>) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let path = root.join(now.format(TIMESTAMP_FORMAT).to_string());
        fs::create_dir_all(root)?;
        fs::create_dir(&path)?;
        info!(path = %path.display(), "created output directory");
        Ok(Self { path })
    }

    /// Path of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `filename` inside the directory.
    #[must_use]
    pub fn join(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }
}
