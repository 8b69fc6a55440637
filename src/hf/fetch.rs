//! Directory fetch planning and orchestration.
//!
//! A [`DownloadRequest`] is planned entirely offline: the destination path
//! is derived and the directory normalized before anything touches the
//! network. The transfer itself is delegated to a [`SnapshotDownload`]
//! implementation so callers can swap in a fake.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::HfSubdirError;

use super::pattern;
use super::DirectoryRef;

/// Default number of files transferred in parallel.
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Revision fetched when none is requested.
pub const DEFAULT_REVISION: &str = "main";

/// User-facing knobs for a directory fetch.
#[derive(Clone, Debug)]
pub struct FetchOptions {
    /// Destination folder name; derived from the repository and directory if unset.
    pub local_dir: Option<String>,
    /// Parent of the destination folder; the current directory if unset.
    pub output_dir: Option<PathBuf>,
    /// Access token for private or gated repositories.
    pub token: Option<String>,
    pub max_workers: usize,
    pub revision: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            local_dir: None,
            output_dir: None,
            token: None,
            max_workers: DEFAULT_MAX_WORKERS,
            revision: DEFAULT_REVISION.to_string(),
        }
    }
}

/// A fully planned directory download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    pub repo_id: String,
    /// Normalized: no leading or trailing `/`, never empty.
    pub directory: String,
    pub destination: PathBuf,
    pub token: Option<String>,
    pub max_workers: usize,
    pub revision: String,
}

impl DownloadRequest {
    /// Plan a download of `target.directory` from `target.repo_id`.
    ///
    /// Fails with [`HfSubdirError::MissingDirectory`] when no directory was
    /// selected. Only local path resolution happens here.
    pub fn new(target: &DirectoryRef, options: FetchOptions) -> Result<Self, HfSubdirError> {
        if normalize_directory(&target.directory).is_empty() {
            return Err(HfSubdirError::MissingDirectory {
                repo_id: target.repo_id.clone(),
            });
        }

        // Named from the directory as given, before normalization.
        let local_dir = options
            .local_dir
            .unwrap_or_else(|| default_local_dir_name(&target.repo_id, &target.directory));
        let destination = resolve_destination(&local_dir, options.output_dir.as_deref())?;

        Ok(Self {
            repo_id: target.repo_id.clone(),
            directory: normalize_directory(&target.directory).to_string(),
            destination,
            token: options.token,
            max_workers: options.max_workers,
            revision: options.revision,
        })
    }

    pub fn inclusion_patterns(&self) -> [String; 2] {
        pattern::inclusion_patterns(&self.directory)
    }
}

/// Arguments handed to a bulk-download capability.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotRequest<'a> {
    pub repo_id: &'a str,
    pub revision: &'a str,
    pub allow_patterns: &'a [String],
    pub destination: &'a Path,
    pub token: Option<&'a str>,
    pub max_workers: usize,
}

/// Bulk download of every repository file matching a set of patterns.
///
/// Implementations create `destination` as needed and return the path the
/// files were written under. Any network, authentication, not-found or disk
/// failure is reported as [`HfSubdirError::Transfer`].
pub trait SnapshotDownload {
    fn snapshot(&self, request: &SnapshotRequest<'_>) -> Result<PathBuf, HfSubdirError>;
}

/// Download every file under `request.directory` into `request.destination`.
pub fn download_directory<D>(
    request: DownloadRequest,
    downloader: &D,
) -> Result<PathBuf, HfSubdirError>
where
    D: SnapshotDownload + ?Sized,
{
    let allow_patterns = request.inclusion_patterns();
    debug!(
        repo_id = %request.repo_id,
        revision = %request.revision,
        patterns = ?allow_patterns,
        "starting directory snapshot"
    );

    downloader.snapshot(&SnapshotRequest {
        repo_id: &request.repo_id,
        revision: &request.revision,
        allow_patterns: &allow_patterns,
        destination: &request.destination,
        token: request.token.as_deref(),
        max_workers: request.max_workers,
    })
}

/// `"<repo_id>_<directory>"` with every `/` replaced by `_`.
pub fn default_local_dir_name(repo_id: &str, directory: &str) -> String {
    format!("{}_{}", repo_id.replace('/', "_"), directory.replace('/', "_"))
}

/// Strip leading and trailing `/` from a repository directory path.
pub fn normalize_directory(directory: &str) -> &str {
    directory.trim_matches('/')
}

/// Place `local_dir` under `output_dir` (home-expanded, made absolute), or
/// leave it relative to the current directory when there is no `output_dir`.
pub fn resolve_destination(
    local_dir: &str,
    output_dir: Option<&Path>,
) -> Result<PathBuf, HfSubdirError> {
    match output_dir {
        Some(base) => {
            let base = std::path::absolute(expand_home(base)?)?;
            Ok(base.join(local_dir))
        }
        None => Ok(PathBuf::from(local_dir)),
    }
}

/// Expand a leading `~` component to the user's home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf, HfSubdirError> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("cannot expand '{}': home directory unknown", path.display()),
        )
    })?;

    Ok(home.join(rest))
}
