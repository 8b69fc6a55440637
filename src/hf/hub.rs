//! Bulk download backed by the Hugging Face Hub API (`hf-hub`).

use std::path::{Path, PathBuf};

use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::HfSubdirError;

use super::fetch::{SnapshotDownload, SnapshotRequest};
use super::pattern;

/// Downloads model repository files through the `hf-hub` cache and
/// materializes them under the requested destination.
///
/// The cache location follows `hf-hub` defaults (`HF_HOME`, then
/// `~/.cache/huggingface`).
#[derive(Clone, Copy, Debug, Default)]
pub struct HubSnapshot;

impl HubSnapshot {
    fn open_repo(&self, request: &SnapshotRequest<'_>) -> Result<ApiRepo, HfSubdirError> {
        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(token) = request.token {
            builder = builder.with_token(Some(token.to_string()));
        }

        let api = builder
            .build()
            .map_err(|source| transfer_error(request.repo_id, source))?;

        Ok(api.repo(Repo::with_revision(
            request.repo_id.to_string(),
            RepoType::Model,
            request.revision.to_string(),
        )))
    }
}

impl SnapshotDownload for HubSnapshot {
    fn snapshot(&self, request: &SnapshotRequest<'_>) -> Result<PathBuf, HfSubdirError> {
        let repo = self.open_repo(request)?;

        let repo_info = repo
            .info()
            .map_err(|source| transfer_error(request.repo_id, source))?;
        let sibling_paths: Vec<String> = repo_info
            .siblings
            .into_iter()
            .map(|sibling| sibling.rfilename)
            .collect();

        let selected = select_matching(&sibling_paths, request.allow_patterns);
        debug!(
            total = sibling_paths.len(),
            selected = selected.len(),
            "filtered repository files"
        );
        if selected.is_empty() {
            warn!(
                repo_id = request.repo_id,
                patterns = ?request.allow_patterns,
                "no repository files match the requested directory"
            );
        }

        std::fs::create_dir_all(request.destination).map_err(|source| {
            transfer_error(
                request.repo_id,
                format!(
                    "cannot create '{}': {}",
                    request.destination.display(),
                    source
                ),
            )
        })?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.max_workers.max(1))
            .build()
            .map_err(|source| transfer_error(request.repo_id, source))?;
        info!(workers = pool.current_num_threads(), files = selected.len(), "transferring");

        pool.install(|| {
            selected.par_iter().try_for_each(|remote_path| {
                fetch_file(&repo, request.repo_id, remote_path, request.destination)
            })
        })?;

        std::fs::canonicalize(request.destination)
            .map_err(|source| transfer_error(request.repo_id, source))
    }
}

/// Repository paths matching any pattern, in sorted order.
pub fn select_matching(paths: &[String], patterns: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = paths
        .iter()
        .filter(|path| pattern::matches_any(patterns, path))
        .cloned()
        .collect();
    selected.sort();
    selected.dedup();
    selected
}

fn fetch_file(
    repo: &ApiRepo,
    repo_id: &str,
    remote_path: &str,
    destination: &Path,
) -> Result<(), HfSubdirError> {
    let cached = repo.get(remote_path).map_err(|source| {
        transfer_error(repo_id, format!("failed downloading '{remote_path}': {source}"))
    })?;

    let local = destination.join(remote_path);
    materialize(&cached, &local).map_err(|source| {
        transfer_error(
            repo_id,
            format!("failed writing '{}': {}", local.display(), source),
        )
    })?;

    debug!(file = remote_path, "downloaded");
    Ok(())
}

/// Copy the cached file to `local` as an independent file.
///
/// Whatever sits at `local` is unlinked first, so a stale link into the
/// cache is never written through.
fn materialize(cached: &Path, local: &Path) -> std::io::Result<()> {
    if let Some(parent) = local.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::symlink_metadata(local).is_ok() {
        std::fs::remove_file(local)?;
    }
    std::fs::copy(cached, local)?;
    Ok(())
}

fn transfer_error(repo_id: &str, source: impl std::fmt::Display) -> HfSubdirError {
    HfSubdirError::Transfer {
        repo_id: repo_id.to_string(),
        message: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_matching_keeps_only_directory_files() {
        let paths = vec![
            "README.md".to_string(),
            "vae/config.json".to_string(),
            "vae/diffusion_pytorch_model.safetensors".to_string(),
            "vae/sub/extra.bin".to_string(),
            "vae_decoder/model.onnx".to_string(),
            "unet/config.json".to_string(),
        ];
        let patterns = pattern::inclusion_patterns("vae");

        assert_eq!(
            select_matching(&paths, &patterns),
            vec![
                "vae/config.json".to_string(),
                "vae/diffusion_pytorch_model.safetensors".to_string(),
                "vae/sub/extra.bin".to_string(),
            ]
        );
    }

    #[test]
    fn select_matching_can_be_empty() {
        let paths = vec!["README.md".to_string()];
        let patterns = pattern::inclusion_patterns("vae");
        assert!(select_matching(&paths, &patterns).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn materialize_resolves_cache_symlinks() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let blob = temp.path().join("blobs").join("abc123");
        std::fs::create_dir_all(blob.parent().expect("parent")).expect("create blobs");
        std::fs::write(&blob, b"config").expect("write blob");

        let snapshot = temp.path().join("snapshots").join("config.json");
        std::fs::create_dir_all(snapshot.parent().expect("parent")).expect("create snapshots");
        std::os::unix::fs::symlink("../blobs/abc123", &snapshot).expect("symlink");

        let local = temp.path().join("out").join("config.json");
        materialize(&snapshot, &local).expect("materialize");

        assert!(!std::fs::symlink_metadata(&local)
            .expect("metadata")
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read(&local).expect("read"), b"config");
    }

    #[test]
    fn materialize_creates_parents_and_replaces_existing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let cached = temp.path().join("blob");
        std::fs::write(&cached, b"weights").expect("write blob");

        let local = temp.path().join("out").join("vae").join("model.bin");
        materialize(&cached, &local).expect("first materialize");
        assert_eq!(std::fs::read(&local).expect("read"), b"weights");

        std::fs::write(&cached, b"weights-v2").expect("rewrite blob");
        materialize(&cached, &local).expect("second materialize");
        assert_eq!(std::fs::read(&local).expect("read"), b"weights-v2");
    }

    #[test]
    fn editing_materialized_file_leaves_cache_untouched() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let cached = temp.path().join("blob");
        std::fs::write(&cached, b"{\"a\":1}").expect("write blob");

        let local = temp.path().join("out").join("config.json");
        materialize(&cached, &local).expect("materialize");

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&local)
            .expect("open local");
        std::io::Write::write_all(&mut file, b" EDITED").expect("append");
        drop(file);

        assert_eq!(std::fs::read(&cached).expect("read blob"), b"{\"a\":1}");
        assert_eq!(
            std::fs::read(&local).expect("read local"),
            b"{\"a\":1} EDITED"
        );
    }

    #[cfg(unix)]
    #[test]
    fn stale_link_into_cache_is_replaced_not_written_through() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let old_blob = temp.path().join("old-blob");
        std::fs::write(&old_blob, b"v1").expect("write old blob");
        let new_blob = temp.path().join("new-blob");
        std::fs::write(&new_blob, b"v2").expect("write new blob");

        let local = temp.path().join("model.bin");
        std::os::unix::fs::symlink(&old_blob, &local).expect("symlink");

        materialize(&new_blob, &local).expect("materialize");

        assert_eq!(std::fs::read(&old_blob).expect("read old blob"), b"v1");
        assert_eq!(std::fs::read(&local).expect("read local"), b"v2");
    }
}
