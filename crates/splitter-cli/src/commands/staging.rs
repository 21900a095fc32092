//! Concurrent copying of inputs into the uploads folder.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

/// An input copied into the uploads folder.
pub struct StagedFile {
    pub original_filename: String,
    pub path: PathBuf,
}

/// Copy every input into `upload_dir` as `{uuid}_{name}`.
///
/// All copies run concurrently. If any copy fails, the ones that succeeded
/// are removed again and the first error is returned.
pub async fn stage_files(inputs: &[PathBuf], upload_dir: &Path) -> anyhow::Result<Vec<StagedFile>> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", upload_dir.display()))?;

    let results = join_all(inputs.iter().map(|input| stage_one(input, upload_dir))).await;

    let mut staged = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(file) => staged.push(file),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        remove_staged(&staged).await;
        return Err(e);
    }
    Ok(staged)
}

async fn stage_one(input: &Path, upload_dir: &Path) -> anyhow::Result<StagedFile> {
    let original_filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file: {}", input.display()))?;
    let path = upload_dir.join(format!("{}_{}", Uuid::new_v4(), original_filename));

    tokio::fs::copy(input, &path)
        .await
        .with_context(|| format!("Failed to stage {}", input.display()))?;
    debug!("Staged {} as {}", input.display(), path.display());

    Ok(StagedFile {
        original_filename,
        path,
    })
}

/// Best-effort removal of staged copies.
pub async fn remove_staged(files: &[StagedFile]) {
    for file in files {
        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            warn!("Failed to remove staged {}: {}", file.path.display(), e);
        }
    }
}
