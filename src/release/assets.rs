//! Release asset upload.

use super::retry::{RetryError, RetryPolicy, retry_with_backoff};
use crate::error::ForgeError;
use crate::github::{AssetUpload, ForgeApi, ForgeResult, Release, ReleaseAsset};
use std::path::Path;

/// Asset name for a local file: its base name, without directories
pub fn asset_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

/// Stat a local file and describe its upload
pub async fn prepare_upload(path: &Path) -> ForgeResult<AssetUpload> {
    let name = asset_name(path).ok_or_else(|| ForgeError::Io {
        operation: "read-asset",
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no usable file name in {}", path.display()),
        ),
    })?;
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| ForgeError::Io {
            operation: "read-asset",
            source,
        })?;

    Ok(AssetUpload {
        name,
        path: path.to_path_buf(),
        size: metadata.len(),
    })
}

/// One upload attempt.
///
/// The forge refuses a name that already exists on the release, so any asset
/// with the same name (e.g. left by a failed earlier attempt) is deleted first.
pub async fn upload_once<F: ForgeApi>(
    forge: &F,
    release: &Release,
    upload: &AssetUpload,
) -> ForgeResult<ReleaseAsset> {
    for stale in forge
        .list_release_assets(release.id)
        .await?
        .into_iter()
        .filter(|asset| asset.name == upload.name)
    {
        log::info!("Deleting existing asset {} ({})", stale.name, stale.id);
        forge.delete_release_asset(stale.id).await?;
    }

    forge.upload_release_asset(release, upload).await
}

/// Upload with the policy's retries
pub async fn upload_with_retry<F: ForgeApi>(
    forge: &F,
    release: &Release,
    upload: &AssetUpload,
    policy: RetryPolicy,
) -> Result<ReleaseAsset, RetryError<ForgeError>> {
    let operation_name = format!("Upload of {}", upload.name);
    retry_with_backoff(policy, &operation_name, move |_| upload_once(forge, release, upload)).await
}
