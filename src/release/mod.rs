//! Release reconciliation.
//!
//! Brings the remote tag and release in line with the run configuration:
//!
//! 1. Look up the tag and any releases already attached to its name
//! 2. Decide what to do with the tag (see [`strategy`])
//! 3. Delete stale releases sharing the tag name
//! 4. Create, move or keep the tag, remembering how to undo it
//! 5. Create the release
//! 6. Upload each file, retrying per file
//! 7. Emit the `release-id` output
//!
//! Any fatal failure after step 4 runs the compensations explicitly: the
//! release (if created) is deleted, then the tag is restored. Compensation
//! failures are logged and never replace the original error.

mod assets;
mod retry;
mod strategy;
mod undo;

pub use assets::{asset_name, prepare_upload, upload_once, upload_with_retry};
pub use retry::{RetryError, RetryPolicy, retry_with_backoff};
pub use strategy::{TagAction, decide};
pub use undo::UndoAction;

use crate::config::ActionConfig;
use crate::error::{ReleaseError, Result};
use crate::github::{ForgeApi, GitRef, NewRelease, Release, ReleaseAsset};
use crate::output::{ActionOutput, RELEASE_ID};
use std::path::Path;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    /// Id of the created release
    pub release_id: u64,
    /// Browser URL of the release
    pub html_url: String,
    /// Uploaded assets, in upload order
    pub assets: Vec<ReleaseAsset>,
}

/// Drives one run against a forge
pub struct Reconciler<'a, F: ForgeApi> {
    forge: &'a F,
    config: &'a ActionConfig,
    retry: RetryPolicy,
    output: Option<ActionOutput>,
}

impl<'a, F: ForgeApi> Reconciler<'a, F> {
    /// Reconciler with the default upload retry policy
    pub fn new(forge: &'a F, config: &'a ActionConfig) -> Self {
        Self {
            forge,
            config,
            retry: RetryPolicy::default(),
            output: None,
        }
    }

    /// Override the upload retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Emit `release-id` to `output` once every upload succeeded
    pub fn with_output(mut self, output: ActionOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Run the full sequence
    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let tag = &self.config.tag;

        let existing = self.query_tag().await?;
        let stale = self.query_stale_releases().await?;

        let action = decide(tag, &self.config.strategy, existing.as_ref())?;
        log::info!(
            "Strategy {} with tag {}: {:?}",
            self.config.strategy.kind(),
            if existing.is_some() { "present" } else { "absent" },
            action
        );

        self.delete_stale_releases(&stale).await?;

        let undo = action
            .apply(self.forge, tag, &self.config.tag_message)
            .await?;

        let release = match self.forge.create_release(&self.new_release()).await {
            Ok(release) => release,
            Err(source) => {
                self.undo_tag(&undo).await;
                return Err(ReleaseError::ReleaseCreation {
                    tag: tag.clone(),
                    source,
                });
            }
        };
        log::info!("Created release {} ({})", release.id, release.html_url);

        let mut assets = Vec::with_capacity(self.config.files.len());
        for path in &self.config.files {
            match self.upload_file(&release, path).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    self.delete_created_release(&release).await;
                    self.undo_tag(&undo).await;
                    return Err(e);
                }
            }
        }

        if let Some(output) = &self.output {
            if let Err(e) = output.set(RELEASE_ID, &release.id.to_string()) {
                self.delete_created_release(&release).await;
                self.undo_tag(&undo).await;
                return Err(e);
            }
        }

        Ok(ReleaseOutcome {
            release_id: release.id,
            html_url: release.html_url,
            assets,
        })
    }

    /// `None` when the tag does not exist
    async fn query_tag(&self) -> Result<Option<GitRef>> {
        match self.forge.get_ref(&format!("tags/{}", self.config.tag)).await {
            Ok(git_ref) => Ok(Some(git_ref)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(source) => Err(ReleaseError::TagQuery {
                tag: self.config.tag.clone(),
                source,
            }),
        }
    }

    async fn query_stale_releases(&self) -> Result<Vec<Release>> {
        let releases = self
            .forge
            .list_releases()
            .await
            .map_err(|source| ReleaseError::ReleaseQuery {
                repository: self.config.repo.to_string(),
                source,
            })?;
        Ok(releases
            .into_iter()
            .filter(|release| release.tag_name == self.config.tag)
            .collect())
    }

    async fn delete_stale_releases(&self, stale: &[Release]) -> Result<()> {
        for release in stale {
            log::info!(
                "Deleting stale release {} for tag {}{}",
                release.id,
                release.tag_name,
                release
                    .created_at
                    .map(|at| format!(" (created {})", at.to_rfc3339()))
                    .unwrap_or_default()
            );
            self.forge
                .delete_release(release.id)
                .await
                .map_err(|source| ReleaseError::StaleRelease {
                    tag: self.config.tag.clone(),
                    release_id: release.id,
                    source,
                })?;
        }
        Ok(())
    }

    fn new_release(&self) -> NewRelease {
        NewRelease {
            tag_name: self.config.tag.clone(),
            name: self.config.title.clone(),
            body: self.config.body.clone(),
            draft: self.config.draft,
            prerelease: self.config.prerelease,
            discussion_category_name: self.config.discussion_category_name.clone(),
        }
    }

    async fn upload_file(&self, release: &Release, path: &Path) -> Result<ReleaseAsset> {
        let display_name = asset_name(path).unwrap_or_else(|| path.display().to_string());
        let upload = prepare_upload(path)
            .await
            .map_err(|source| ReleaseError::UploadFailed {
                asset: display_name,
                attempts: 0,
                source,
            })?;

        log::info!("Uploading {} ({} bytes)", upload.name, upload.size);
        let asset = upload_with_retry(self.forge, release, &upload, self.retry)
            .await
            .map_err(|e| ReleaseError::UploadFailed {
                asset: upload.name.clone(),
                attempts: e.attempts,
                source: e.last,
            })?;
        log::info!("Uploaded {}", asset.name);
        Ok(asset)
    }

    /// Best-effort: failures are logged
    async fn delete_created_release(&self, release: &Release) {
        if let Err(e) = self.forge.delete_release(release.id).await {
            log::error!("Failed to delete release {}: {}", release.id, e);
        } else {
            log::info!("Deleted release {}", release.id);
        }
    }

    /// Best-effort: failures are logged
    async fn undo_tag(&self, undo: &UndoAction) {
        if *undo == UndoAction::Noop {
            return;
        }
        match undo.run(self.forge).await {
            Ok(()) => log::info!("Undid tag change: {}", undo),
            Err(e) => log::error!("Failed to undo tag change ({}): {}", undo, e),
        }
    }
}
