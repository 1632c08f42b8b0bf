//! Forge API integration for release operations.
//!
//! `ForgeApi` is the seam between the reconciler and the remote service.
//! `GitHubClient` implements it over the GitHub REST API.

mod client;
mod types;

pub use client::{GitHubClient, DEFAULT_API_URL, REQUEST_TIMEOUT};
pub use types::{
    AssetUpload, GitObject, GitRef, NewRelease, NewTag, Release, ReleaseAsset, TagObject,
};

use crate::error::ForgeError;
use std::future::Future;

/// Result type for remote API calls
pub type ForgeResult<T> = std::result::Result<T, ForgeError>;

/// Remote operations the release flow consumes.
///
/// All calls are scoped to one repository. Ref names are given without the
/// leading `refs/` (e.g. `tags/v1.0.0`, `heads/main`) except for
/// [`ForgeApi::create_ref`], which takes the fully qualified name.
pub trait ForgeApi {
    /// Fetch a ref; a missing ref yields [`ForgeError::NotFound`]
    fn get_ref(&self, reference: &str) -> impl Future<Output = ForgeResult<GitRef>>;

    /// List every release in the repository, drafts included
    fn list_releases(&self) -> impl Future<Output = ForgeResult<Vec<Release>>>;

    /// Delete a release by id
    fn delete_release(&self, release_id: u64) -> impl Future<Output = ForgeResult<()>>;

    /// Point an existing ref at a new sha
    fn update_ref(
        &self,
        reference: &str,
        sha: &str,
        force: bool,
    ) -> impl Future<Output = ForgeResult<GitRef>>;

    /// Create an annotated tag object
    fn create_tag_object(&self, tag: &NewTag) -> impl Future<Output = ForgeResult<TagObject>>;

    /// Create a ref (`refs/tags/<tag>`) pointing at a sha
    fn create_ref(&self, full_reference: &str, sha: &str)
    -> impl Future<Output = ForgeResult<GitRef>>;

    /// Delete a ref
    fn delete_ref(&self, reference: &str) -> impl Future<Output = ForgeResult<()>>;

    /// Create a release
    fn create_release(&self, release: &NewRelease) -> impl Future<Output = ForgeResult<Release>>;

    /// List the assets attached to a release
    fn list_release_assets(
        &self,
        release_id: u64,
    ) -> impl Future<Output = ForgeResult<Vec<ReleaseAsset>>>;

    /// Delete a release asset by id
    fn delete_release_asset(&self, asset_id: u64) -> impl Future<Output = ForgeResult<()>>;

    /// Stream a local file to the release as a named asset
    fn upload_release_asset(
        &self,
        release: &Release,
        upload: &AssetUpload,
    ) -> impl Future<Output = ForgeResult<ReleaseAsset>>;
}
