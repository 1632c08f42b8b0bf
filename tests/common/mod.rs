//! In-memory forge used by the integration tests.

#![allow(dead_code)]

use release_tagger::ForgeError;
use release_tagger::config::{ActionConfig, RepoCoords, TagStrategy};
use release_tagger::github::{
    AssetUpload, ForgeApi, ForgeResult, GitObject, GitRef, NewRelease, NewTag, Release,
    ReleaseAsset, TagObject,
};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

/// Mutable remote state plus a log of every call
#[derive(Debug, Default)]
pub struct State {
    /// ref name without `refs/` -> sha
    pub refs: BTreeMap<String, String>,
    pub releases: Vec<Release>,
    pub assets: BTreeMap<u64, Vec<ReleaseAsset>>,
    pub tag_objects: Vec<NewTag>,
    pub created_releases: Vec<NewRelease>,
    pub calls: Vec<String>,
    /// Operations that always fail with HTTP 500
    pub failing: HashSet<&'static str>,
    /// Upcoming upload attempts that fail after leaving a partial asset behind
    pub upload_failures: u32,
    pub upload_attempts: u32,
    next_id: u64,
}

#[derive(Debug, Default)]
pub struct FakeForge {
    state: Mutex<State>,
}

impl FakeForge {
    pub fn new() -> Self {
        let forge = Self::default();
        forge.state().next_id = 100;
        forge
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake forge state poisoned")
    }

    pub fn with_ref(self, reference: &str, sha: &str) -> Self {
        self.state().refs.insert(reference.to_string(), sha.to_string());
        self
    }

    pub fn with_release(self, id: u64, tag: &str) -> Self {
        self.state().releases.push(release(id, tag));
        self
    }

    pub fn failing(self, operation: &'static str) -> Self {
        self.state().failing.insert(operation);
        self
    }

    pub fn with_upload_failures(self, count: u32) -> Self {
        self.state().upload_failures = count;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Names of calls (first word) in order
    pub fn operations(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn enter(&self, operation: &'static str, detail: impl std::fmt::Display) -> ForgeResult<()> {
        let mut state = self.state();
        state.calls.push(format!("{operation} {detail}"));
        if state.failing.contains(operation) {
            return Err(ForgeError::Status {
                operation,
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

pub fn release(id: u64, tag: &str) -> Release {
    Release {
        id,
        tag_name: tag.to_string(),
        name: Some(format!("Release {tag}")),
        body: None,
        draft: false,
        prerelease: false,
        upload_url: format!(
            "https://uploads.example.test/repos/octo/widgets/releases/{id}/assets{{?name,label}}"
        ),
        html_url: format!("https://example.test/octo/widgets/releases/{id}"),
        created_at: None,
    }
}

fn git_ref(reference: &str, sha: &str) -> GitRef {
    GitRef {
        name: format!("refs/{reference}"),
        object: GitObject {
            sha: sha.to_string(),
            kind: "commit".to_string(),
        },
    }
}

impl ForgeApi for FakeForge {
    async fn get_ref(&self, reference: &str) -> ForgeResult<GitRef> {
        self.enter("get-ref", reference)?;
        self.state()
            .refs
            .get(reference)
            .map(|sha| git_ref(reference, sha))
            .ok_or(ForgeError::NotFound { operation: "get-ref" })
    }

    async fn list_releases(&self) -> ForgeResult<Vec<Release>> {
        self.enter("list-releases", "")?;
        Ok(self.state().releases.clone())
    }

    async fn delete_release(&self, release_id: u64) -> ForgeResult<()> {
        self.enter("delete-release", release_id)?;
        let mut state = self.state();
        let before = state.releases.len();
        state.releases.retain(|r| r.id != release_id);
        if state.releases.len() == before {
            return Err(ForgeError::NotFound {
                operation: "delete-release",
            });
        }
        state.assets.remove(&release_id);
        Ok(())
    }

    async fn update_ref(&self, reference: &str, sha: &str, _force: bool) -> ForgeResult<GitRef> {
        self.enter("update-ref", format!("{reference} {sha}"))?;
        let mut state = self.state();
        match state.refs.get_mut(reference) {
            Some(current) => {
                *current = sha.to_string();
                Ok(git_ref(reference, sha))
            }
            None => Err(ForgeError::Status {
                operation: "update-ref",
                status: 422,
                message: "Reference does not exist".to_string(),
            }),
        }
    }

    async fn create_tag_object(&self, tag: &NewTag) -> ForgeResult<TagObject> {
        self.enter("create-tag-object", &tag.tag)?;
        self.state().tag_objects.push(tag.clone());
        Ok(TagObject {
            sha: format!("tagobj-{}", tag.object),
            tag: tag.tag.clone(),
        })
    }

    async fn create_ref(&self, full_reference: &str, sha: &str) -> ForgeResult<GitRef> {
        self.enter("create-ref", format!("{full_reference} {sha}"))?;
        let reference = full_reference.trim_start_matches("refs/").to_string();
        let mut state = self.state();
        if state.refs.contains_key(&reference) {
            return Err(ForgeError::Status {
                operation: "create-ref",
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }
        state.refs.insert(reference.clone(), sha.to_string());
        Ok(git_ref(&reference, sha))
    }

    async fn delete_ref(&self, reference: &str) -> ForgeResult<()> {
        self.enter("delete-ref", reference)?;
        self.state()
            .refs
            .remove(reference)
            .map(|_| ())
            .ok_or(ForgeError::NotFound {
                operation: "delete-ref",
            })
    }

    async fn create_release(&self, new: &NewRelease) -> ForgeResult<Release> {
        self.enter("create-release", &new.tag_name)?;
        let mut state = self.state();
        state.next_id += 1;
        let mut created = release(state.next_id, &new.tag_name);
        created.name = Some(new.name.clone());
        created.body = Some(new.body.clone());
        created.draft = new.draft;
        created.prerelease = new.prerelease;
        state.releases.push(created.clone());
        state.created_releases.push(new.clone());
        Ok(created)
    }

    async fn list_release_assets(&self, release_id: u64) -> ForgeResult<Vec<ReleaseAsset>> {
        self.enter("list-release-assets", release_id)?;
        Ok(self
            .state()
            .assets
            .get(&release_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_release_asset(&self, asset_id: u64) -> ForgeResult<()> {
        self.enter("delete-release-asset", asset_id)?;
        for assets in self.state().assets.values_mut() {
            assets.retain(|a| a.id != asset_id);
        }
        Ok(())
    }

    async fn upload_release_asset(
        &self,
        release: &Release,
        upload: &AssetUpload,
    ) -> ForgeResult<ReleaseAsset> {
        self.enter("upload-release-asset", &upload.name)?;
        let mut state = self.state();
        state.upload_attempts += 1;

        let assets = state.assets.get(&release.id).cloned().unwrap_or_default();
        if assets.iter().any(|a| a.name == upload.name) {
            return Err(ForgeError::Status {
                operation: "upload-release-asset",
                status: 422,
                message: "already_exists".to_string(),
            });
        }

        state.next_id += 1;
        let asset = ReleaseAsset {
            id: state.next_id,
            name: upload.name.clone(),
            size: upload.size,
            browser_download_url: format!("https://example.test/download/{}", upload.name),
        };
        state.assets.entry(release.id).or_default().push(asset.clone());

        if state.upload_failures > 0 {
            // the asset record stays behind, as after an interrupted upload
            state.upload_failures -= 1;
            return Err(ForgeError::Status {
                operation: "upload-release-asset",
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }
        Ok(asset)
    }
}

pub fn config(strategy: TagStrategy, files: Vec<PathBuf>) -> ActionConfig {
    ActionConfig {
        repo: RepoCoords {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
        },
        tag: "v1.0.0".to_string(),
        tag_message: "Release v1.0.0".to_string(),
        strategy,
        title: "Widgets 1.0".to_string(),
        body: "Notes".to_string(),
        prerelease: false,
        draft: false,
        discussion_category_name: None,
        files,
    }
}

pub fn replace(sha: &str) -> TagStrategy {
    TagStrategy::Replace {
        target_sha: sha.to_string(),
    }
}

pub fn fail_fast(sha: &str) -> TagStrategy {
    TagStrategy::FailFast {
        target_sha: sha.to_string(),
    }
}

/// Write `files` (name, contents) into a fresh temp dir
pub fn scratch_files(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = files
        .iter()
        .map(|(name, contents)| {
            let path = dir.path().join(name);
            std::fs::write(&path, contents).expect("write scratch file");
            path
        })
        .collect();
    (dir, paths)
}
