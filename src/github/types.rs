//! Wire types exchanged with the forge REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A git reference such as `refs/tags/v1.0.0`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    /// Fully qualified ref name
    #[serde(rename = "ref")]
    pub name: String,
    /// Object the ref points at
    pub object: GitObject,
}

/// Object a ref points at
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitObject {
    /// Object sha
    pub sha: String,
    /// Object type (`commit`, `tag`, ...)
    #[serde(rename = "type")]
    pub kind: String,
}

/// Annotated tag object returned by create-tag-object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagObject {
    /// Sha of the tag object itself
    pub sha: String,
    /// Tag name
    pub tag: String,
}

/// A release on the forge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release identifier
    pub id: u64,
    /// Tag the release is attached to
    pub tag_name: String,
    /// Release title
    #[serde(default)]
    pub name: Option<String>,
    /// Release description
    #[serde(default)]
    pub body: Option<String>,
    /// Draft flag
    #[serde(default)]
    pub draft: bool,
    /// Pre-release flag
    #[serde(default)]
    pub prerelease: bool,
    /// Upload endpoint template (`.../assets{?name,label}`)
    pub upload_url: String,
    /// Browser URL
    #[serde(default)]
    pub html_url: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An asset attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// Asset identifier
    pub id: u64,
    /// File name of the asset
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Download URL
    #[serde(default)]
    pub browser_download_url: String,
}

/// Request body for create-tag-object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTag {
    /// Tag name
    pub tag: String,
    /// Annotation message
    pub message: String,
    /// Sha of the tagged object
    pub object: String,
    /// Type of the tagged object
    #[serde(rename = "type")]
    pub kind: String,
}

impl NewTag {
    /// Annotated tag pointing at a commit
    pub fn for_commit(tag: &str, message: &str, sha: &str) -> Self {
        Self {
            tag: tag.to_string(),
            message: message.to_string(),
            object: sha.to_string(),
            kind: "commit".to_string(),
        }
    }
}

/// Request body for create-release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    /// Tag to attach the release to
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release description
    pub body: String,
    /// Draft flag
    pub draft: bool,
    /// Pre-release flag
    pub prerelease: bool,
    /// Discussion category to open a discussion in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_category_name: Option<String>,
}

/// A local file to upload as a release asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// Asset name (file base name)
    pub name: String,
    /// Local path of the file
    pub path: PathBuf,
    /// Size in bytes, sent as content-length
    pub size: u64,
}
