//! Run configuration resolved from action inputs.
//!
//! Every input is validated here before the first remote mutation. The only
//! remote call made during resolution is the read-only ref lookup used when
//! `target` names a ref instead of a sha.

mod files;
mod source;

pub use files::expand_patterns;
pub use source::TextSource;

use crate::cli::Args;
use crate::error::ConfigError;
use crate::github::ForgeApi;
use std::fmt;
use std::path::PathBuf;

/// Policy applied when the tag already exists (input form)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Retarget an existing tag
    Replace,
    /// Abort if the tag exists
    FailFast,
    /// Release an existing tag as-is
    UseExistingTag,
}

impl Strategy {
    /// Parse the `strategy` input
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Strategy::Replace),
            "fail-fast" => Ok(Strategy::FailFast),
            "use-existing-tag" => Ok(Strategy::UseExistingTag),
            other => Err(ConfigError::InvalidParameter {
                name: "strategy",
                reason: format!(
                    "expected one of 'replace', 'fail-fast', 'use-existing-tag', got '{other}'"
                ),
            }),
        }
    }

    /// Input spelling of the strategy
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Replace => "replace",
            Strategy::FailFast => "fail-fast",
            Strategy::UseExistingTag => "use-existing-tag",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved strategy. Only the tag-creating variants carry a target sha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStrategy {
    /// Create the tag, or force-move an existing one to `target_sha`
    Replace {
        /// Commit to tag
        target_sha: String,
    },
    /// Create the tag; fail if it already exists
    FailFast {
        /// Commit to tag
        target_sha: String,
    },
    /// Leave the existing tag untouched
    UseExistingTag,
}

impl TagStrategy {
    /// Input form of this strategy
    pub fn kind(&self) -> Strategy {
        match self {
            TagStrategy::Replace { .. } => Strategy::Replace,
            TagStrategy::FailFast { .. } => Strategy::FailFast,
            TagStrategy::UseExistingTag => Strategy::UseExistingTag,
        }
    }
}

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoords {
    /// Owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoCoords {
    /// Parse `owner/repo`
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidParameter {
                name: "repository",
                reason: format!("expected 'owner/repo', got '{}'", value.trim()),
            }),
        }
    }
}

impl fmt::Display for RepoCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Immutable configuration of one run
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Target repository
    pub repo: RepoCoords,
    /// Tag name
    pub tag: String,
    /// Annotated tag message
    pub tag_message: String,
    /// Tag strategy, with the target sha where one applies
    pub strategy: TagStrategy,
    /// Release title
    pub title: String,
    /// Release body
    pub body: String,
    /// Mark the release as a pre-release
    pub prerelease: bool,
    /// Create the release as a draft
    pub draft: bool,
    /// Discussion category to open a discussion in
    pub discussion_category_name: Option<String>,
    /// Files to upload, in upload order
    pub files: Vec<PathBuf>,
}

impl ActionConfig {
    /// Validate `args` and resolve them into a run configuration.
    ///
    /// Local validation runs first; the target ref lookup (if any) runs last.
    pub async fn resolve<F: ForgeApi>(
        args: &Args,
        repo: RepoCoords,
        forge: &F,
    ) -> Result<Self, ConfigError> {
        let tag = required(&args.tag, "tag")?.trim().to_string();
        let strategy = Strategy::parse(required(&args.strategy, "strategy")?)?;
        let target = present(&args.target).map(str::trim);

        match (strategy, target) {
            (Strategy::UseExistingTag, Some(_)) => {
                return Err(ConfigError::IncompatibleParameter {
                    name: "target",
                    strategy: Strategy::UseExistingTag.as_str(),
                });
            }
            (Strategy::Replace | Strategy::FailFast, None) => {
                return Err(ConfigError::MissingParameter { name: "target" });
            }
            _ => {}
        }

        let tag_message = present(&args.tag_message)
            .map(str::to_string)
            .unwrap_or_else(|| tag.clone());
        let title = resolve_text(&args.title_source, &args.title, "title-source", "title").await?;
        let body = resolve_text(&args.body_source, &args.body, "body-source", "body").await?;
        let prerelease = parse_bool(&args.prerelease, "prerelease")?;
        let draft = parse_bool(&args.draft, "draft")?;
        let discussion_category_name =
            present(&args.discussion_category_name).map(|s| s.trim().to_string());
        let files = present(&args.files)
            .map(expand_patterns)
            .transpose()?
            .unwrap_or_default();

        let strategy = match (strategy, target) {
            (Strategy::Replace, Some(target)) => TagStrategy::Replace {
                target_sha: resolve_target(forge, target).await?,
            },
            (Strategy::FailFast, Some(target)) => TagStrategy::FailFast {
                target_sha: resolve_target(forge, target).await?,
            },
            _ => TagStrategy::UseExistingTag,
        };

        Ok(Self {
            repo,
            tag,
            tag_message,
            strategy,
            title,
            body,
            prerelease,
            draft,
            discussion_category_name,
            files,
        })
    }
}

/// Validate the inputs needed before a client can be built
pub fn resolve_access(args: &Args) -> Result<(String, RepoCoords), ConfigError> {
    let token = required(&args.token, "token")?.trim().to_string();
    let repo = RepoCoords::parse(required(&args.repository, "repository")?)?;
    Ok((token, repo))
}

/// Resolve `target` to a sha.
///
/// A value containing `/` is a ref path (a leading `refs/` is dropped) and is
/// looked up remotely; anything else is already a sha.
pub async fn resolve_target<F: ForgeApi>(forge: &F, target: &str) -> Result<String, ConfigError> {
    if !target.contains('/') {
        return Ok(target.to_string());
    }

    let reference = target.strip_prefix("refs/").unwrap_or(target);
    let git_ref = forge
        .get_ref(reference)
        .await
        .map_err(|source| ConfigError::TargetLookup {
            target: target.to_string(),
            source,
        })?;
    log::info!("Resolved target {} to {}", target, git_ref.object.sha);
    Ok(git_ref.object.sha)
}

/// Empty inputs count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    present(value).ok_or(ConfigError::MissingParameter { name })
}

fn parse_bool(value: &Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    match present(value).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v == "true" => Ok(true),
        Some(v) if v == "false" => Ok(false),
        Some(v) => Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected 'true' or 'false', got '{v}'"),
        }),
    }
}

async fn resolve_text(
    source: &Option<String>,
    value: &Option<String>,
    source_name: &'static str,
    value_name: &'static str,
) -> Result<String, ConfigError> {
    let source = TextSource::parse(source_name, required(source, source_name)?)?;
    match source {
        // An empty literal is a legitimate (empty) title or body
        TextSource::Literal => Ok(value.clone().unwrap_or_default()),
        TextSource::File | TextSource::Env => {
            let value = required(value, value_name)?.trim();
            source.resolve(value_name, value).await
        }
    }
}
