//! Tag strategy decision and tag mutation.
//!
//! | Strategy         | Tag absent       | Tag present              |
//! |------------------|------------------|--------------------------|
//! | fail-fast        | create tag + ref | error: tag exists        |
//! | replace          | create tag + ref | force-move ref to target |
//! | use-existing-tag | error: not found | keep as-is               |

use super::undo::UndoAction;
use crate::config::TagStrategy;
use crate::error::{ReleaseError, Result};
use crate::github::{ForgeApi, GitRef, NewTag};

/// What to do with the tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAction {
    /// Create an annotated tag object and its ref
    Create {
        /// Commit to tag
        target_sha: String,
    },
    /// Force-move the existing ref
    Update {
        /// Sha the ref points at now
        original_sha: String,
        /// Sha to move it to
        target_sha: String,
    },
    /// Leave the existing tag alone
    Keep {
        /// Sha the ref points at
        sha: String,
    },
}

/// Decide the tag action from the strategy and the remote tag state
pub fn decide(tag: &str, strategy: &TagStrategy, existing: Option<&GitRef>) -> Result<TagAction> {
    match (strategy, existing) {
        (TagStrategy::Replace { target_sha } | TagStrategy::FailFast { target_sha }, None) => {
            Ok(TagAction::Create {
                target_sha: target_sha.clone(),
            })
        }
        (TagStrategy::FailFast { .. }, Some(_)) => Err(ReleaseError::TagExists {
            tag: tag.to_string(),
        }),
        (TagStrategy::Replace { target_sha }, Some(current)) => Ok(TagAction::Update {
            original_sha: current.object.sha.clone(),
            target_sha: target_sha.clone(),
        }),
        (TagStrategy::UseExistingTag, Some(current)) => Ok(TagAction::Keep {
            sha: current.object.sha.clone(),
        }),
        (TagStrategy::UseExistingTag, None) => Err(ReleaseError::TagNotFound {
            tag: tag.to_string(),
        }),
    }
}

impl TagAction {
    /// Perform the mutation and return the action that reverts it.
    ///
    /// A failure here is fatal and leaves nothing to undo.
    pub async fn apply<F: ForgeApi>(&self, forge: &F, tag: &str, message: &str) -> Result<UndoAction> {
        let reference = format!("tags/{tag}");

        match self {
            TagAction::Create { target_sha } => {
                let object = forge
                    .create_tag_object(&NewTag::for_commit(tag, message, target_sha))
                    .await
                    .map_err(|source| ReleaseError::TagMutation {
                        tag: tag.to_string(),
                        operation: "create",
                        source,
                    })?;
                forge
                    .create_ref(&format!("refs/{reference}"), &object.sha)
                    .await
                    .map_err(|source| ReleaseError::TagMutation {
                        tag: tag.to_string(),
                        operation: "create ref for",
                        source,
                    })?;
                log::info!("Created tag {} at {}", tag, target_sha);
                Ok(UndoAction::DeleteRef { reference })
            }
            TagAction::Update {
                original_sha,
                target_sha,
            } => {
                forge
                    .update_ref(&reference, target_sha, true)
                    .await
                    .map_err(|source| ReleaseError::TagMutation {
                        tag: tag.to_string(),
                        operation: "update",
                        source,
                    })?;
                log::info!("Moved tag {} from {} to {}", tag, original_sha, target_sha);
                Ok(UndoAction::RestoreRef {
                    reference,
                    sha: original_sha.clone(),
                })
            }
            TagAction::Keep { sha } => {
                log::info!("Using existing tag {} at {}", tag, sha);
                Ok(UndoAction::Noop)
            }
        }
    }
}
