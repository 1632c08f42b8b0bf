//! # Release Tagger
//!
//! CI action that creates or updates a tag and an accompanying release on a
//! git forge, then uploads local files as release assets.
//!
//! ## Features
//!
//! - **Tag strategies**: `replace` moves an existing tag, `fail-fast` refuses to
//!   touch one, `use-existing-tag` releases it as-is
//! - **Stale release cleanup**: releases already attached to the tag name are
//!   replaced by the new one
//! - **Retried uploads**: per-file retries with truncated exponential backoff;
//!   same-named leftovers from failed attempts are removed first
//! - **Compensation**: if a later step fails, the partial release is deleted and
//!   the tag restored to its previous state
//!
//! ## Usage
//!
//! ```bash
//! INPUT_TOKEN=... INPUT_REPOSITORY=octo/widgets INPUT_TAG=nightly \
//! INPUT_STRATEGY=replace INPUT_TARGET=refs/heads/main \
//! INPUT_TITLE-SOURCE=literal INPUT_TITLE=Nightly \
//! INPUT_BODY-SOURCE=literal INPUT_BODY= INPUT_FILES='dist/*' release_tagger
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod output;
pub mod release;

// Re-export main types for public API
pub use cli::Args;
pub use config::{ActionConfig, RepoCoords, Strategy, TagStrategy};
pub use error::{ConfigError, ForgeError, ReleaseError, Result};
pub use github::{ForgeApi, GitHubClient};
pub use release::{Reconciler, ReleaseOutcome, RetryPolicy, UndoAction};
