//! Command line argument parsing.
//!
//! Every action input is a flag that falls back to the `INPUT_<NAME>`
//! environment variable the CI runner sets. Inputs stay raw strings here;
//! validation happens in [`crate::config`] so errors can name the input.

use crate::github::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;

/// Create or update a tag and release, then upload assets to it
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "release_tagger",
    version,
    about = "Create or update a tag and release, then upload assets to it",
    long_about = "Create or update a tag and an accompanying release, then upload files as release assets.

Inputs are read from flags or from INPUT_* environment variables, e.g.:
  INPUT_TOKEN=... INPUT_REPOSITORY=octo/widgets INPUT_TAG=nightly \\
  INPUT_STRATEGY=replace INPUT_TARGET=refs/heads/main \\
  INPUT_TITLE-SOURCE=literal INPUT_TITLE=Nightly INPUT_BODY-SOURCE=file INPUT_BODY=notes.md \\
  release_tagger"
)]
pub struct Args {
    /// API token with write access to the repository
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Tag name
    #[arg(long, env = "INPUT_TAG")]
    pub tag: Option<String>,

    /// Annotated tag message (defaults to the tag name)
    #[arg(long, env = "INPUT_TAG-MESSAGE")]
    pub tag_message: Option<String>,

    /// replace, fail-fast or use-existing-tag
    #[arg(long, env = "INPUT_STRATEGY")]
    pub strategy: Option<String>,

    /// Commit sha or ref path (e.g. refs/heads/main) to tag
    #[arg(long, env = "INPUT_TARGET")]
    pub target: Option<String>,

    /// Source of the title: literal, file or env
    #[arg(long, env = "INPUT_TITLE-SOURCE")]
    pub title_source: Option<String>,

    /// Title text, file path or variable name
    #[arg(long, env = "INPUT_TITLE")]
    pub title: Option<String>,

    /// Source of the body: literal, file or env
    #[arg(long, env = "INPUT_BODY-SOURCE")]
    pub body_source: Option<String>,

    /// Body text, file path or variable name
    #[arg(long, env = "INPUT_BODY")]
    pub body: Option<String>,

    /// Mark the release as a pre-release (true/false)
    #[arg(long, env = "INPUT_PRERELEASE")]
    pub prerelease: Option<String>,

    /// Create the release as a draft (true/false)
    #[arg(long, env = "INPUT_DRAFT")]
    pub draft: Option<String>,

    /// Discussion category for the release announcement
    #[arg(long, env = "INPUT_DISCUSSION-CATEGORY-NAME")]
    pub discussion_category_name: Option<String>,

    /// Newline-delimited glob patterns of files to upload
    #[arg(long, env = "INPUT_FILES")]
    pub files: Option<String>,

    /// Base URL of the REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File that receives `name=value` outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
