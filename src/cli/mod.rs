//! Command line interface for release_tagger.
//!
//! Parses the action inputs, runs the reconciler, reports the outcome and
//! maps it to a process exit code.

mod args;
mod output;
mod retry_config;

pub use args::Args;
pub use output::OutputManager;
pub use retry_config::{DEFAULT_MAX_DELAY_MS, DEFAULT_UPLOAD_ATTEMPTS, RetryConfig};

use crate::config::{ActionConfig, resolve_access};
use crate::error::{ConfigError, Result, cause_chain};
use crate::github::GitHubClient;
use crate::output::ActionOutput;
use crate::release::{Reconciler, ReleaseOutcome};

/// Main CLI entry point; returns the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    let output = OutputManager::new();

    match execute(&args).await {
        Ok(outcome) => {
            if let Err(e) = output.success(&format!(
                "Release {} published with {} asset(s): {}",
                outcome.release_id,
                outcome.assets.len(),
                outcome.html_url
            )) {
                log::warn!("Failed to print release summary: {}", e);
            }
            0
        }
        Err(e) => {
            output.error_chain(&cause_chain(&e));
            for suggestion in e.recovery_suggestions() {
                output.hint(&suggestion);
            }
            1
        }
    }
}

/// Resolve configuration, reconcile, and emit the release id
pub async fn execute(args: &Args) -> Result<ReleaseOutcome> {
    let (token, repo) = resolve_access(args)?;
    let client = GitHubClient::new(&args.api_url, repo.clone(), &token).map_err(ConfigError::Client)?;
    let config = ActionConfig::resolve(args, repo, &client).await?;

    log::info!(
        "Releasing {} on {} (strategy {})",
        config.tag,
        config.repo,
        config.strategy.kind()
    );

    let retry = RetryConfig::from_env();
    let outcome = Reconciler::new(&client, &config)
        .with_retry(retry.upload_policy())
        .with_output(ActionOutput::new(args.output_file.clone()))
        .run()
        .await?;

    Ok(outcome)
}
