//! Release Tagger - create or update a tag and release, then upload assets.

use release_tagger::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    process::exit(cli::run().await);
}
