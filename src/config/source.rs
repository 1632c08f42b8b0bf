//! Text inputs that may come from a literal, a file, or an environment variable.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Where a text input's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// The input value is the text itself
    Literal,
    /// The input value is a path to a UTF-8 file
    File,
    /// The input value names an environment variable
    Env,
}

impl TextSource {
    /// Parse a `*-source` input
    pub fn parse(name: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(TextSource::Literal),
            "file" => Ok(TextSource::File),
            "env" => Ok(TextSource::Env),
            other => Err(ConfigError::InvalidParameter {
                name,
                reason: format!("expected one of 'literal', 'file', 'env', got '{other}'"),
            }),
        }
    }

    /// Resolve `value` to text according to this source.
    ///
    /// File contents are returned verbatim, trailing newline included.
    pub async fn resolve(self, name: &'static str, value: &str) -> Result<String, ConfigError> {
        match self {
            TextSource::Literal => Ok(value.to_string()),
            TextSource::File => {
                let path = PathBuf::from(value);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| ConfigError::ReadFile { name, path, source })
            }
            TextSource::Env => std::env::var(value).map_err(|_| ConfigError::MissingEnvironment {
                name,
                variable: value.to_string(),
            }),
        }
    }
}
