//! Compensating actions that restore the tag to its pre-run state.

use crate::github::{ForgeApi, ForgeResult};
use std::fmt;

/// How to put the tag back if a later step fails.
///
/// Exactly one is in effect per run; it is executed only on a fatal failure
/// after the tag was mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// The tag was not touched
    Noop,
    /// The ref was moved; point it back at `sha`
    RestoreRef {
        /// Ref name without `refs/` (e.g. `tags/v1.0.0`)
        reference: String,
        /// Sha the ref pointed at before the run
        sha: String,
    },
    /// The ref was created by this run; delete it
    DeleteRef {
        /// Ref name without `refs/`
        reference: String,
    },
}

impl UndoAction {
    /// Execute the compensating call
    pub async fn run<F: ForgeApi>(&self, forge: &F) -> ForgeResult<()> {
        match self {
            UndoAction::Noop => Ok(()),
            UndoAction::RestoreRef { reference, sha } => {
                forge.update_ref(reference, sha, true).await?;
                Ok(())
            }
            UndoAction::DeleteRef { reference } => forge.delete_ref(reference).await,
        }
    }
}

impl fmt::Display for UndoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoAction::Noop => f.write_str("leave tag untouched"),
            UndoAction::RestoreRef { reference, sha } => {
                write!(f, "restore {reference} to {sha}")
            }
            UndoAction::DeleteRef { reference } => write!(f, "delete {reference}"),
        }
    }
}
