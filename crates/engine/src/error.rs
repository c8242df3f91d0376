//! Error type returned by [`commit_preview`](crate::commit_preview).

use std::io;

use filters::LoadError;
use metadata::InvalidOwnerOverride;
use thiserror::Error;
use walk::WalkError;

use crate::options::{TreeKind, TreeSpecError};

/// Exit code for usage and configuration failures.
pub const CONFIG_EXIT_CODE: i32 = 1;
/// Exit code when a tree source cannot be read.
pub const WALK_EXIT_CODE: i32 = 2;
/// Exit code when strict mode finds directives that matched nothing.
pub const LEFTOVER_EXIT_CODE: i32 = 3;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure that aborts a commit preview before any manifest is produced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No tree sources were configured.
    #[error("no tree sources given")]
    NoTrees,
    /// The working directory, used as the default tree, is unavailable.
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
    /// A tree argument could not be parsed.
    #[error(transparent)]
    TreeSpec(#[from] TreeSpecError),
    /// The tree kind needs a repository and cannot be previewed here.
    #[error("tree source '{kind}={value}' is not supported; only dir= sources can be walked")]
    UnsupportedTreeSource {
        /// Kind of the rejected source.
        kind: TreeKind,
        /// Value of the rejected source.
        value: String,
    },
    /// The owner override is outside the accepted range.
    #[error(transparent)]
    Owner(#[from] InvalidOwnerOverride),
    /// A statoverride or skip-list file failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Walking a tree source failed.
    #[error(transparent)]
    Walk(#[from] WalkError),
}

impl EngineError {
    /// Process exit code matching the failure class.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Walk(_) => WALK_EXIT_CODE,
            Self::NoTrees
            | Self::CurrentDir(_)
            | Self::TreeSpec(_)
            | Self::UnsupportedTreeSource { .. }
            | Self::Owner(_)
            | Self::Load(_) => CONFIG_EXIT_CODE,
        }
    }
}
