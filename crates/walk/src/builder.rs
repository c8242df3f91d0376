use crate::error::WalkError;
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a traversal of one tree source.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
}

impl WalkBuilder {
    /// Creates a builder that will traverse `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            include_root: true,
        }
    }

    /// Controls whether the root itself is yielded before its children.
    ///
    /// Commits record the root directory's metadata, so this defaults to
    /// `true`. When disabled, traversal starts with the root's children.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Builds a [`Walker`], reading the root's metadata eagerly.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.include_root)
    }
}
