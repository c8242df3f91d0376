use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error returned when a traversal cannot continue.
///
/// A walker that has produced an error yields nothing further.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) const fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::RootMetadata { path, source })
    }

    pub(crate) const fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) const fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) const fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) const fn current_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::CurrentDir { path, source })
    }

    /// Returns the specific failure that terminated traversal.
    #[must_use]
    pub const fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    ///
    /// let error = match WalkBuilder::new("./definitely_missing_tree").build() {
    ///     Ok(_) => panic!("missing root yields error"),
    ///     Err(error) => error,
    /// };
    /// assert!(error.path().ends_with("definitely_missing_tree"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkErrorKind::RootMetadata { path, source } => {
                write!(f, "cannot stat tree root '{}': {}", path.display(), source)
            }
            WalkErrorKind::ReadDir { path, source } => {
                write!(f, "cannot list directory '{}': {}", path.display(), source)
            }
            WalkErrorKind::ReadDirEntry { path, source } => {
                write!(f, "cannot read entry in '{}': {}", path.display(), source)
            }
            WalkErrorKind::Metadata { path, source } => {
                write!(f, "cannot stat '{}': {}", path.display(), source)
            }
            WalkErrorKind::CurrentDir { path, source } => {
                write!(
                    f,
                    "cannot resolve relative tree root '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WalkErrorKind::RootMetadata { source, .. }
            | WalkErrorKind::ReadDir { source, .. }
            | WalkErrorKind::ReadDirEntry { source, .. }
            | WalkErrorKind::Metadata { source, .. }
            | WalkErrorKind::CurrentDir { source, .. } => Some(source),
        }
    }
}

/// Classification of traversal failures.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// The tree root could not be inspected.
    RootMetadata {
        /// Root path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A directory could not be opened for listing.
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Listing a directory failed part way through.
    ReadDirEntry {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// An entry vanished or could not be inspected after listing.
    Metadata {
        /// Entry path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A relative root could not be anchored to the working directory.
    CurrentDir {
        /// Relative root as supplied.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl WalkErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootMetadata { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Metadata { path, .. }
            | Self::CurrentDir { path, .. } => path,
        }
    }
}
