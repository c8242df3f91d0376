use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use logging::debug_log;
use rustc_hash::FxHashSet;

use crate::LoadError;
use crate::error::lossy;
use crate::lines::read_directives;

/// Per-commit set of repository paths excluded from the commit.
///
/// Membership is byte-exact. The commit filter removes a path the first
/// time it is matched, mirroring [`ModeOverrides`](crate::ModeOverrides).
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SkipList {
    paths: FxHashSet<Vec<u8>>,
}

impl SkipList {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths still in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when no paths remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Adds a path; returns `false` when it was already present.
    pub fn insert(&mut self, path: impl Into<Vec<u8>>) -> bool {
        self.paths.insert(path.into())
    }

    /// Returns `true` when `path` is in the set.
    #[must_use]
    pub fn contains(&self, path: impl AsRef<[u8]>) -> bool {
        self.paths.contains(path.as_ref())
    }

    /// Removes `path`, returning whether it was present.
    pub fn take(&mut self, path: impl AsRef<[u8]>) -> bool {
        self.paths.remove(path.as_ref())
    }

    /// Iterates over the remaining paths in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.paths.iter().map(Vec::as_slice)
    }

    /// Consumes the set and returns its paths sorted.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Vec<u8>> {
        let mut paths: Vec<_> = self.paths.into_iter().collect();
        paths.sort_unstable();
        paths
    }

    /// Treats the whole line as a path and adds it. Never fails.
    pub fn parse_line(&mut self, line: &[u8]) {
        self.insert(line);
    }

    /// Builds a set from a skip-list source.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut set = Self::new();
        read_directives(reader, |line| {
            set.parse_line(line);
            Ok(())
        })?;
        Ok(set)
    }

    /// Builds a set from a skip-list file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let set = Self::read_from(BufReader::new(file)).map_err(|error| error.with_path(path))?;
        debug_log!(
            Filter,
            1,
            "loaded {} skip-list entries from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parses a whole source and merges it into `self`.
    ///
    /// Returns the number of distinct paths read. On failure `self` is left
    /// unchanged.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, LoadError> {
        let staged = Self::read_from(reader)?;
        let count = staged.len();
        self.paths.extend(staged.paths);
        Ok(count)
    }
}

impl fmt::Debug for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.paths.iter().map(|path| lossy(path)))
            .finish()
    }
}

impl<P: Into<Vec<u8>>> FromIterator<P> for SkipList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<P: Into<Vec<u8>>> Extend<P> for SkipList {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}
