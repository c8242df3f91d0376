use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// One filesystem entry produced by [`crate::Walker`].
#[derive(Debug)]
pub struct WalkEntry {
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) metadata: fs::Metadata,
    pub(crate) depth: usize,
    pub(crate) is_root: bool,
}

impl WalkEntry {
    /// Absolute path of the entry on disk.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the traversal root; empty for the root itself.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Metadata captured without following symlinks.
    #[must_use]
    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Final component of the entry, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        if self.is_root {
            None
        } else {
            self.relative_path.file_name()
        }
    }

    /// Depth below the root (the root is `0`).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this entry is the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    /// Path of the entry as it will appear inside the commit.
    ///
    /// The root maps to `/` and every other entry to `/` followed by its
    /// relative components joined with `/`. Components are copied as raw
    /// bytes so non-UTF-8 names survive unchanged.
    ///
    /// ```
    /// use walk::WalkBuilder;
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// std::fs::create_dir_all(temp.path().join("usr/bin"))?;
    ///
    /// let paths: Vec<Vec<u8>> = WalkBuilder::new(temp.path())
    ///     .build()?
    ///     .map(|entry| entry.map(|entry| entry.repository_path()))
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(paths, [b"/".to_vec(), b"/usr".to_vec(), b"/usr/bin".to_vec()]);
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    #[must_use]
    pub fn repository_path(&self) -> Vec<u8> {
        let mut path = Vec::new();
        for component in self.relative_path.components() {
            if let Component::Normal(name) = component {
                path.push(b'/');
                path.extend_from_slice(name.as_encoded_bytes());
            }
        }
        if path.is_empty() {
            path.push(b'/');
        }
        path
    }
}
