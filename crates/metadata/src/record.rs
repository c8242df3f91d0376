use std::fmt;
use std::fs;

/// Mask selecting the permission bits (including setuid, setgid and sticky)
/// of a POSIX mode.
pub const PERMISSION_MASK: u32 = 0o7777;

/// Mutable view over the ownership and mode of one tree entry.
///
/// The commit filter only needs these six accessors, so walkers and object
/// stores with their own metadata representation can implement the trait
/// directly instead of converting into [`EntryMetadata`].
pub trait MetadataRecord {
    /// Returns the owning user id.
    fn uid(&self) -> u32;

    /// Returns the owning group id.
    fn gid(&self) -> u32;

    /// Returns the full POSIX mode, including file type bits when present.
    fn mode(&self) -> u32;

    /// Replaces the owning user id.
    fn set_uid(&mut self, uid: u32);

    /// Replaces the owning group id.
    fn set_gid(&mut self, gid: u32);

    /// Replaces the full POSIX mode.
    fn set_mode(&mut self, mode: u32);
}

/// Kind of filesystem object an entry describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    #[cfg_attr(feature = "serde", serde(rename = "dir"))]
    Directory,
    /// Symbolic link.
    Symlink,
    /// FIFO, socket or device node.
    Special,
}

impl EntryKind {
    /// Classifies a [`fs::FileType`].
    #[must_use]
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Special
        }
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Short label used in manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "dir",
            Self::Symlink => "symlink",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned metadata snapshot of one tree entry.
///
/// Captured from the filesystem by the walker driver, mutated in place by the
/// commit filter, and finally handed to the object store for allowed entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntryMetadata {
    kind: EntryKind,
    uid: u32,
    gid: u32,
    mode: u32,
}

impl EntryMetadata {
    /// Creates a record from explicit values.
    #[must_use]
    pub const fn new(kind: EntryKind, uid: u32, gid: u32, mode: u32) -> Self {
        Self {
            kind,
            uid,
            gid,
            mode,
        }
    }

    /// Captures ownership and mode from [`fs::Metadata`].
    ///
    /// The metadata should come from `symlink_metadata` so links describe
    /// themselves rather than their targets.
    #[cfg(unix)]
    #[must_use]
    pub fn from_fs(metadata: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            kind: EntryKind::from_file_type(metadata.file_type()),
            uid: metadata.uid(),
            gid: metadata.gid(),
            mode: metadata.mode(),
        }
    }

    /// Captures ownership and mode from [`fs::Metadata`].
    ///
    /// Platforms without POSIX ownership report root ownership and derive the
    /// mode from the read-only flag.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_fs(metadata: &fs::Metadata) -> Self {
        let kind = EntryKind::from_file_type(metadata.file_type());
        let base = if kind.is_dir() { 0o755 } else { 0o644 };
        let mode = if metadata.permissions().readonly() {
            base & !0o222
        } else {
            base
        };
        Self {
            kind,
            uid: 0,
            gid: 0,
            mode,
        }
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns only the permission bits of the mode.
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & PERMISSION_MASK
    }
}

impl MetadataRecord for EntryMetadata {
    fn uid(&self) -> u32 {
        self.uid
    }

    fn gid(&self) -> u32 {
        self.gid
    }

    fn mode(&self) -> u32 {
        self.mode
    }

    fn set_uid(&mut self, uid: u32) {
        self.uid = uid;
    }

    fn set_gid(&mut self, gid: u32) {
        self.gid = gid;
    }

    fn set_mode(&mut self, mode: u32) {
        self.mode = mode;
    }
}
