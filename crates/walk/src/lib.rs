#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates a tree source for a commit. Entries come out in
//! pre-order (a directory before its children) with siblings sorted by name,
//! so the same tree always produces the same sequence.
//!
//! # Design
//!
//! - [`WalkBuilder`] selects the root and whether it is emitted.
//! - [`Walker`] implements [`Iterator`]. Directories are listed lazily; a
//!   caller that decides a directory must not be committed calls
//!   [`Walker::skip_current_dir`] right after receiving it and none of its
//!   descendants are produced.
//! - [`WalkEntry::repository_path`] renders the `/`-rooted byte path used as
//!   the key for statoverride and skip-list lookups.
//!
//! # Invariants
//!
//! - Metadata is read with `symlink_metadata`; symlinks are reported as
//!   symlinks and never traversed.
//! - Every entry is yielded at most once.
//! - After an error the walker is exhausted.
//!
//! # Examples
//!
//! ```
//! use walk::WalkBuilder;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir_all(temp.path().join("var/cache/apt"))?;
//! fs::write(temp.path().join("var/log"), b"")?;
//!
//! let mut walker = WalkBuilder::new(temp.path()).build()?;
//! let mut seen = Vec::new();
//! while let Some(entry) = walker.next() {
//!     let path = entry?.repository_path();
//!     if path == b"/var/cache" {
//!         walker.skip_current_dir();
//!     }
//!     seen.push(String::from_utf8(path)?);
//! }
//! assert_eq!(seen, ["/", "/var", "/var/cache", "/var/log"]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use builder::WalkBuilder;
pub use entry::WalkEntry;
pub use error::{WalkError, WalkErrorKind};
pub use walker::Walker;
