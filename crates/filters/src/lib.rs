#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` holds the per-commit tables that rewrite and prune tree entries
//! while they are ingested into a commit, together with the filter routine a
//! walker invokes once per entry.
//!
//! # Design
//!
//! - [`ModeOverrides`] maps repository paths to permission bits that are
//!   OR-ed into an entry's mode. It is populated from statoverride files whose
//!   lines read `<mode-bits> <path>`.
//! - [`SkipList`] is a set of repository paths excluded from the commit. Each
//!   line of a skip-list file is one path.
//! - [`FilterContext`] owns both tables plus the commit-wide
//!   [`metadata::OwnerOverride`] and implements [`CommitFilter`].
//!
//! # Invariants
//!
//! - Paths match byte for byte. `/a/b`, `/a/b/` and `a/b` are three distinct
//!   keys.
//! - Mode bits are only ever added, never cleared.
//! - A directive is consumed by the first entry that matches it. Walkers
//!   visit each path at most once, so consumption only matters for reporting
//!   unmatched directives through [`FilterContext::finish`].
//! - Owner overrides and mode bits are applied before the skip check.
//!
//! # Errors
//!
//! Loaders return [`LoadError`], wrapping either an I/O failure or the first
//! [`DirectiveError`] with its file and line number. Loading stops at the
//! first malformed line and yields no partially populated table.
//!
//! # Examples
//!
//! ```
//! use filters::{FilterContext, ModeOverrides, ModeSyntax, SkipList, Verdict};
//! use metadata::{EntryKind, EntryMetadata, MetadataRecord, OwnerOverride};
//!
//! let overrides = ModeOverrides::read_from(&b"2048 /usr/bin/su\n"[..], ModeSyntax::Integer)?;
//! let skips = SkipList::read_from(&b"/var/cache\n"[..])?;
//! let owner = OwnerOverride::from_raw(0, 0)?;
//! let mut context = FilterContext::new(overrides, skips, owner);
//!
//! let mut su = EntryMetadata::new(EntryKind::File, 1000, 1000, 0o755);
//! assert_eq!(context.decide("/usr/bin/su", &mut su), Verdict::Allow);
//! assert_eq!((su.uid(), su.gid(), su.mode()), (0, 0, 0o4755));
//!
//! let mut cache = EntryMetadata::new(EntryKind::Directory, 1000, 1000, 0o755);
//! assert_eq!(context.decide("/var/cache", &mut cache), Verdict::Skip);
//! assert!(context.finish().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod error;
mod lines;
mod overrides;
mod skip_list;
mod verdict;

pub use context::{CommitFilter, FilterContext, FilterStats, Leftovers, commit_filter};
pub use error::{DirectiveError, LoadError};
pub use overrides::{ModeOverrides, ModeSyntax, parse_override_line};
pub use skip_list::SkipList;
pub use verdict::Verdict;
