#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Metadata records consumed by the commit filter.
//!
//! The commit filter rewrites ownership and mode bits of each tree entry in
//! place. [`MetadataRecord`] is the narrow mutable view it needs;
//! [`EntryMetadata`] is the owned implementation captured from the local
//! filesystem. [`OwnerOverride`] carries the commit-wide uid/gid replacement
//! and validates raw configuration values up front so the walk itself never
//! fails on ownership.

mod ownership;
mod record;

pub use ownership::{IdKind, InvalidOwnerOverride, MAX_OWNER_ID, OwnerOverride};
pub use record::{EntryKind, EntryMetadata, MetadataRecord, PERMISSION_MASK};
