#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` drives a commit preview: it validates [`CommitOptions`], loads the
//! statoverride and skip-list files, walks each tree source through one
//! [`filters::FilterContext`], and returns a [`CommitReport`] listing the
//! entries a commit would record together with the filter statistics and any
//! directives that never matched.
//!
//! Only `dir=` sources can be walked here. Archive, layer and ref sources are
//! parsed by [`TreeSpec`] so they can be reported, but they require the
//! repository layer and are rejected with
//! [`EngineError::UnsupportedTreeSource`].
//!
//! # Logging
//!
//! Table loading, per-source walks and the final statistics are emitted as
//! `tracing` events under the `otcommit::*` targets. Allowed entry names and
//! skip decisions go to the thread-local diagnostic buffer when the `name`
//! and `skip` info flags are enabled.

mod error;
mod manifest;
mod options;
mod preview;

pub use error::{
    CONFIG_EXIT_CODE, EngineError, EngineResult, LEFTOVER_EXIT_CODE, WALK_EXIT_CODE,
};
pub use manifest::{CommitReport, ManifestEntry};
pub use options::{CommitOptions, TreeKind, TreeSpec, TreeSpecError};
pub use preview::{Manifest, commit_preview, walk_tree};
