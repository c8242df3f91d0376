//! crates/logging/src/tracing_macros.rs
//! Convenience macros for subsystem-targeted tracing.
//!
//! These wrap the standard tracing macros with the targets understood by
//! [`CommitLayer`](crate::CommitLayer).

/// Emit a commit filter trace.
///
/// # Example
/// ```ignore
/// trace_filter!("loaded {} statoverride directives", count);
/// ```
#[macro_export]
macro_rules! trace_filter {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "otcommit::filter", $($arg)*);
    };
}

/// Emit an ownership rewrite trace.
#[macro_export]
macro_rules! trace_own {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "otcommit::own", $($arg)*);
    };
}

/// Emit a permission addition trace.
#[macro_export]
macro_rules! trace_perms {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "otcommit::perms", $($arg)*);
    };
}

/// Emit a skip-list exclusion trace.
///
/// # Example
/// ```ignore
/// trace_skip!("skipping {}", path);
/// ```
#[macro_export]
macro_rules! trace_skip {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "otcommit::skip", $($arg)*);
    };
}

/// Emit a traversal trace.
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "otcommit::walk", $($arg)*);
    };
}

/// Emit a statistics trace.
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "otcommit::stats", $($arg)*);
    };
}
