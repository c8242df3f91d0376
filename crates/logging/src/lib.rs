#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the verbosity flag system shared by the ot-commit
//! workspace. Library crates record diagnostics either through the
//! level-gated [`info_log!`]/[`debug_log!`] macros or, with the `tracing`
//! feature, through ordinary tracing events routed by [`CommitLayer`]. Both
//! paths land in a thread-local buffer that the front end drains and renders
//! after each commit walk.
//!
//! # Design
//!
//! - [`InfoFlag`]/[`DebugFlag`] name the diagnostic categories; per-flag levels
//!   live in [`InfoLevels`]/[`DebugLevels`].
//! - [`VerbosityConfig`] combines both and maps a `-v` count onto per-flag
//!   levels. Individual flags can be adjusted with `--info`/`--debug` style
//!   tokens such as `skip2` or `ALL`.
//! - [`init`] stores a configuration for the current thread; [`drain_events`]
//!   hands back everything recorded since the last drain.
//!
//! # Invariants
//!
//! - Messages are formatted only when their flag is enabled at the requested
//!   level.
//! - Events are returned in emission order.
//!
//! # Examples
//!
//! ```
//! use logging::{DiagnosticEvent, InfoFlag, VerbosityConfig, drain_events, info_log, init};
//!
//! init(VerbosityConfig::from_verbose_level(1));
//! info_log!(Stats, 1, "{} entries committed", 12);
//!
//! let events = drain_events();
//! assert!(matches!(
//!     &events[0],
//!     DiagnosticEvent::Info { flag: InfoFlag::Stats, .. }
//! ));
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;

#[cfg(feature = "tracing")]
mod tracing_bridge;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, debug_gte, drain_events, emit_debug,
    emit_info, info_gte, init,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{CommitLayer, LOG_ENV, init_tracing, init_tracing_with_env};
