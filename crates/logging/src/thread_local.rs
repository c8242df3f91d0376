//! crates/logging/src/thread_local.rs
//! Thread-local storage for verbosity configuration and event collection.
//!
//! A commit walk runs on one thread, so diagnostics gathered while it runs are
//! buffered here and drained by the front end once the walk finishes.

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::cell::RefCell;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<Vec<DiagnosticEvent>> = RefCell::new(Vec::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug)]
pub enum DiagnosticEvent {
    /// Info-level diagnostic event.
    Info {
        /// The info flag category.
        flag: InfoFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
    /// Debug-level diagnostic event.
    Debug {
        /// The debug flag category.
        flag: DebugFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
}

impl DiagnosticEvent {
    /// Returns the rendered message carried by the event.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Info { message, .. } | Self::Debug { message, .. } => message,
        }
    }
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Check if the info flag is at or above the specified level.
pub fn info_gte(flag: InfoFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().info.get(flag) >= level)
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Emit an info diagnostic event.
pub fn emit_info(flag: InfoFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Info {
            flag,
            level,
            message,
        });
    });
}

/// Emit a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Debug {
            flag,
            level,
            message,
        });
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

/// Apply an info flag token to the current configuration.
pub fn apply_info_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| v.borrow_mut().apply_info_flag(token))
}

/// Apply a debug flag token to the current configuration.
pub fn apply_debug_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| v.borrow_mut().apply_debug_flag(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_controls_level_checks() {
        let mut config = VerbosityConfig::default();
        config.info.skip = 2;
        config.debug.own = 3;

        init(config);

        assert!(info_gte(InfoFlag::Skip, 1));
        assert!(info_gte(InfoFlag::Skip, 2));
        assert!(!info_gte(InfoFlag::Skip, 3));
        assert!(!info_gte(InfoFlag::Stats, 1));

        assert!(debug_gte(DebugFlag::Own, 3));
        assert!(!debug_gte(DebugFlag::Own, 4));
    }

    #[test]
    fn emitted_events_drain_in_order() {
        init(VerbosityConfig::default());
        drain_events();

        emit_info(InfoFlag::Leftover, 1, "never matched".to_string());
        emit_debug(DebugFlag::Perms, 2, "mode 0644 -> 0646".to_string());

        let events = drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message(), "never matched");
        assert!(matches!(
            events[1],
            DiagnosticEvent::Debug {
                flag: DebugFlag::Perms,
                level: 2,
                ..
            }
        ));
        assert!(drain_events().is_empty());
    }

    #[test]
    fn apply_flag_updates_thread_config() {
        init(VerbosityConfig::default());
        apply_info_flag("stats2").expect("known flag");
        apply_debug_flag("walk").expect("known flag");
        assert!(info_gte(InfoFlag::Stats, 2));
        assert!(debug_gte(DebugFlag::Walk, 1));
        assert!(apply_debug_flag("bogus").is_err());
    }
}
