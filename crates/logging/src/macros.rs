//! crates/logging/src/macros.rs
//! Level-gated diagnostic macros backed by the thread-local buffer.

/// Records an info diagnostic when the flag is enabled at `level` or above.
///
/// The message is only formatted when the level check passes.
///
/// ```
/// use logging::{VerbosityConfig, drain_events, info_log, init};
///
/// let mut config = VerbosityConfig::default();
/// config.info.skip = 1;
/// init(config);
///
/// info_log!(Skip, 1, "skipping {}", "/var/cache");
/// info_log!(Skip, 2, "suppressed");
/// assert_eq!(drain_events().len(), 1);
/// ```
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::info_gte($crate::InfoFlag::$flag, $level) {
            $crate::emit_info($crate::InfoFlag::$flag, $level, format!($($arg)*));
        }
    };
}

/// Records a debug diagnostic when the flag is enabled at `level` or above.
///
/// ```
/// use logging::{VerbosityConfig, debug_log, drain_events, init};
///
/// let mut config = VerbosityConfig::default();
/// config.debug.walk = 2;
/// init(config);
///
/// debug_log!(Walk, 2, "entering {:?}", "/usr");
/// assert_eq!(drain_events()[0].message(), "entering \"/usr\"");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, format!($($arg)*));
        }
    };
}
