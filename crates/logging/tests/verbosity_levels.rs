//! Integration tests for `-v` mapping and level-gated macros.

use logging::{
    DebugFlag, DiagnosticEvent, InfoFlag, VerbosityConfig, debug_log, drain_events, info_log,
    init,
};

// ============================================================================
// Verbose Level Mapping
// ============================================================================

#[test]
fn single_v_reports_skips_and_stats() {
    let config = VerbosityConfig::from_verbose_level(1);
    assert_eq!(config.info.get(InfoFlag::Skip), 1);
    assert_eq!(config.info.get(InfoFlag::Stats), 1);
    assert_eq!(config.info.get(InfoFlag::Name), 0);
    assert_eq!(config.debug.get(DebugFlag::Filter), 0);
}

#[test]
fn triple_v_enables_ownership_and_permission_debug() {
    let config = VerbosityConfig::from_verbose_level(3);
    assert_eq!(config.debug.get(DebugFlag::Own), 1);
    assert_eq!(config.debug.get(DebugFlag::Perms), 1);
    assert_eq!(config.debug.get(DebugFlag::Walk), 1);
}

#[test]
fn very_high_levels_saturate() {
    assert_eq!(
        VerbosityConfig::from_verbose_level(4),
        VerbosityConfig::from_verbose_level(200)
    );
}

// ============================================================================
// Macro Gating
// ============================================================================

#[test]
fn info_log_respects_level() {
    let mut config = VerbosityConfig::default();
    config.info.name = 1;
    init(config);
    drain_events();

    info_log!(Name, 1, "/usr/bin/{}", "env");
    info_log!(Name, 2, "filtered");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DiagnosticEvent::Info {
            flag,
            level,
            message,
        } => {
            assert_eq!(*flag, InfoFlag::Name);
            assert_eq!(*level, 1);
            assert_eq!(message, "/usr/bin/env");
        }
        DiagnosticEvent::Debug { .. } => panic!("expected info event"),
    }
}

#[test]
fn debug_log_flags_are_independent() {
    let mut config = VerbosityConfig::default();
    config.debug.perms = 2;
    init(config);
    drain_events();

    debug_log!(Perms, 2, "visible");
    debug_log!(Own, 1, "hidden");

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message(), "visible");
}

#[test]
fn macro_arguments_are_not_evaluated_when_disabled() {
    init(VerbosityConfig::default());
    drain_events();

    let mut evaluated = false;
    debug_log!(Walk, 1, "{}", {
        evaluated = true;
        "payload"
    });

    assert!(!evaluated);
    assert!(drain_events().is_empty());
}
