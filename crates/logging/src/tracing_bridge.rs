//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the verbosity flag system.
//!
//! [`CommitLayer`] maps tracing events to info and debug flags based on their
//! target, consults the thread-local verbosity configuration, and records
//! accepted events into the diagnostic buffer drained by the front end. This
//! lets library crates use the standard tracing macros (or the `trace_*!`
//! wrappers) while the front end keeps `-v`/`--info`/`--debug` semantics.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::info!(target: "otcommit::skip", "skipping /var/cache");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable consulted by [`init_tracing_with_env`].
pub const LOG_ENV: &str = "OT_COMMIT_LOG";

/// A tracing layer that bridges tracing events to the verbosity flag system.
pub struct CommitLayer {
    _config: VerbosityConfig,
}

impl CommitLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match target {
            t if t.ends_with("::leftover") || t == "leftover" => Some(InfoFlag::Leftover),
            t if t.ends_with("::name") || t == "name" => Some(InfoFlag::Name),
            t if t.ends_with("::skip") || t == "skip" => Some(InfoFlag::Skip),
            t if t.ends_with("::stats") || t == "stats" => Some(InfoFlag::Stats),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        // Suffix match keeps "unknown" from resolving to "own".
        match target {
            t if t.ends_with("::filter") || t == "filter" => Some(DebugFlag::Filter),
            t if t.ends_with("::own") || t.ends_with("::ownership") || t == "own" => {
                Some(DebugFlag::Own)
            }
            t if t.ends_with("::perms") || t == "perms" => Some(DebugFlag::Perms),
            t if t.ends_with("::walk") || t == "walk" => Some(DebugFlag::Walk),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }
}

impl<S> Layer<S> for CommitLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_debug(debug_flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_info(info_flag, verbosity_level, message);
                }
            }
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// Also stores `config` as the thread-local configuration. Installing a global
/// subscriber twice is not an error; the first one stays active.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = CommitLayer::new(config);
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Initialize tracing with the verbosity bridge plus a stderr `fmt` layer
/// filtered by the [`LOG_ENV`] environment variable.
///
/// Without the variable set the `fmt` layer stays silent and only the
/// verbosity bridge records events.
pub fn init_tracing_with_env(config: VerbosityConfig) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry()
        .with(CommitLayer::new(config))
        .with(fmt)
        .try_init();
}
