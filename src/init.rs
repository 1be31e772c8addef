use crate::env::{env_flag, LOGTEST_STDOUT_ENV};
use crate::layer::SpyLayer;
use crate::spy::SpyLogger;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the capture subscriber.
///
/// **Fields**
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of the [`SpyLayer`] so captured events are also
///   printed, which helps when a test fails.
#[derive(Clone, Debug, Default)]
pub struct SpyConfig {
    pub enable_stdout: bool,
}

impl SpyConfig {
    /// Build a config from [`LOGTEST_STDOUT_ENV`].
    pub fn from_env() -> Self {
        SpyConfig {
            enable_stdout: env_flag(LOGTEST_STDOUT_ENV),
        }
    }
}

/// Route `tracing` events on the current thread into `spy`.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with a [`SpyLayer`] as the
/// thread-local default subscriber until the returned guard is dropped.
/// Other test threads are unaffected.
pub fn install(spy: &SpyLogger, config: SpyConfig) -> DefaultGuard {
    let layer = SpyLayer::new(spy);

    // Two branches because the stacked subscriber types differ.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer().with_test_writer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_default(subscriber)
    }
}

/// Create a root spy and install it with [`SpyConfig::from_env`].
///
/// Keep the guard alive for as long as events should be captured.
pub fn capture() -> (SpyLogger, DefaultGuard) {
    let spy = SpyLogger::new();
    let guard = install(&spy, SpyConfig::from_env());
    (spy, guard)
}
