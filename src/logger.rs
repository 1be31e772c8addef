use crate::error::BoxError;
use serde_json::Value;

/// Structured logger capability set.
///
/// Components take a `Box<dyn Logger>` (or `&dyn Logger`) and log through
/// it; tests substitute a [`SpyLogger`](crate::spy::SpyLogger) to observe
/// what was logged.
///
/// `keys_and_values` is a flat `key, value, key, value, ...` list where
/// every key is a string. The [`kv!`](crate::kv) macro builds one.
pub trait Logger: Send + Sync {
    /// Whether the logger would emit anything at all.
    fn enabled(&self) -> bool;

    fn error(&self, err: Option<BoxError>, msg: &str, keys_and_values: &[Value]);

    fn info(&self, msg: &str, keys_and_values: &[Value]);

    fn debug(&self, msg: &str, keys_and_values: &[Value]);

    fn trace(&self, msg: &str, keys_and_values: &[Value]);

    /// Derive a logger that carries extra contextual attributes.
    fn with_values(&self, keys_and_values: &[Value]) -> Box<dyn Logger>;

    /// Derive a logger scoped under `name`.
    fn with_name(&self, name: &str) -> Box<dyn Logger>;

    /// Derive a logger that reports call sites.
    fn with_caller(&self) -> Box<dyn Logger>;

    /// Underlying `tracing` dispatcher, when the logger is backed by one.
    fn get_logger(&self) -> Option<tracing::Dispatch>;
}
