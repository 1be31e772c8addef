use crate::error::BoxError;
use crate::level::LogLevel;
use crate::logger::Logger;
use crate::record::{merge_or_panic, LogRecord};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, append-only collection of [`LogRecord`]s.
///
/// One sink is created per root [`SpyLogger`]; every logger derived from
/// that root holds a handle to the same sink.
#[derive(Debug, Default)]
pub struct EventSink {
    records: Mutex<Vec<LogRecord>>,
}

impl EventSink {
    pub fn push(&self, record: LogRecord) {
        self.lock().push(record);
    }

    /// Copy of every record in call order.
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every record collected so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panicking assertion in another test thread must not hide the records.
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`Logger`] implementation that records every call instead of emitting it.
///
/// Create a root with [`SpyLogger::new`], hand it (or anything derived from
/// it) to the code under test, then assert on [`SpyLogger::records`].
///
/// Two behaviours are deliberate and tests may rely on them:
/// - records carry only the attributes passed to the logging call itself,
///   never the logger's bound [`attributes`](SpyLogger::attributes);
/// - [`with_name`](SpyLogger::with_name) starts from an empty attribute set.
#[derive(Debug, Clone)]
pub struct SpyLogger {
    name: String,
    attributes: BTreeMap<String, Value>,
    sink: Arc<EventSink>,
}

impl Default for SpyLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SpyLogger {
    /// Create a root spy with an empty name and its own event sink.
    pub fn new() -> Self {
        SpyLogger {
            name: String::new(),
            attributes: BTreeMap::new(),
            sink: Arc::new(EventSink::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contextual attributes bound through [`with_values`](SpyLogger::with_values).
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Event sink shared by this logger and everything derived from its root.
    pub fn sink(&self) -> &Arc<EventSink> {
        &self.sink
    }

    /// `true` when both loggers append into the same event sink.
    pub fn shares_sink_with(&self, other: &SpyLogger) -> bool {
        Arc::ptr_eq(&self.sink, &other.sink)
    }

    /// Append a ready-made record to the event sink.
    pub fn add_record(&self, record: LogRecord) {
        self.sink.push(record);
    }

    /// Every record collected by the sink, in call order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.sink.snapshot()
    }

    pub fn len(&self) -> usize {
        self.sink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.is_empty()
    }

    /// Discard all collected records. Affects every logger sharing the sink.
    pub fn reset(&self) {
        self.sink.clear();
    }

    /// Derive a logger with the same name and `keys_and_values` merged over
    /// a copy of the current attributes.
    ///
    /// **Panics** on a malformed key/value list.
    pub fn with_values(&self, keys_and_values: &[Value]) -> SpyLogger {
        let mut attributes = self.attributes.clone();
        merge_or_panic(&mut attributes, keys_and_values);

        SpyLogger {
            name: self.name.clone(),
            attributes,
            sink: Arc::clone(&self.sink),
        }
    }

    /// Derive a logger named `name` with no bound attributes.
    pub fn with_name(&self, name: impl Into<String>) -> SpyLogger {
        SpyLogger {
            name: name.into(),
            attributes: BTreeMap::new(),
            sink: Arc::clone(&self.sink),
        }
    }

    /// Same logger; the spy does not capture call sites.
    pub fn with_caller(&self) -> SpyLogger {
        self.clone()
    }

    fn record(&self, level: LogLevel, msg: &str, err: Option<BoxError>, keys_and_values: &[Value]) {
        self.add_record(LogRecord::new(self.name.as_str(), level, msg, err, keys_and_values));
    }
}

impl Logger for SpyLogger {
    fn enabled(&self) -> bool {
        true
    }

    fn error(&self, err: Option<BoxError>, msg: &str, keys_and_values: &[Value]) {
        self.record(LogLevel::Error, msg, err, keys_and_values);
    }

    fn info(&self, msg: &str, keys_and_values: &[Value]) {
        self.record(LogLevel::Info, msg, None, keys_and_values);
    }

    fn debug(&self, msg: &str, keys_and_values: &[Value]) {
        self.record(LogLevel::Debug, msg, None, keys_and_values);
    }

    fn trace(&self, msg: &str, keys_and_values: &[Value]) {
        self.record(LogLevel::Trace, msg, None, keys_and_values);
    }

    fn with_values(&self, keys_and_values: &[Value]) -> Box<dyn Logger> {
        Box::new(SpyLogger::with_values(self, keys_and_values))
    }

    fn with_name(&self, name: &str) -> Box<dyn Logger> {
        Box::new(SpyLogger::with_name(self, name))
    }

    fn with_caller(&self) -> Box<dyn Logger> {
        Box::new(SpyLogger::with_caller(self))
    }

    fn get_logger(&self) -> Option<tracing::Dispatch> {
        None
    }
}

impl Serialize for SpyLogger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SpyLogger", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("attributes", &self.attributes)?;
        state.serialize_field("records", &self.records())?;
        state.end()
    }
}
