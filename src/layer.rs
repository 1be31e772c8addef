use crate::error::CapturedError;
use crate::level::LogLevel;
use crate::record::LogRecord;
use crate::spy::SpyLogger;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that appends every observed event to a
/// spy's event sink.
///
/// Lets tests assert on code that logs through the `tracing` macros with
/// the same [`LogRecord`]s a [`SpyLogger`] produces. The event target
/// becomes the logger name and the `message` field the message. On
/// `ERROR` events an `error` field becomes the record's error; at other
/// levels it stays an ordinary attribute. Every other field is an
/// attribute, non-finite floats kept as their text. Nothing is filtered.
#[derive(Debug, Clone)]
pub struct SpyLayer {
    spy: SpyLogger,
}

impl SpyLayer {
    pub fn new(spy: &SpyLogger) -> Self {
        SpyLayer { spy: spy.clone() }
    }

    /// Spy whose event sink receives the captured events.
    pub fn spy(&self) -> &SpyLogger {
        &self.spy
    }
}

impl<S> Layer<S> for SpyLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let level = LogLevel::from(meta.level());

        // Only error-level records carry an error; elsewhere it stays an attribute.
        let mut attributes = visitor.fields;
        let error = match visitor.error {
            Some(text) if level == LogLevel::Error => {
                Some(Arc::new(CapturedError(text)) as Arc<dyn Error + Send + Sync>)
            }
            Some(text) => {
                attributes.insert("error".to_string(), Value::String(text));
                None
            }
            None => None,
        };

        let record = LogRecord {
            logger_name: meta.target().to_string(),
            level,
            message: visitor.message.unwrap_or_default(),
            error,
            attributes,
        };

        self.spy.add_record(record);
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: BTreeMap<String, Value>,
    message: Option<String>,
    error: Option<String>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    fn text(&mut self, field: &Field, text: String) {
        match field.name() {
            "message" => self.message = Some(text),
            "error" => self.error = Some(text),
            _ => self.insert(field, Value::String(text)),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.text(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    // JSON has no NaN or infinity; keep those visible as text.
    fn record_f64(&mut self, field: &Field, value: f64) {
        if value.is_finite() {
            self.insert(field, Value::from(value));
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.text(field, value.to_string());
    }

    // `message` arrives here as `fmt::Arguments`, whose Debug output is the
    // formatted text.
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.text(field, format!("{:?}", value));
    }
}
