use crate::error::{AttributeError, BoxError};
use crate::level::LogLevel;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

/// Snapshot of a single logging call.
///
/// Records are built once per call and never mutated after they reach a
/// spy's event sink.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    /// Only ever set by error-level calls.
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<Arc<dyn Error + Send + Sync>>,
    pub attributes: BTreeMap<String, Value>,
}

impl LogRecord {
    /// Build a record from a logging call.
    ///
    /// **Panics** if `keys_and_values` has odd length or any key is not a
    /// string. Both indicate a broken call site, so the test fails loudly
    /// instead of dropping attributes.
    pub fn new(
        name: impl Into<String>,
        level: LogLevel,
        msg: impl Into<String>,
        err: Option<BoxError>,
        keys_and_values: &[Value],
    ) -> Self {
        match Self::try_new(name, level, msg, err, keys_and_values) {
            Ok(record) => record,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible counterpart of [`LogRecord::new`]: returns the
    /// [`AttributeError`] instead of panicking.
    pub fn try_new(
        name: impl Into<String>,
        level: LogLevel,
        msg: impl Into<String>,
        err: Option<BoxError>,
        keys_and_values: &[Value],
    ) -> Result<Self, AttributeError> {
        Ok(LogRecord {
            logger_name: name.into(),
            level,
            message: msg.into(),
            error: err.map(Arc::from),
            attributes: parse_attributes(keys_and_values)?,
        })
    }

    /// Merge additional key/value pairs into the record's attributes.
    ///
    /// **Panics** on a malformed list, like [`LogRecord::new`].
    pub fn with_values(&mut self, keys_and_values: &[Value]) {
        merge_or_panic(&mut self.attributes, keys_and_values);
    }

    /// Display string of the attached error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Attribute lookup by key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Turn a flat `key, value, key, value, ...` list into an attribute map.
///
/// Later pairs win when a key repeats.
pub fn parse_attributes(keys_and_values: &[Value]) -> Result<BTreeMap<String, Value>, AttributeError> {
    let mut attributes = BTreeMap::new();
    merge_attributes(&mut attributes, keys_and_values)?;
    Ok(attributes)
}

/// Insert a flat key/value list into an existing map, overriding on collision.
///
/// The list is validated in full before anything is inserted.
pub fn merge_attributes(
    target: &mut BTreeMap<String, Value>,
    keys_and_values: &[Value],
) -> Result<(), AttributeError> {
    if keys_and_values.len() % 2 != 0 {
        return Err(AttributeError::OddLength { len: keys_and_values.len() });
    }

    let mut pairs = Vec::with_capacity(keys_and_values.len() / 2);
    for (idx, pair) in keys_and_values.chunks_exact(2).enumerate() {
        match &pair[0] {
            Value::String(key) => pairs.push((key.clone(), pair[1].clone())),
            other => {
                return Err(AttributeError::NonStringKey {
                    index: idx * 2,
                    found: other.clone(),
                })
            }
        }
    }

    target.extend(pairs);
    Ok(())
}

pub(crate) fn merge_or_panic(target: &mut BTreeMap<String, Value>, keys_and_values: &[Value]) {
    if let Err(e) = merge_attributes(target, keys_and_values) {
        panic!("{e}");
    }
}

fn serialize_error<S>(err: &Option<Arc<dyn Error + Send + Sync>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match err {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_attributes_from_pairs() {
        let record = LogRecord::new("db", LogLevel::Info, "ready", None, &[json!("port"), json!(5432), json!("tls"), json!(true)]);

        assert_eq!(record.logger_name, "db");
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "ready");
        assert!(record.error.is_none());
        assert_eq!(record.attributes.len(), 2);
        assert_eq!(record.attribute("port"), Some(&json!(5432)));
        assert_eq!(record.attribute("tls"), Some(&json!(true)));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let attributes = parse_attributes(&[json!("k"), json!(1), json!("k"), json!(2)]).unwrap();
        assert_eq!(attributes.get("k"), Some(&json!(2)));
    }

    #[test]
    fn odd_length_is_rejected() {
        let err = parse_attributes(&[json!("lonely")]).unwrap_err();
        assert_eq!(err, AttributeError::OddLength { len: 1 });
        assert!(err.to_string().contains("key and values set is not even"));
    }

    #[test]
    fn non_string_key_is_rejected_without_partial_insert() {
        let mut target = BTreeMap::new();
        let err = merge_attributes(&mut target, &[json!("ok"), json!(1), json!(7), json!("x")]).unwrap_err();
        assert_eq!(err, AttributeError::NonStringKey { index: 2, found: json!(7) });
        assert!(target.is_empty());
    }

    #[test]
    fn try_new_reports_malformed_lists() {
        let odd = LogRecord::try_new("", LogLevel::Info, "msg", None, &[json!("a")]).unwrap_err();
        assert_eq!(odd, AttributeError::OddLength { len: 1 });

        let key = LogRecord::try_new("", LogLevel::Info, "msg", None, &[json!(1), json!("v")]).unwrap_err();
        assert_eq!(key, AttributeError::NonStringKey { index: 0, found: json!(1) });

        let ok = LogRecord::try_new("n", LogLevel::Trace, "msg", None, &[json!("a"), json!(1)]).unwrap();
        assert_eq!(ok.attribute("a"), Some(&json!(1)));
    }

    #[test]
    #[should_panic(expected = "key and values set is not even")]
    fn new_panics_on_odd_length() {
        LogRecord::new("", LogLevel::Debug, "msg", None, &[json!("a"), json!(1), json!("b")]);
    }

    #[test]
    #[should_panic(expected = "is not a string")]
    fn with_values_panics_on_non_string_key() {
        let mut record = LogRecord::new("", LogLevel::Debug, "msg", None, &[]);
        record.with_values(&[json!(null), json!(1)]);
    }

    #[test]
    fn error_serializes_as_display_string() {
        let record = LogRecord::new("op", LogLevel::Error, "failed", Some("boom".into()), &[]);
        assert_eq!(record.error_message().as_deref(), Some("boom"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "logger_name": "op",
                "level": "ERROR",
                "message": "failed",
                "error": "boom",
                "attributes": {}
            })
        );
    }
}
