use serde_json::Value;
use std::error::Error;

/// Boxed error accepted by [`Logger::error`](crate::logger::Logger::error).
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Malformed key/value list passed to a logging call.
///
/// Logging paths treat both variants as programming errors and panic
/// with this message; [`parse_attributes`](crate::record::parse_attributes)
/// exposes them as values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("key and values set is not even (got {len} items)")]
    OddLength { len: usize },

    #[error("attribute key at position {index} is not a string: {found}")]
    NonStringKey { index: usize, found: Value },
}

/// Error text taken from the `error` field of a `tracing` event.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CapturedError(pub String);
