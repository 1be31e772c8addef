//! In-memory spy logger for tests.
//!
//! [`SpyLogger`] implements the [`Logger`] capability set but records each
//! call as a [`LogRecord`] in a shared event sink instead of emitting it.
//! Loggers derived with `with_name` / `with_values` / `with_caller` all
//! append into their root's sink.
//!
//! ```
//! use logtest::{kv, LogLevel, Logger, SpyLogger};
//!
//! let spy = SpyLogger::new();
//! spy.info("starting", &kv!["attempt", 1]);
//! spy.error(Some("boom".into()), "failed", &kv![]);
//!
//! let records = spy.records();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].level, LogLevel::Info);
//! assert_eq!(records[1].error_message().as_deref(), Some("boom"));
//! ```

pub mod error;
pub mod level;
pub mod logger;
pub mod record;
pub mod spy;

#[cfg(feature = "layer")]
pub mod layer;

#[cfg(feature = "layer")]
pub mod init;

pub mod env;

pub use error::{AttributeError, BoxError, CapturedError};
pub use level::LogLevel;
pub use logger::Logger;
pub use record::LogRecord;
pub use spy::{EventSink, SpyLogger};

#[cfg(feature = "layer")]
pub use layer::SpyLayer;

#[doc(hidden)]
pub use serde_json;

pub use serde_json::Value;

/// Build a flat `key, value, ...` list for logging calls.
///
/// Each item goes through `serde_json::json!`, so any serializable value
/// works. Keys are not checked here; the logging call panics on a
/// non-string key or a missing value.
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($item)),+]
    };
}
