//! Log sinks receiving the executor's progress messages.

use std::fmt;
use std::sync::Arc;

/// A destination for human-readable retry progress messages.
///
/// The executor formats each message lazily as [`fmt::Arguments`], the same
/// shape `format_args!` produces, so a sink that drops messages costs nothing.
/// Sinks are side-effecting only: nothing they do changes control flow.
///
/// # Examples
///
/// ```rust
/// use retrier::LogSink;
/// use std::sync::{Arc, Mutex};
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = {
///     let lines = Arc::clone(&lines);
///     LogSink::new(move |args| lines.lock().unwrap().push(args.to_string()))
/// };
///
/// sink.log(format_args!("Retrying attempt {}", 2));
/// assert_eq!(lines.lock().unwrap().as_slice(), ["Retrying attempt 2"]);
/// ```
#[derive(Clone)]
pub struct LogSink {
    inner: Option<Arc<dyn Fn(fmt::Arguments<'_>) + Send + Sync>>,
}

impl LogSink {
    /// A sink calling `f` for every message.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(fmt::Arguments<'_>) + Send + Sync + 'static,
    {
        Self {
            inner: Some(Arc::new(f)),
        }
    }

    /// A sink discarding every message.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// A sink forwarding messages to `tracing` at `INFO` level.
    #[cfg(feature = "tracing")]
    pub fn tracing() -> Self {
        Self::new(|args| tracing::info!(target: "retrier", "{}", args))
    }

    /// Whether messages sent here are discarded.
    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Deliver one message.
    pub fn log(&self, args: fmt::Arguments<'_>) {
        if let Some(f) = &self.inner {
            f(args);
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("noop", &self.is_noop())
            .finish()
    }
}
