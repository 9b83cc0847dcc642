//! Configuration shared by the transports a `ResourceKit` builds.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::codec::{Codec, JsonCodec};
use crate::http::{HttpExecutor, UreqExecutor};

/// Request timeout applied when neither the config nor the call sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Settings for remote transports.
///
/// ```
/// use std::time::Duration;
/// use resource_kit::TransportConfig;
///
/// let config = TransportConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_header("x-client", "inventory");
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct TransportConfig {
    /// Default request timeout; `OperationArgs::timeout` overrides it per call.
    pub timeout: Duration,

    /// Wire format for request and response bodies.
    pub codec: Arc<dyn Codec>,

    /// Performs the HTTP round-trip.
    pub executor: Arc<dyn HttpExecutor>,

    /// Extra headers sent with every request.
    pub default_headers: Vec<(String, String)>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            codec: Arc::new(JsonCodec),
            executor: Arc::new(UreqExecutor),
            default_headers: Vec::new(),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn with_executor(mut self, executor: impl HttpExecutor + 'static) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    /// Same as `with_executor`, for an executor the caller keeps a handle to.
    pub fn with_shared_executor(mut self, executor: Arc<dyn HttpExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("timeout", &self.timeout)
            .field("content_type", &self.codec.content_type())
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}
