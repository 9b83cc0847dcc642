//! Per-call operation arguments: completion callbacks plus pagination and
//! timeout options.

use std::fmt;
use std::time::Duration;

use crate::error::ResourceError;
use crate::item::Item;

/// Invoked once per resulting item.
pub type LoadCallback = Box<dyn FnMut(Item) + Send>;

/// Invoked at most once when an operation fails.
pub type ErrorCallback = Box<dyn FnOnce(ResourceError) + Send>;

/// Configuration bag for a single operation.
///
/// ```
/// use resource_kit::OperationArgs;
///
/// let args = OperationArgs::new()
///     .on_load(|item| println!("{item}"))
///     .start(20)
///     .count(10);
/// assert_eq!(args.range_header().as_deref(), Some("20-29"));
/// ```
#[derive(Default)]
pub struct OperationArgs {
    load: Option<LoadCallback>,
    error: Option<ErrorCallback>,
    start: Option<usize>,
    count: Option<usize>,
    timeout: Option<Duration>,
}

impl OperationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load(mut self, load: impl FnMut(Item) + Send + 'static) -> Self {
        self.load = Some(Box::new(load));
        self
    }

    pub fn on_error(mut self, error: impl FnOnce(ResourceError) + Send + 'static) -> Self {
        self.error = Some(Box::new(error));
        self
    }

    /// Offset of the first item in the pagination window.
    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    /// Size of the pagination window.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Overrides the transport's default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    pub fn has_load(&self) -> bool {
        self.load.is_some()
    }

    pub fn start_or_default(&self) -> usize {
        self.start.unwrap_or(0)
    }

    pub fn count_limit(&self) -> Option<usize> {
        self.count
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    /// The `Range` header value requesting `[start, start + count)`, or
    /// `None` when no nonzero `count` is set. The end index saturates at
    /// `usize::MAX`.
    pub fn range_header(&self) -> Option<String> {
        let count = self.count.filter(|&c| c > 0)?;
        let start = self.start_or_default();
        Some(format!("{}-{}", start, start.saturating_add(count - 1)))
    }

    /// Splits the callbacks out of the bag.
    pub(crate) fn into_callbacks(self) -> Callbacks {
        Callbacks {
            load: self.load,
            error: self.error,
        }
    }
}

impl fmt::Debug for OperationArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationArgs")
            .field("load", &self.load.is_some())
            .field("error", &self.error.is_some())
            .field("start", &self.start)
            .field("count", &self.count)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The completion callbacks of one operation.
pub(crate) struct Callbacks {
    load: Option<LoadCallback>,
    error: Option<ErrorCallback>,
}

impl Callbacks {
    /// Delivers one item to `load`, if present.
    pub(crate) fn load(&mut self, item: Item) {
        if let Some(load) = self.load.as_mut() {
            load(item);
        }
    }

    /// Delivers a failure to `error`, or drops it when no callback was
    /// supplied.
    pub(crate) fn fail(self, error: ResourceError) {
        match self.error {
            Some(callback) => callback(error),
            None => tracing::debug!(%error, "dropping failure: no error callback supplied"),
        }
    }
}
