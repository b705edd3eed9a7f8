//! Diagnostic observers for ordered materialization and disposal.
//!
//! Observers are called synchronously from inside the container lock, so
//! keep implementations cheap.

use std::time::Duration;

use crate::error::DiError;

/// Observer hook for ordered views.
///
/// Every method has an empty default, so an observer only overrides what it
/// cares about. `service` is the type name of the requested `T`.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{OrderedDescriptors, OrderedObserver, ServiceCollection};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Passes(AtomicUsize);
///
/// impl OrderedObserver for Passes {
///     fn materialized(&self, _: &str, _: usize, _: usize, _: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let mut builder = OrderedDescriptors::<u32>::builder();
/// builder.add_value(1).add_value(2);
///
/// let passes = Arc::new(Passes::default());
/// let ordered = ServiceCollection::new()
///     .build()
///     .ordered(builder.build())
///     .with_observer(passes.clone());
///
/// ordered.iter().unwrap();
/// ordered.iter().unwrap();
/// assert_eq!(passes.0.load(Ordering::SeqCst), 1);
/// ```
pub trait OrderedObserver: Send + Sync {
    /// A materialization pass over `count` descriptors is starting.
    fn materializing(&self, _service: &str, _count: usize) {}

    /// A materialization pass finished.
    fn materialized(&self, _service: &str, _count: usize, _disposables: usize, _duration: Duration) {}

    /// The descriptor at `index` failed; the pass is abandoned.
    fn materialization_failed(&self, _service: &str, _index: usize, _error: &DiError) {}

    /// A disposal pass over `pending` not yet released values is starting.
    fn disposing(&self, _service: &str, _pending: usize) {}

    /// Releasing the disposable at `index` failed; the pass stops there.
    fn dispose_failed(&self, _service: &str, _index: usize, _error: &DiError) {}
}

/// Observer that forwards every event to `tracing`.
///
/// Progress is logged at `debug`, failures at `warn`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    prefix: Option<String>,
}

impl TracingObserver {
    /// Creates a tracing observer without a prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracing observer tagging every event with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("ordered")
    }
}

impl OrderedObserver for TracingObserver {
    fn materializing(&self, service: &str, count: usize) {
        tracing::debug!(prefix = self.prefix(), service, count, "materializing ordered services");
    }

    fn materialized(&self, service: &str, count: usize, disposables: usize, duration: Duration) {
        tracing::debug!(
            prefix = self.prefix(),
            service,
            count,
            disposables,
            ?duration,
            "materialized ordered services"
        );
    }

    fn materialization_failed(&self, service: &str, index: usize, error: &DiError) {
        tracing::warn!(prefix = self.prefix(), service, index, %error, "ordered materialization failed");
    }

    fn disposing(&self, service: &str, pending: usize) {
        tracing::debug!(prefix = self.prefix(), service, pending, "disposing ordered services");
    }

    fn dispose_failed(&self, service: &str, index: usize, error: &DiError) {
        tracing::warn!(prefix = self.prefix(), service, index, %error, "ordered dispose failed");
    }
}
