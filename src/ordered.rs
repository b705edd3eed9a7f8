//! Ordered, lazily materialized views over multi-registrations.
//!
//! An [`Ordered`] view resolves every descriptor of its container exactly
//! once, in registration order, on first iteration. Values that report a
//! release capability are recorded on the way and released together by
//! [`Ordered::dispose`].
//!
//! Materialization and disposal both run under the container's lock, so
//! views sharing a container never interleave those passes. There is no
//! timeout: a blocking factory blocks every waiter.
//!
//! The lock is reentrant. A factory may use another view of the same
//! container on its own thread; using the view that is currently running the
//! pass fails with [`DiError::Reentrant`].

use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::descriptors::{OrderedDescriptors, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::{OnceSlot, PassGuard};
use crate::observer::OrderedObserver;
use crate::provider::ResolverContext;
use crate::traits::{AsDispose, Dispose, ResolverCore};

/// Frozen result of one successful materialization pass.
struct Materialized<T: ?Sized> {
    values: Arc<[Arc<T>]>,
    disposables: Vec<Arc<T>>,
}

/// Ordered view over the descriptors registered for `T`.
///
/// Construction is cheap and constructs nothing. The first call to
/// [`iter`](Ordered::iter) materializes all descriptors; concurrent first
/// calls block until that single pass finishes and then observe its result.
///
/// If a descriptor fails, nothing is cached and the next call starts a new
/// pass from the first descriptor.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{Ordered, OrderedDescriptors, ServiceCollection};
/// use std::sync::Arc;
///
/// let mut builder = OrderedDescriptors::<String>::builder();
/// builder
///     .add_value("a".to_string())
///     .add_factory(|_| Ok(Arc::new("b".to_string())))
///     .add_value("c".to_string());
///
/// let provider = ServiceCollection::new().build();
/// let ordered = Ordered::new(Arc::new(provider), builder.build());
///
/// let values: Vec<String> = ordered.iter().unwrap().map(|v| (*v).clone()).collect();
/// assert_eq!(values, ["a", "b", "c"]);
/// ```
pub struct Ordered<T: ?Sized + AsDispose + Send + Sync + 'static> {
    provider: Arc<dyn ResolverCore>,
    descriptors: Arc<OrderedDescriptors<T>>,
    cache: OnceSlot<Materialized<T>>,
    /// Disposables released so far; only written under the container lock.
    released: AtomicUsize,
    /// Set while this view runs a pass; only written under the container lock.
    in_pass: AtomicBool,
    observer: Option<Arc<dyn OrderedObserver>>,
}

impl<T: ?Sized + AsDispose + Send + Sync + 'static> Ordered<T> {
    /// Binds `descriptors` to `provider` without constructing anything.
    pub fn new(provider: Arc<dyn ResolverCore>, descriptors: Arc<OrderedDescriptors<T>>) -> Self {
        Self {
            provider,
            descriptors,
            cache: OnceSlot::new(),
            released: AtomicUsize::new(0),
            in_pass: AtomicBool::new(false),
            observer: None,
        }
    }

    /// Attaches an observer notified about materialization and disposal.
    pub fn with_observer(mut self, observer: Arc<dyn OrderedObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The descriptor container this view materializes.
    pub fn descriptors(&self) -> &Arc<OrderedDescriptors<T>> {
        &self.descriptors
    }

    /// Whether a materialization pass has completed.
    pub fn is_materialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Iterates the values in registration order, materializing them first
    /// if needed.
    ///
    /// Every call returns a fresh iterator over the same cached values.
    ///
    /// # Errors
    ///
    /// [`DiError::UnsupportedDescriptorKind`] for descriptors that cannot be
    /// materialized synchronously; [`DiError::Reentrant`] when called from
    /// inside this view's own pass; any provider or factory error verbatim.
    pub fn iter(&self) -> DiResult<OrderedIter<T>> {
        let materialized = self.ensure_materialized()?;
        Ok(OrderedIter::new(Arc::clone(&materialized.values)))
    }

    /// Materialized values collected into a `Vec`.
    pub fn to_vec(&self) -> DiResult<Vec<Arc<T>>> {
        Ok(self.iter()?.collect())
    }

    /// Number of values, materializing them first if needed.
    pub fn len(&self) -> DiResult<usize> {
        Ok(self.ensure_materialized()?.values.len())
    }

    pub fn is_empty(&self) -> DiResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of values with a release capability; zero until materialized.
    pub fn disposable_count(&self) -> usize {
        self.cache.get().map_or(0, |m| m.disposables.len())
    }

    /// Releases every disposable value, in registration order.
    ///
    /// Does nothing (and materializes nothing) before the first successful
    /// iteration. Each value is released at most once per view: calling
    /// `dispose` again only retries values that have not been released yet.
    /// Values stay cached and iterable afterwards.
    ///
    /// # Errors
    ///
    /// The first error raised by a release call, verbatim. Values after the
    /// failing one are left unreleased; the next call resumes at the failing
    /// value. [`DiError::Reentrant`] when a release call disposes this view
    /// again.
    pub fn dispose(&self) -> DiResult<()> {
        let _guard = self.descriptors.lock.acquire();
        let Some(materialized) = self.cache.get() else {
            tracing::trace!(service = self.service_name(), "dispose before materialization");
            return Ok(());
        };

        let Some(_pass) = PassGuard::enter(&self.in_pass) else {
            return Err(self.reentrant());
        };

        let start = self.released.load(Ordering::Acquire);
        let pending = materialized.disposables.len().saturating_sub(start);
        if pending == 0 {
            return Ok(());
        }
        if let Some(observer) = &self.observer {
            observer.disposing(self.service_name(), pending);
        }
        tracing::trace!(service = self.service_name(), pending, "releasing disposables");

        for (index, value) in materialized.disposables.iter().enumerate().skip(start) {
            if let Some(capability) = AsDispose::as_dispose(&**value) {
                if let Err(error) = capability.dispose() {
                    if let Some(observer) = &self.observer {
                        observer.dispose_failed(self.service_name(), index, &error);
                    }
                    return Err(error);
                }
            }
            self.released.store(index + 1, Ordering::Release);
        }
        Ok(())
    }

    fn service_name(&self) -> &'static str {
        self.descriptors.service_name()
    }

    fn reentrant(&self) -> DiError {
        tracing::trace!(service = self.service_name(), "reentrant access rejected");
        DiError::Reentrant(self.service_name())
    }

    fn ensure_materialized(&self) -> DiResult<&Materialized<T>> {
        if let Some(materialized) = self.cache.get() {
            return Ok(materialized);
        }

        let _guard = self.descriptors.lock.acquire();
        if let Some(materialized) = self.cache.get() {
            return Ok(materialized);
        }

        let Some(_pass) = PassGuard::enter(&self.in_pass) else {
            return Err(self.reentrant());
        };
        let materialized = self.materialize()?;
        Ok(self.cache.get_or_init(|| materialized))
    }

    /// One full pass over the descriptors. Must run under the container lock.
    fn materialize(&self) -> DiResult<Materialized<T>> {
        let service = self.service_name();
        let count = self.descriptors.len();
        let started = Instant::now();
        if let Some(observer) = &self.observer {
            observer.materializing(service, count);
        }

        let context = ResolverContext::new(&*self.provider);
        let mut values = Vec::with_capacity(count);
        let mut disposables = Vec::new();

        for (index, descriptor) in self.descriptors.iter().enumerate() {
            let value = match self.resolve(descriptor, &context) {
                Ok(value) => value,
                Err(error) => {
                    if let Some(observer) = &self.observer {
                        observer.materialization_failed(service, index, &error);
                    }
                    return Err(error);
                }
            };
            if AsDispose::as_dispose(&*value).is_some() {
                disposables.push(Arc::clone(&value));
            }
            values.push(value);
        }

        let duration = started.elapsed();
        tracing::trace!(service, count, disposables = disposables.len(), ?duration, "materialized");
        if let Some(observer) = &self.observer {
            observer.materialized(service, count, disposables.len(), duration);
        }

        Ok(Materialized {
            values: values.into(),
            disposables,
        })
    }

    fn resolve(&self, descriptor: &ServiceDescriptor<T>, context: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        match descriptor {
            ServiceDescriptor::Factory(factory) => factory.create(context),
            ServiceDescriptor::Type(ty) => ty.activate(&*self.provider),
            ServiceDescriptor::Instance(instance) => Ok(Arc::clone(instance)),
            ServiceDescriptor::AsyncFactory(_) => {
                Err(DiError::UnsupportedDescriptorKind(descriptor.kind()))
            }
        }
    }
}

impl<T: ?Sized + AsDispose + Send + Sync + 'static> Dispose for Ordered<T> {
    fn dispose(&self) -> DiResult<()> {
        Ordered::dispose(self)
    }
}

impl<T: ?Sized + AsDispose + Send + Sync + 'static> fmt::Debug for Ordered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ordered")
            .field("service", &self.service_name())
            .field("descriptors", &self.descriptors.len())
            .field("materialized", &self.is_materialized())
            .field("disposables", &self.disposable_count())
            .finish()
    }
}

/// Iterator over the materialized values of an [`Ordered`] view.
///
/// Owns a handle to the cached list, so it can outlive the borrow of the view.
pub struct OrderedIter<T: ?Sized> {
    values: Arc<[Arc<T>]>,
    front: usize,
    back: usize,
}

impl<T: ?Sized> OrderedIter<T> {
    fn new(values: Arc<[Arc<T>]>) -> Self {
        let back = values.len();
        Self {
            values,
            front: 0,
            back,
        }
    }

    /// The values not yet yielded.
    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.values[self.front..self.back]
    }
}

impl<T: ?Sized> Clone for OrderedIter<T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            front: self.front,
            back: self.back,
        }
    }
}

impl<T: ?Sized> Iterator for OrderedIter<T> {
    type Item = Arc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let value = Arc::clone(&self.values[self.front]);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: ?Sized> DoubleEndedIterator for OrderedIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(Arc::clone(&self.values[self.back]))
    }
}

impl<T: ?Sized> ExactSizeIterator for OrderedIter<T> {}

impl<T: ?Sized> FusedIterator for OrderedIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activate, Resolver, ServiceCollection, ServiceProvider};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    struct Connection {
        id: u32,
        log: Arc<Mutex<Vec<u32>>>,
    }

    impl Dispose for Connection {
        fn dispose(&self) -> DiResult<()> {
            self.log.lock().unwrap().push(self.id);
            Ok(())
        }
    }

    fn provider() -> ServiceProvider {
        ServiceCollection::new().build()
    }

    #[test]
    fn test_empty_container_materializes_to_nothing() {
        let ordered = provider().ordered(OrderedDescriptors::<u32>::builder().build());
        assert!(!ordered.is_materialized());
        assert!(ordered.is_empty().unwrap());
        assert!(ordered.is_materialized());
        assert_eq!(ordered.iter().unwrap().count(), 0);
        assert!(ordered.dispose().is_ok());
    }

    #[test]
    fn test_iterators_are_independent_and_double_ended() {
        let mut builder = OrderedDescriptors::<u32>::builder();
        builder.add_value(1).add_value(2).add_value(3);
        let ordered = provider().ordered(builder.build());

        let mut first = ordered.iter().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(*first.next().unwrap(), 1);
        assert_eq!(*first.next_back().unwrap(), 3);
        assert_eq!(first.as_slice().len(), 1);

        let second: Vec<u32> = ordered.iter().unwrap().map(|v| *v).collect();
        assert_eq!(second, vec![1, 2, 3]);

        let reversed: Vec<u32> = ordered.iter().unwrap().rev().map(|v| *v).collect();
        assert_eq!(reversed, vec![3, 2, 1]);
    }

    #[test]
    fn test_disposables_recorded_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l1 = log.clone();
        let l2 = log.clone();

        let mut builder = OrderedDescriptors::<Connection>::builder();
        builder
            .add_factory(move |_| Ok(Arc::new(Connection { id: 1, log: l1.clone() })))
            .add_value(Connection { id: 2, log: l2 });
        let ordered = provider().ordered(builder.build());

        assert_eq!(ordered.disposable_count(), 0);
        ordered.iter().unwrap();
        assert_eq!(ordered.disposable_count(), 2);

        ordered.dispose().unwrap();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_dispose_as_trait_object() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = OrderedDescriptors::<Connection>::builder();
        builder.add_value(Connection { id: 9, log: log.clone() });
        let ordered = provider().ordered(builder.build());
        ordered.iter().unwrap();

        let as_dispose: &dyn Dispose = &ordered;
        as_dispose.dispose().unwrap();
        assert_eq!(*log.lock().unwrap(), vec![9]);
    }

    #[test]
    fn test_failed_pass_is_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();

        let mut builder = OrderedDescriptors::<u32>::builder();
        builder.add_value(0).add_factory(move |_| {
            if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DiError::NotFound("flaky"))
            } else {
                Ok(Arc::new(1))
            }
        });
        let ordered = provider().ordered(builder.build());

        assert!(matches!(ordered.iter(), Err(DiError::NotFound("flaky"))));
        assert!(!ordered.is_materialized());

        let values: Vec<u32> = ordered.iter().unwrap().map(|v| *v).collect();
        assert_eq!(values, vec![0, 1]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_type_descriptor_uses_bound_provider() {
        struct Prefix(&'static str);
        struct Label(String);
        impl AsDispose for Label {}
        impl Activate for Label {
            fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self> {
                let prefix = resolver.get::<Prefix>()?;
                Ok(Label(format!("{}-label", prefix.0)))
            }
        }

        let mut services = ServiceCollection::new();
        services.add_singleton(Prefix("svc"));
        let mut builder = OrderedDescriptors::<Label>::builder();
        builder.add_type();
        let ordered = services.build().ordered(builder.build());

        let labels = ordered.to_vec().unwrap();
        assert_eq!(labels[0].0, "svc-label");
    }

    #[test]
    fn test_debug_reports_state() {
        let mut builder = OrderedDescriptors::<u32>::builder();
        builder.add_value(5);
        let ordered = provider().ordered(builder.build());

        assert!(format!("{:?}", ordered).contains("materialized: false"));
        ordered.iter().unwrap();
        assert!(format!("{:?}", ordered).contains("materialized: true"));
    }

    #[test]
    #[traced_test]
    fn test_tracing_observer_logs_passes() {
        let mut builder = OrderedDescriptors::<u32>::builder();
        builder.add_value(1).add_async_factory(|_| async { Ok(Arc::new(2)) });
        let ordered = provider()
            .ordered(builder.build())
            .with_observer(Arc::new(crate::TracingObserver::with_prefix("plugins")));

        assert!(ordered.iter().is_err());
        assert!(logs_contain("materializing ordered services"));
        assert!(logs_contain("ordered materialization failed"));
        assert!(logs_contain("async factory"));
    }
}
