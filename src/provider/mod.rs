//! Service provider module.
//!
//! A small map-backed [`ServiceProvider`] implementing [`ResolverCore`], so
//! ordered views can be used without an external container. It only knows
//! pre-built singletons and per-resolution factories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::activation::ImplementationType;
use crate::descriptors::OrderedDescriptors;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::ordered::Ordered;
use crate::registration::{AnyArc, Registration};
use crate::traits::{AsDispose, ResolverCore};

pub mod context;
pub use context::ResolverContext;

/// Service provider for resolving dependencies.
///
/// Built by [`ServiceCollection::build`](crate::ServiceCollection::build).
/// Cloning is cheap; clones share the same registrations.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
///
/// let provider = collection.build();
/// let db = provider.get_required::<Database>();
/// assert_eq!(db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registrations: HashMap<Key, Registration>,
}

impl ServiceProvider {
    pub(crate) fn new(registrations: HashMap<Key, Registration>) -> Self {
        Self {
            inner: Arc::new(ProviderInner { registrations }),
        }
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.inner.registrations.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registrations.is_empty()
    }

    /// Whether a service is registered under `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.inner.registrations.contains_key(key)
    }

    /// Creates an ordered view over `descriptors`, bound to this provider.
    ///
    /// Nothing is constructed until the view is first iterated.
    ///
    /// ```
    /// use ferrous_di_ordered::{OrderedDescriptors, ServiceCollection};
    /// use std::sync::Arc;
    ///
    /// let mut builder = OrderedDescriptors::<&'static str>::builder();
    /// builder
    ///     .add_value("a")
    ///     .add_factory(|_| Ok(Arc::new("b")))
    ///     .add_value("c");
    ///
    /// let provider = ServiceCollection::new().build();
    /// let ordered = provider.ordered(builder.build());
    ///
    /// let values: Vec<&str> = ordered.iter().unwrap().map(|v| *v).collect();
    /// assert_eq!(values, ["a", "b", "c"]);
    /// ```
    pub fn ordered<T>(&self, descriptors: Arc<OrderedDescriptors<T>>) -> Ordered<T>
    where
        T: ?Sized + AsDispose + Send + Sync + 'static,
    {
        Ordered::new(Arc::new(self.clone()), descriptors)
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let registration = self
            .inner
            .registrations
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;
        tracing::trace!(service = key.display_name(), name = ?key.service_name(), "resolving");
        registration.resolve(&ResolverContext::new(self))
    }

    fn create_instance(&self, implementation: &ImplementationType) -> DiResult<AnyArc> {
        tracing::trace!(implementation = implementation.type_name(), "activating");
        implementation.construct(&ResolverContext::new(self))
    }
}
