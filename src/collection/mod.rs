//! Service collection module.
//!
//! Registers the handful of services a [`ServiceProvider`] can hand out:
//! pre-built singletons and per-resolution factories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::activation::{Activate, ImplementationType};
use crate::error::DiResult;
use crate::key::{key_of_named, key_of_type, Key};
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Registration};

/// Builder for a [`ServiceProvider`].
///
/// Registering the same key twice replaces the earlier registration.
#[derive(Default)]
pub struct ServiceCollection {
    registrations: HashMap<Key, Registration>,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a singleton instance shared by every resolution.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_di_ordered::ServiceCollection;
    /// struct Config {
    ///     database_url: String
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config {
    ///     database_url: "postgres://localhost".to_string()
    /// });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.add_singleton_arc(Arc::new(value))
    }

    /// Registers an already shared singleton instance.
    pub fn add_singleton_arc<T: 'static + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.insert(key_of_type::<T>(), Registration::Instance(value))
    }

    /// Registers a singleton instance under a service name.
    pub fn add_named_singleton<T: 'static + Send + Sync>(
        &mut self,
        name: &'static str,
        value: T,
    ) -> &mut Self {
        let value: AnyArc = Arc::new(value);
        self.insert(key_of_named::<T>(name), Registration::Instance(value))
    }

    /// Registers a factory that runs on every resolution of `T`.
    ///
    /// ```rust
    /// # use ferrous_di_ordered::{ServiceCollection, Resolver};
    /// struct RequestId(u64);
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(7u64);
    /// services.add_transient_factory::<RequestId, _>(|r| Ok(RequestId(*r.get::<u64>()?)));
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required::<RequestId>().0, 7);
    /// ```
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            let value = factory(r)?;
            Ok(Arc::new(value))
        };
        self.insert(key_of_type::<T>(), Registration::Factory(Arc::new(ctor)))
    }

    /// Registers `I` to be activated on every resolution.
    pub fn add_transient<I: Activate>(&mut self) -> &mut Self {
        let implementation = ImplementationType::of::<I>();
        let ctor = move |r: &ResolverContext<'_>| implementation.construct(r);
        self.insert(implementation.key(), Registration::Factory(Arc::new(ctor)))
    }

    /// Number of registrations so far.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Builds the provider.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registrations)
    }

    fn insert(&mut self, key: Key, registration: Registration) -> &mut Self {
        self.registrations.insert(key, registration);
        self
    }
}
