//! Resolver context handed to factories and constructors.

use crate::activation::ImplementationType;
use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to factory functions and [`Activate`](crate::Activate)
/// constructors for resolving dependencies.
///
/// Wraps the provider an ordered view (or a provider's own factory) was
/// given, so factories stay independent of the concrete provider type.
/// All [`Resolver`](crate::Resolver) methods are available on it.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{OrderedDescriptors, Resolver, ServiceCollection};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(3usize);
/// let provider = services.build();
///
/// let mut builder = OrderedDescriptors::<String>::builder();
/// builder.add_factory(|resolver| {
///     let width = resolver.get::<usize>()?;
///     Ok(Arc::new("x".repeat(*width)))
/// });
///
/// let ordered = provider.ordered(builder.build());
/// let values: Vec<_> = ordered.iter().unwrap().collect();
/// assert_eq!(values[0].as_str(), "xxx");
/// ```
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    /// Creates a new ResolverContext wrapping the given resolver.
    pub fn new(resolver: &'a dyn ResolverCore) -> Self {
        Self { resolver }
    }

    /// The wrapped resolver.
    pub fn resolver(&self) -> &'a dyn ResolverCore {
        self.resolver
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn create_instance(&self, implementation: &ImplementationType) -> DiResult<AnyArc> {
        self.resolver.create_instance(implementation)
    }
}
