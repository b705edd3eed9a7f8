//! Resolver traits: the provider seam used by ordered views.

use std::any::TypeId;
use std::sync::Arc;

use crate::activation::{Activate, ImplementationType};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// This is the provider contract an ordered view depends on. A provider must
/// be able to hand out registered services by key and to construct an
/// implementation type, satisfying that type's own dependencies from itself.
/// Errors from either operation propagate unchanged to whoever asked.
///
/// Most callers use the [`Resolver`] extension methods instead, which are
/// available on every `ResolverCore` (including `dyn ResolverCore`).
pub trait ResolverCore: Send + Sync {
    /// Resolves a single registered service as `Arc<dyn Any>`.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service
    /// * `Err(DiError)` - Resolution error (usually [`DiError::NotFound`])
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;

    /// Constructs a fresh instance of `implementation`.
    ///
    /// Implementations normally call [`ImplementationType::construct`] with a
    /// [`ResolverContext`](crate::ResolverContext) wrapping themselves, so the
    /// constructor's dependencies are resolved from this provider.
    fn create_instance(&self, implementation: &ImplementationType) -> DiResult<AnyArc>;
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// Blanket-implemented for every [`ResolverCore`], so factories receiving a
/// [`ResolverContext`](crate::ResolverContext) and code holding a
/// `dyn ResolverCore` can use the same calls.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{ServiceCollection, Resolver};
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton("configuration".to_string());
///
/// let provider = collection.build();
/// let config = provider.get::<String>().unwrap();
/// assert_eq!(&*config, "configuration");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be resolved.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Resolves a service registered under `name`.
    fn get_named<T: 'static + Send + Sync>(&self, name: &'static str) -> DiResult<Arc<T>> {
        let key = Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name);
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Constructs a fresh `I` through the provider's activation facility.
    ///
    /// ```
    /// use ferrous_di_ordered::{Activate, DiResult, Resolver, ResolverContext, ServiceCollection};
    /// use std::sync::Arc;
    ///
    /// struct Greeter { name: Arc<String> }
    ///
    /// impl Activate for Greeter {
    ///     fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self> {
    ///         Ok(Greeter { name: resolver.get::<String>()? })
    ///     }
    /// }
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton("world".to_string());
    /// let provider = collection.build();
    ///
    /// let greeter = provider.create::<Greeter>().unwrap();
    /// assert_eq!(greeter.name.as_str(), "world");
    /// ```
    fn create<I: Activate>(&self) -> DiResult<Arc<I>> {
        let any = self.create_instance(&ImplementationType::of::<I>())?;
        any.downcast::<I>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<I>()))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
