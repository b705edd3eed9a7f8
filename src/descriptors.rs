//! Service descriptors and the ordered descriptor container.
//!
//! A [`ServiceDescriptor`] is a recipe for one value of the requested type
//! `T`. An [`OrderedDescriptors`] container keeps those recipes in
//! registration order, is immutable once built, and owns the lock that
//! serializes materialization for every ordered view created over it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::activation::{Activate, ImplementationType};
use crate::error::{DiError, DiResult};
use crate::internal::ContainerLock;
use crate::provider::ResolverContext;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Boxed future produced by async factories.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type FactoryFn<T> = dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<T>> + Send + Sync;
type AsyncFactoryFn<T> = dyn Fn(Arc<dyn ResolverCore>) -> BoxFuture<DiResult<Arc<T>>> + Send + Sync;
type CastFn<T> = dyn Fn(AnyArc) -> DiResult<Arc<T>> + Send + Sync;

/// The construction strategy of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// Function of the provider
    Factory,
    /// Implementation type activated by the provider
    Type,
    /// Pre-built instance
    Instance,
    /// Asynchronous function of the provider
    AsyncFactory,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorKind::Factory => "factory",
            DescriptorKind::Type => "type",
            DescriptorKind::Instance => "instance",
            DescriptorKind::AsyncFactory => "async factory",
        })
    }
}

/// A recipe for one value of type `T`.
///
/// Exactly one construction strategy per descriptor. Ordered views
/// materialize `Factory`, `Type` and `Instance` descriptors; `AsyncFactory`
/// descriptors can only be driven by an async resolution path and make
/// synchronous materialization fail with
/// [`DiError::UnsupportedDescriptorKind`].
pub enum ServiceDescriptor<T: ?Sized> {
    /// Invokes a function with the provider
    Factory(FactoryDescriptor<T>),
    /// Asks the provider to construct an implementation type
    Type(TypeDescriptor<T>),
    /// Hands out a pre-built instance
    Instance(Arc<T>),
    /// Awaits a function of the provider
    AsyncFactory(AsyncFactoryDescriptor<T>),
}

impl<T: ?Sized> ServiceDescriptor<T> {
    /// The construction strategy of this descriptor.
    pub fn kind(&self) -> DescriptorKind {
        match self {
            ServiceDescriptor::Factory(_) => DescriptorKind::Factory,
            ServiceDescriptor::Type(_) => DescriptorKind::Type,
            ServiceDescriptor::Instance(_) => DescriptorKind::Instance,
            ServiceDescriptor::AsyncFactory(_) => DescriptorKind::AsyncFactory,
        }
    }
}

impl<T: ?Sized> fmt::Debug for ServiceDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceDescriptor::Type(descriptor) => f
                .debug_tuple("Type")
                .field(&descriptor.implementation.type_name())
                .finish(),
            other => f.debug_tuple("ServiceDescriptor").field(&other.kind()).finish(),
        }
    }
}

/// Factory descriptor: `(provider) -> instance`.
pub struct FactoryDescriptor<T: ?Sized> {
    factory: Arc<FactoryFn<T>>,
}

impl<T: ?Sized + 'static> FactoryDescriptor<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Runs the factory.
    pub fn create(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        (self.factory)(resolver)
    }
}

/// Type descriptor: an implementation type plus the cast to `T`.
pub struct TypeDescriptor<T: ?Sized> {
    implementation: ImplementationType,
    cast: Arc<CastFn<T>>,
}

impl<T: ?Sized + 'static> TypeDescriptor<T> {
    /// Descriptor for `I`, converted to `T` by `upcast`.
    ///
    /// Used when `T` is a trait object: `|i| i as Arc<dyn Trait>`.
    pub fn new<I, U>(upcast: U) -> Self
    where
        I: Activate,
        U: Fn(Arc<I>) -> Arc<T> + Send + Sync + 'static,
    {
        let cast = move |any: AnyArc| -> DiResult<Arc<T>> {
            any.downcast::<I>()
                .map(&upcast)
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<I>()))
        };
        Self {
            implementation: ImplementationType::of::<I>(),
            cast: Arc::new(cast),
        }
    }

    /// The implementation type the provider is asked to construct.
    pub fn implementation(&self) -> &ImplementationType {
        &self.implementation
    }

    /// Constructs the implementation through `provider` and casts it to `T`.
    pub fn activate(&self, provider: &dyn ResolverCore) -> DiResult<Arc<T>> {
        let instance = provider.create_instance(&self.implementation)?;
        (self.cast)(instance)
    }
}

/// Async factory descriptor: `(provider) -> future of instance`.
pub struct AsyncFactoryDescriptor<T: ?Sized> {
    factory: Arc<AsyncFactoryFn<T>>,
}

impl<T: ?Sized + 'static> AsyncFactoryDescriptor<T> {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn(Arc<dyn ResolverCore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<Arc<T>>> + Send + 'static,
    {
        let boxed = move |provider: Arc<dyn ResolverCore>| -> BoxFuture<DiResult<Arc<T>>> {
            Box::pin(factory(provider))
        };
        Self {
            factory: Arc::new(boxed),
        }
    }

    /// Starts the factory; the returned future resolves to the instance.
    pub fn create(&self, provider: Arc<dyn ResolverCore>) -> BoxFuture<DiResult<Arc<T>>> {
        (self.factory)(provider)
    }
}

/// Ordered, immutable container of descriptors for `T`.
///
/// Shared (as `Arc`) by every [`Ordered`](crate::Ordered) view created for
/// the same registration. Its lock serializes the materialization and
/// disposal of all those views.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{DescriptorKind, OrderedDescriptors};
/// use std::sync::Arc;
///
/// let mut builder = OrderedDescriptors::<String>::builder();
/// builder
///     .add_value("first".to_string())
///     .add_factory(|_| Ok(Arc::new("second".to_string())));
/// let descriptors = builder.build();
///
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors.kinds(), vec![DescriptorKind::Instance, DescriptorKind::Factory]);
/// ```
pub struct OrderedDescriptors<T: ?Sized> {
    descriptors: Vec<ServiceDescriptor<T>>,
    pub(crate) lock: ContainerLock,
}

impl<T: ?Sized + Send + Sync + 'static> OrderedDescriptors<T> {
    /// Starts an empty builder.
    pub fn builder() -> OrderedDescriptorsBuilder<T> {
        OrderedDescriptorsBuilder::new()
    }

    /// Wraps an already ordered list of descriptors.
    pub fn from_descriptors(descriptors: Vec<ServiceDescriptor<T>>) -> Arc<Self> {
        Arc::new(Self {
            descriptors,
            lock: ContainerLock::new(),
        })
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor<T>> {
        self.descriptors.iter()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Construction kinds in registration order.
    pub fn kinds(&self) -> Vec<DescriptorKind> {
        self.descriptors.iter().map(ServiceDescriptor::kind).collect()
    }

    /// Name of the requested type `T`.
    pub fn service_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T: ?Sized> fmt::Debug for OrderedDescriptors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedDescriptors")
            .field("service", &std::any::type_name::<T>())
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

/// Builder collecting descriptors in registration order.
pub struct OrderedDescriptorsBuilder<T: ?Sized> {
    descriptors: Vec<ServiceDescriptor<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> OrderedDescriptorsBuilder<T> {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Appends a descriptor as-is.
    pub fn add(&mut self, descriptor: ServiceDescriptor<T>) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Appends a factory descriptor.
    pub fn add_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(&ResolverContext<'_>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::Factory(FactoryDescriptor::new(factory)))
    }

    /// Appends a type descriptor for `I`, converted to `T` by `upcast`.
    ///
    /// ```
    /// use ferrous_di_ordered::{Activate, AsDispose, DiResult, OrderedDescriptors, ResolverContext};
    /// use std::sync::Arc;
    ///
    /// trait Handler: AsDispose + Send + Sync {}
    ///
    /// struct Audit;
    /// impl AsDispose for Audit {}
    /// impl Handler for Audit {}
    /// impl Activate for Audit {
    ///     fn activate(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(Audit) }
    /// }
    ///
    /// let mut builder = OrderedDescriptors::<dyn Handler>::builder();
    /// builder.add_type_as::<Audit, _>(|audit| audit as Arc<dyn Handler>);
    /// assert_eq!(builder.len(), 1);
    /// ```
    pub fn add_type_as<I, U>(&mut self, upcast: U) -> &mut Self
    where
        I: Activate,
        U: Fn(Arc<I>) -> Arc<T> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::Type(TypeDescriptor::new::<I, U>(upcast)))
    }

    /// Appends an instance descriptor.
    pub fn add_instance(&mut self, instance: Arc<T>) -> &mut Self {
        self.add(ServiceDescriptor::Instance(instance))
    }

    /// Appends an async factory descriptor.
    pub fn add_async_factory<F, Fut>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(Arc<dyn ResolverCore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<Arc<T>>> + Send + 'static,
    {
        self.add(ServiceDescriptor::AsyncFactory(AsyncFactoryDescriptor::new(factory)))
    }

    /// Number of descriptors added so far.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Freezes the descriptors into a shareable container.
    pub fn build(self) -> Arc<OrderedDescriptors<T>> {
        OrderedDescriptors::from_descriptors(self.descriptors)
    }
}

impl<T: Send + Sync + 'static> OrderedDescriptorsBuilder<T> {
    /// Appends a type descriptor for `T` itself.
    pub fn add_type(&mut self) -> &mut Self
    where
        T: Activate,
    {
        self.add_type_as::<T, _>(|instance| instance)
    }

    /// Appends an instance descriptor holding `value`.
    pub fn add_value(&mut self, value: T) -> &mut Self {
        self.add_instance(Arc::new(value))
    }
}

impl<T: ?Sized + Send + Sync + 'static> Default for OrderedDescriptorsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceCollection;

    struct Widget(u8);

    impl Activate for Widget {
        fn activate(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Widget(7))
        }
    }

    #[test]
    fn test_builder_preserves_order_and_kinds() {
        let mut builder = OrderedDescriptors::<Widget>::builder();
        builder
            .add_type()
            .add_value(Widget(1))
            .add_factory(|_| Ok(Arc::new(Widget(2))))
            .add_async_factory(|_| async { Ok(Arc::new(Widget(3))) });
        let descriptors = builder.build();

        assert_eq!(
            descriptors.kinds(),
            vec![
                DescriptorKind::Type,
                DescriptorKind::Instance,
                DescriptorKind::Factory,
                DescriptorKind::AsyncFactory,
            ]
        );
        assert!(descriptors.service_name().contains("Widget"));
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(DescriptorKind::Factory.to_string(), "factory");
        assert_eq!(DescriptorKind::Type.to_string(), "type");
        assert_eq!(DescriptorKind::Instance.to_string(), "instance");
        assert_eq!(DescriptorKind::AsyncFactory.to_string(), "async factory");
    }

    #[test]
    fn test_type_descriptor_activates_through_provider() {
        let provider = ServiceCollection::new().build();
        let descriptor = TypeDescriptor::<Widget>::new::<Widget, _>(|w| w);

        let widget = descriptor.activate(&provider).unwrap();
        assert_eq!(widget.0, 7);
        assert!(descriptor.implementation().type_name().contains("Widget"));
    }

    #[test]
    fn test_debug_names_type_descriptors() {
        let mut builder = OrderedDescriptors::<Widget>::builder();
        builder.add_type().add_value(Widget(0));
        let rendered = format!("{:?}", builder.build());
        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("Instance"));
    }
}
