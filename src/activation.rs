//! Constructor injection without reflection.
//!
//! A type descriptor names an implementation type that the provider must
//! build, pulling that type's dependencies from itself. Rust has no runtime
//! activator, so each activatable type declares its constructor through
//! [`Activate`], and [`ImplementationType`] captures the monomorphized
//! constructor next to the type's key.

use std::fmt;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::{key_of_type, Key};
use crate::provider::ResolverContext;
use crate::registration::AnyArc;

/// Types that can be constructed by a provider.
///
/// `activate` receives the provider (as a [`ResolverContext`]) and resolves
/// whatever the type depends on. Errors from those lookups should be
/// propagated with `?`.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{Activate, DiResult, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Settings { retries: u32 }
/// struct Client { settings: Arc<Settings> }
///
/// impl Activate for Client {
///     fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Client { settings: resolver.get::<Settings>()? })
///     }
/// }
/// ```
pub trait Activate: Sized + Send + Sync + 'static {
    /// Builds `Self`, resolving dependencies from `resolver`.
    fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

type Constructor = for<'a> fn(&ResolverContext<'a>) -> DiResult<AnyArc>;

/// A reference to an activatable implementation type.
///
/// Cheap to copy. Carries the type's [`Key`] for diagnostics and its
/// type-erased constructor.
#[derive(Clone, Copy)]
pub struct ImplementationType {
    key: Key,
    ctor: Constructor,
}

impl ImplementationType {
    /// Captures the implementation type `I`.
    pub fn of<I: Activate>() -> Self {
        Self {
            key: key_of_type::<I>(),
            ctor: construct_erased::<I>,
        }
    }

    /// The key of the implementation type.
    pub fn key(&self) -> Key {
        self.key
    }

    /// The implementation type's name.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Runs the constructor against `resolver`.
    ///
    /// This is what providers call from
    /// [`ResolverCore::create_instance`](crate::ResolverCore::create_instance).
    pub fn construct(&self, resolver: &ResolverContext<'_>) -> DiResult<AnyArc> {
        (self.ctor)(resolver)
    }
}

impl fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("type", &self.type_name())
            .finish()
    }
}

fn construct_erased<I: Activate>(resolver: &ResolverContext<'_>) -> DiResult<AnyArc> {
    let instance = I::activate(resolver)?;
    Ok(Arc::new(instance))
}
