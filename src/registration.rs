//! Provider registration records.

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type ErasedFactory =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// How a provider produces the value registered under a key.
pub(crate) enum Registration {
    /// Pre-built value, handed out as-is on every resolution
    Instance(AnyArc),
    /// Runs on every resolution
    Factory(ErasedFactory),
}

impl Registration {
    pub(crate) fn resolve(&self, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
        match self {
            Registration::Instance(value) => Ok(Arc::clone(value)),
            Registration::Factory(factory) => factory(context),
        }
    }
}
