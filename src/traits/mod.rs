//! Core traits: the provider seam and the disposal capability.

mod dispose;
mod resolver;

pub use dispose::{AsDispose, Dispose};
pub use resolver::{Resolver, ResolverCore};
