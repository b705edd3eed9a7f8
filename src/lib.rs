//! # ferrous-di-ordered
//!
//! Ordered, lazily materialized views over multi-registrations, in the style
//! of Microsoft.Extensions.DependencyInjection's ordered enumerables.
//!
//! ## Features
//!
//! - **Registration order**: values come back exactly in descriptor order
//! - **Materialized once**: factories and constructors run on the first
//!   iteration only, even under concurrent first access
//! - **Mixed strategies**: factory, activated type and pre-built instance
//!   descriptors in one list
//! - **Dispose-all**: values with a release capability are recorded during
//!   materialization and released together, in order
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_di_ordered::{AsDispose, OrderedDescriptors, ServiceCollection};
//! use std::sync::Arc;
//!
//! trait Middleware: AsDispose + Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! struct Auth;
//! impl AsDispose for Auth {}
//! impl Middleware for Auth {
//!     fn name(&self) -> &str { "auth" }
//! }
//!
//! struct Compression;
//! impl AsDispose for Compression {}
//! impl Middleware for Compression {
//!     fn name(&self) -> &str { "compression" }
//! }
//!
//! let mut pipeline = OrderedDescriptors::<dyn Middleware>::builder();
//! pipeline
//!     .add_instance(Arc::new(Auth))
//!     .add_factory(|_| Ok(Arc::new(Compression) as Arc<dyn Middleware>));
//!
//! let provider = ServiceCollection::new().build();
//! let ordered = provider.ordered(pipeline.build());
//!
//! let names: Vec<String> = ordered
//!     .iter()
//!     .unwrap()
//!     .map(|m| m.name().to_string())
//!     .collect();
//! assert_eq!(names, ["auth", "compression"]);
//! ```
//!
//! ## Disposal
//!
//! ```rust
//! use ferrous_di_ordered::{DiResult, Dispose, OrderedDescriptors, ServiceCollection};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! struct Pool { closed: AtomicBool }
//!
//! impl Dispose for Pool {
//!     fn dispose(&self) -> DiResult<()> {
//!         self.closed.store(true, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! let pool = Arc::new(Pool { closed: AtomicBool::new(false) });
//! let mut builder = OrderedDescriptors::<Pool>::builder();
//! builder.add_instance(pool.clone());
//!
//! let ordered = ServiceCollection::new().build().ordered(builder.build());
//! ordered.dispose().unwrap(); // nothing materialized yet, nothing released
//! assert!(!pool.closed.load(Ordering::SeqCst));
//!
//! ordered.iter().unwrap();
//! ordered.dispose().unwrap();
//! assert!(pool.closed.load(Ordering::SeqCst));
//! ```

// Module declarations
pub mod activation;
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod observer;
pub mod ordered;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use activation::{Activate, ImplementationType};
pub use collection::ServiceCollection;
pub use descriptors::{
    AsyncFactoryDescriptor, BoxFuture, DescriptorKind, FactoryDescriptor, OrderedDescriptors,
    OrderedDescriptorsBuilder, ServiceDescriptor, TypeDescriptor,
};
pub use error::{DiError, DiResult};
pub use key::{key_of_named, key_of_type, Key};
pub use observer::{OrderedObserver, TracingObserver};
pub use ordered::{Ordered, OrderedIter};
pub use provider::{ResolverContext, ServiceProvider};
pub use registration::AnyArc;
pub use traits::{AsDispose, Dispose, Resolver, ResolverCore};
