//! Error types for ordered service resolution.

use std::fmt;

use crate::descriptors::DescriptorKind;

/// Dependency injection errors
///
/// Represents the failures that can surface while an ordered view
/// materializes its descriptors or releases its disposable values.
///
/// Errors raised by a provider or by a release call are passed through
/// unchanged; the ordered resolver only raises
/// [`UnsupportedDescriptorKind`](DiError::UnsupportedDescriptorKind) and
/// [`Reentrant`](DiError::Reentrant) itself.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_ordered::{DescriptorKind, DiError};
///
/// let not_found = DiError::NotFound("MyService");
/// let unsupported = DiError::UnsupportedDescriptorKind(DescriptorKind::AsyncFactory);
///
/// assert_eq!(not_found.to_string(), "Service not found: MyService");
/// assert_eq!(
///     unsupported.to_string(),
///     "Unsupported service descriptor kind 'async factory'"
/// );
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Service not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Descriptor kind cannot be materialized synchronously
    UnsupportedDescriptorKind(DescriptorKind),
    /// A constructor rejected its resolved inputs
    Activation {
        service: &'static str,
        message: String,
    },
    /// A release call failed
    DisposeFailed {
        service: &'static str,
        message: String,
    },
    /// A view was used again from inside its own materialization or
    /// disposal pass (includes the service name)
    Reentrant(&'static str),
}

impl DiError {
    /// Convenience constructor for [`DiError::Activation`].
    pub fn activation(service: &'static str, message: impl Into<String>) -> Self {
        DiError::Activation {
            service,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`DiError::DisposeFailed`].
    pub fn dispose_failed(service: &'static str, message: impl Into<String>) -> Self {
        DiError::DisposeFailed {
            service,
            message: message.into(),
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::UnsupportedDescriptorKind(kind) => {
                write!(f, "Unsupported service descriptor kind '{}'", kind)
            }
            DiError::Activation { service, message } => {
                write!(f, "Failed to activate {}: {}", service, message)
            }
            DiError::DisposeFailed { service, message } => {
                write!(f, "Failed to dispose {}: {}", service, message)
            }
            DiError::Reentrant(service) => {
                write!(f, "Reentrant access to ordered {} during its own pass", service)
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_ordered::{DiError, DiResult};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service"))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
