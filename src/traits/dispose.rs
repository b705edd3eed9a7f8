//! Disposal traits for resource cleanup.

use crate::error::DiResult;

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that hold something to release
/// (connections, file handles, flush-on-close buffers). Release failures are
/// reported through the returned result and are not swallowed by callers in
/// this crate.
///
/// # Examples
///
/// ```
/// use ferrous_di_ordered::{Dispose, DiResult};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Cache {
///     flushed: AtomicBool,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) -> DiResult<()> {
///         self.flushed.store(true, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self) -> DiResult<()>;
}

/// Capability query: does this value expose a release operation?
///
/// Every [`Dispose`] type gets this for free and answers `Some(self)`. Value
/// types that never hold resources answer `None`; the crate implements that
/// for the common standard library value types.
///
/// Trait objects opt in through a supertrait bound, which lets an ordered
/// view mix disposable and plain implementations of one interface:
///
/// ```
/// use ferrous_di_ordered::{AsDispose, Dispose, DiResult};
///
/// trait Plugin: AsDispose + Send + Sync {
///     fn name(&self) -> &str;
/// }
///
/// struct Plain;
/// impl AsDispose for Plain {}
/// impl Plugin for Plain {
///     fn name(&self) -> &str { "plain" }
/// }
///
/// struct Pooled;
/// impl Dispose for Pooled {
///     fn dispose(&self) -> DiResult<()> { Ok(()) }
/// }
/// impl Plugin for Pooled {
///     fn name(&self) -> &str { "pooled" }
/// }
///
/// let plain: &dyn Plugin = &Plain;
/// let pooled: &dyn Plugin = &Pooled;
/// assert!(plain.as_dispose().is_none());
/// assert!(pooled.as_dispose().is_some());
/// ```
pub trait AsDispose {
    /// Returns the release capability of this value, if it has one.
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        None
    }
}

impl<D: Dispose> AsDispose for D {
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

macro_rules! impl_never_disposable {
    ($($ty:ty),* $(,)?) => {
        $(impl AsDispose for $ty {})*
    };
}

impl_never_disposable!(
    (), bool, char, str, String, &'static str,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
);

impl<T: 'static> AsDispose for Vec<T> {}
impl<T: 'static> AsDispose for Option<T> {}
impl<T: 'static> AsDispose for [T] {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;

    struct Handle;

    impl Dispose for Handle {
        fn dispose(&self) -> DiResult<()> {
            Err(DiError::dispose_failed("Handle", "already closed"))
        }
    }

    #[test]
    fn test_dispose_types_report_capability() {
        let handle = Handle;
        let capability = handle.as_dispose().expect("Handle implements Dispose");
        assert!(matches!(
            capability.dispose(),
            Err(DiError::DisposeFailed { service: "Handle", .. })
        ));
    }

    #[test]
    fn test_value_types_have_no_capability() {
        assert!("a".as_dispose().is_none());
        assert!(String::from("b").as_dispose().is_none());
        assert!(42u64.as_dispose().is_none());
        assert!(vec![1, 2, 3].as_dispose().is_none());
    }
}
