//! Internal implementation details.

pub(crate) mod sync;

pub(crate) use sync::{ContainerLock, OnceSlot, PassGuard};
