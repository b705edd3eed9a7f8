//! Synchronization primitives.
//!
//! `once-cell` swaps the one-shot slots for `once_cell::sync::OnceCell`.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

#[cfg(feature = "once-cell")]
pub(crate) type OnceSlot<V> = once_cell::sync::OnceCell<V>;
#[cfg(not(feature = "once-cell"))]
pub(crate) type OnceSlot<V> = std::sync::OnceLock<V>;

pub(crate) type ContainerGuard<'a> = ReentrantMutexGuard<'a, ()>;

/// Mutual exclusion handle owned by a descriptor container.
///
/// Guards no data of its own: it serializes materialization and disposal of
/// every ordered view built over the same container. The holding thread may
/// acquire it again, so a factory can use a sibling view of its container.
#[derive(Default)]
pub(crate) struct ContainerLock {
    inner: ReentrantMutex<()>,
}

impl ContainerLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock is held by the current thread.
    pub(crate) fn acquire(&self) -> ContainerGuard<'_> {
        self.inner.lock()
    }
}

/// Marks a pass as running on one view; cleared on drop, unwinding included.
///
/// Only touched while the container lock is held, so a set flag seen by the
/// lock holder means the pass re-entered itself.
pub(crate) struct PassGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PassGuard<'a> {
    /// Sets `flag`, or returns `None` if a pass is already running.
    pub(crate) fn enter(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_lock_serializes_critical_sections() {
        let lock = Arc::new(ContainerLock::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        crossbeam_utils::thread::scope(|s| {
            for _ in 0..8 {
                let lock = lock.clone();
                let inside = inside.clone();
                let max_seen = max_seen.clone();
                s.spawn(move |_| {
                    for _ in 0..100 {
                        let _guard = lock.acquire();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lock_is_reentrant_on_the_holding_thread() {
        let lock = ContainerLock::new();
        let outer = lock.acquire();
        let inner = lock.acquire();
        drop(inner);
        drop(outer);

        // Still excludes other threads while held.
        let _held = lock.acquire();
        crossbeam_utils::thread::scope(|s| {
            s.spawn(|_| assert!(lock.inner.try_lock().is_none()));
        })
        .unwrap();
    }

    #[test]
    fn test_pass_guard_rejects_nested_entry_and_resets() {
        let flag = AtomicBool::new(false);
        {
            let _pass = PassGuard::enter(&flag).unwrap();
            assert!(PassGuard::enter(&flag).is_none());
        }
        assert!(!flag.load(Ordering::SeqCst));
        assert!(PassGuard::enter(&flag).is_some());
    }

    #[test]
    fn test_once_slot_keeps_first_value() {
        let slot: OnceSlot<u32> = OnceSlot::new();
        assert!(slot.get().is_none());
        assert_eq!(*slot.get_or_init(|| 1), 1);
        assert_eq!(*slot.get_or_init(|| 2), 1);
    }
}
