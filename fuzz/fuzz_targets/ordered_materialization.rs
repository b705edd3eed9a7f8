#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_di_ordered::{AsDispose, DiError, DiResult, Dispose, OrderedDescriptors, ServiceCollection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Item: AsDispose + Send + Sync {
    fn id(&self) -> usize;
    fn disposable(&self) -> bool;
}

struct Plain(usize);

impl AsDispose for Plain {}

impl Item for Plain {
    fn id(&self) -> usize { self.0 }
    fn disposable(&self) -> bool { false }
}

struct Releasable {
    id: usize,
    releases: Arc<AtomicUsize>,
    fail_release: bool,
}

impl Dispose for Releasable {
    fn dispose(&self) -> DiResult<()> {
        if self.fail_release {
            return Err(DiError::dispose_failed("Releasable", "fuzzed failure"));
        }
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Item for Releasable {
    fn id(&self) -> usize { self.id }
    fn disposable(&self) -> bool { true }
}

fuzz_target!(|data: &[u8]| {
    let releases = Arc::new(AtomicUsize::new(0));
    let mut builder = OrderedDescriptors::<dyn Item>::builder();
    let mut expect_error = false;

    // Each byte picks one descriptor: low bits choose the kind, high bits flags.
    for (id, byte) in data.iter().take(64).enumerate() {
        let value: Arc<dyn Item> = if byte & 0x10 != 0 {
            Arc::new(Releasable {
                id,
                releases: releases.clone(),
                fail_release: byte & 0x60 == 0x60,
            })
        } else {
            Arc::new(Plain(id))
        };
        match byte % 4 {
            0 => {
                builder.add_instance(value);
            }
            1 => {
                builder.add_factory(move |_| Ok(value.clone()));
            }
            2 => {
                builder.add_factory(|_| Err(DiError::NotFound("fuzzed")));
                expect_error = true;
            }
            _ => {
                builder.add_async_factory(move |_| {
                    let value = value.clone();
                    async move { Ok(value) }
                });
                expect_error = true;
            }
        }
    }

    let ordered = ServiceCollection::new().build().ordered(builder.build());
    assert!(ordered.dispose().is_ok());

    match ordered.to_vec() {
        Ok(values) => {
            assert!(!expect_error);
            for (index, value) in values.iter().enumerate() {
                assert_eq!(value.id(), index);
            }
            let disposables = values.iter().filter(|v| v.disposable()).count();
            assert_eq!(ordered.disposable_count(), disposables);

            // Repeated disposal never releases a value twice.
            for _ in 0..3 {
                let _ = ordered.dispose();
            }
            assert!(releases.load(Ordering::SeqCst) <= disposables);
        }
        Err(_) => {
            assert!(expect_error);
            assert!(!ordered.is_materialized());
        }
    }
});
