//! # Concurrency Tests
//!
//! Many threads hammer one shared filter. The filter lock and the cache
//! lock are independent, so adds, checks and corrections all interleave.

use std::sync::Arc;
use std::thread;

use corrected_filter::CorrectedFilter;
use rand::Rng;

const WRITERS: u64 = 8;
const PER_WRITER: u64 = 2_000;

/// Elements at or above this are never added.
const FOREIGN_BASE: u64 = 1 << 40;

#[test]
fn test_concurrent_add_and_check_disjoint() {
    let filter = Arc::new(
        CorrectedFilter::<u64>::new((WRITERS * PER_WRITER * 2) as usize, 0.001, 256).unwrap(),
    );

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    filter.add(&(w * PER_WRITER + i)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..5_000 {
                    let probe = FOREIGN_BASE + rng.gen_range(0..1_000_000);
                    if filter.check(&probe).unwrap() {
                        filter.mark_false_positive(&probe);
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("no thread may panic");
    }

    for i in 0..WRITERS * PER_WRITER {
        assert!(filter.check(&i).unwrap(), "lost {} under contention", i);
    }
    assert_eq!(filter.metrics().elements_inserted, WRITERS * PER_WRITER);
    assert!(filter.stats().items as u64 <= WRITERS * PER_WRITER);
}

#[test]
fn test_checks_see_own_prior_adds() {
    let filter = CorrectedFilter::<u64>::new(1 << 14, 0.0001, 64).unwrap();

    thread::scope(|scope| {
        for t in 0..4u64 {
            let filter = &filter;
            scope.spawn(move || {
                for i in 0..1_000 {
                    let key = t * 1_000_000 + i;
                    filter.add(&key).unwrap();
                    assert!(filter.check(&key).unwrap(), "thread {} lost {}", t, key);
                }
            });
        }
    });
}

#[test]
fn test_serialize_during_writes() {
    let filter = CorrectedFilter::<u64>::new(1 << 14, 0.001, 16).unwrap();

    let snapshots = thread::scope(|scope| {
        let writer = scope.spawn(|| {
            for i in 0..5_000u64 {
                filter.add(&i).unwrap();
            }
        });
        let reader = scope.spawn(|| (0..20).map(|_| filter.to_bytes()).collect::<Vec<_>>());

        writer.join().unwrap();
        reader.join().unwrap()
    });

    // Every snapshot was taken under the read lock, so each decodes cleanly
    for bytes in snapshots {
        CorrectedFilter::<u64>::from_bytes(&bytes, 16).expect("consistent snapshot");
    }
}
