// ==============================================
// MOCK CONCURRENCY TESTS (integration)
// ==============================================
//
// One CacheMock instance driven from several threads at once. Record
// selection is serialized through per-record locks, so concurrent calls
// against a times(N) record must consume exactly N invocations, never more,
// and verification after the threads quiesce must agree with the counts.

use std::sync::{Arc, Barrier};
use std::thread;

use cachemock::{CacheMock, Item, MockError};

const THREADS: usize = 8;

#[test]
fn planned_calls_are_consumed_exactly_once_each() {
    let mock = Arc::new(CacheMock::new());
    mock.expect_ping().times(THREADS as u32);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                mock.ping()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    mock.expectations_were_met().unwrap();
}

#[test]
fn surplus_callers_observe_exhaustion_not_overcounting() {
    let iterations = 50;

    for _ in 0..iterations {
        let planned = THREADS - 2;
        let mock = Arc::new(CacheMock::new());
        mock.expect_ping().times(planned as u32);

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let mock = Arc::clone(&mock);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    mock.ping()
                })
            })
            .collect();

        let mut successes = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(()) => successes += 1,
                Err(MockError::AllFulfilled { .. }) => exhausted += 1,
                Err(other) => panic!("unexpected error under contention: {other}"),
            }
        }

        assert_eq!(
            successes, planned,
            "a times(N) record must absorb exactly N concurrent calls"
        );
        assert_eq!(exhausted, THREADS - planned);
        mock.expectations_were_met().unwrap();
    }
}

#[test]
fn threads_race_for_optional_records_of_different_kinds() {
    let mock = Arc::new(CacheMock::new());
    let item = Item::new("shared", b"payload".to_vec());
    let half = (THREADS / 2) as u32;

    // Both optional: neither kind gates the other, whatever the interleave.
    mock.expect_get()
        .with_key("shared")
        .will_return_item(item.clone())
        .maybe()
        .times(half);
    mock.expect_ping().maybe().times(half);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            let expected = item.clone();
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    let got = mock.get("shared").unwrap();
                    assert_eq!(got, Some(expected));
                } else {
                    mock.ping().unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    mock.expectations_were_met().unwrap();
}

#[test]
fn concurrent_counter_calls_all_see_the_configured_value() {
    let mock = Arc::new(CacheMock::new());
    mock.expect_increment()
        .with_key_and_delta("counter", 1)
        .will_return_value(99)
        .times(THREADS as u32);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let mock = Arc::clone(&mock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                mock.increment("counter", 1)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 99);
    }
    mock.expectations_were_met().unwrap();
}
