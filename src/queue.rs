//! Ordered expectation queue and the matching algorithm.
//!
//! ## Architecture
//!
//! ```text
//! find(method, probe):
//!
//!   for each record, in registration order:
//!       lock record
//!       fulfilled?            → unlock, count as exhausted, next record
//!       probe(record):
//!         Matched(payload)    → fulfill under the held lock, return the
//!                               forced error if configured, else payload
//!         Mismatch / WrongKind:
//!             optional record → unlock, next record
//!             required record → fail the call: a required expectation
//!                               gates everything registered after it
//!   nothing selected:
//!       every record exhausted → AllFulfilled
//!       otherwise              → Unexpected
//! ```
//!
//! The gate rule is deliberate: expectations assert the order a real client
//! would issue calls in, so a required record must be the next thing matched
//! (after skipping fulfilled records and non-matching optional ones), and a
//! call that belongs further down the queue fails instead of matching early.
//!
//! ## Thread Safety
//! - The record vector takes a `RwLock`: written during registration, read
//!   for the whole of a scan. Registration is assumed to finish before
//!   concurrent invocation begins.
//! - Each record has its own `Mutex`, held for the shortest span that covers
//!   test-and-increment. Two scans may inspect different records at the same
//!   time; which of two racing calls claims which record is unspecified
//!   beyond the gate rule as seen by each scan.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{Mismatch, MockError};
use crate::expectation::{Detail, Method, Record, SharedRecord};

/// Outcome of probing one record during a scan, produced by the typed
/// comparison closure an invocation method supplies.
pub(crate) enum Probe<T> {
    /// The record expects a different operation kind.
    WrongKind,
    /// Kind matched but the arguments did not.
    Mismatch(Mismatch),
    /// Full match; payload extracted under the record lock.
    Matched(T),
}

/// Pending expectations in registration order.
#[derive(Debug, Default)]
pub(crate) struct ExpectationQueue {
    records: RwLock<Vec<SharedRecord>>,
}

impl ExpectationQueue {
    /// Appends a fresh record and returns it for the builder handle.
    pub(crate) fn push(&self, detail: Detail) -> SharedRecord {
        let record = Record::new(detail);
        self.records.write().push(Arc::clone(&record));
        record
    }

    /// Scans for the first record that accepts this call and consumes one
    /// invocation from it. See the module docs for the full algorithm.
    pub(crate) fn find<T>(
        &self,
        method: Method,
        probe: impl Fn(&Record) -> Probe<T>,
    ) -> Result<T, MockError> {
        let records = self.records.read();
        let mut exhausted = 0usize;
        for shared in records.iter() {
            let mut record = shared.lock();
            if record.common.fulfilled() {
                exhausted += 1;
                continue;
            }
            match probe(&record) {
                Probe::Matched(payload) => {
                    // Increment and unlock are atomic with respect to other
                    // scans: the guard is still held here.
                    record.common.fulfill();
                    debug!(%method, triggered = record.common.triggered, "expectation matched");
                    return match record.common.forced.clone() {
                        Some(err) => Err(MockError::Client(err)),
                        None => Ok(payload),
                    };
                }
                Probe::Mismatch(mismatch) => {
                    if record.common.optional {
                        trace!(%method, "skipping optional expectation with mismatching arguments");
                        continue;
                    }
                    return Err(MockError::Mismatch(mismatch));
                }
                Probe::WrongKind => {
                    if record.common.optional {
                        trace!(%method, skipped = %record.method(), "skipping optional expectation of another kind");
                        continue;
                    }
                    return Err(MockError::Blocked {
                        method,
                        next: record.to_string(),
                    });
                }
            }
        }

        if !records.is_empty() && exhausted == records.len() {
            Err(MockError::AllFulfilled { method })
        } else {
            Err(MockError::Unexpected { method })
        }
    }

    /// Fails on the first record that is neither fulfilled nor optional.
    /// Meant to run once invocation traffic has quiesced.
    pub(crate) fn verify(&self) -> Result<(), MockError> {
        for shared in self.records.read().iter() {
            let record = shared.lock();
            if !record.common.satisfied() {
                debug!(unmet = %record.method(), "verification failed");
                return Err(MockError::Unmet {
                    expectation: record.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::{DeleteDetail, GetDetail};
    use crate::matchers;

    fn key_probe(record: &Record, key: &str) -> Probe<()> {
        match &record.detail {
            Detail::Delete(d) => match matchers::key_matches(d.key.as_deref(), key) {
                Ok(()) => Probe::Matched(()),
                Err(m) => Probe::Mismatch(m),
            },
            _ => Probe::WrongKind,
        }
    }

    fn delete_detail(key: &str) -> Detail {
        Detail::Delete(DeleteDetail {
            key: Some(key.into()),
        })
    }

    #[test]
    fn empty_queue_reports_a_plain_unexpected_call() {
        let queue = ExpectationQueue::default();
        let err = queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap_err();
        assert!(matches!(err, MockError::Unexpected { .. }));
    }

    #[test]
    fn consumed_queue_reports_all_fulfilled() {
        let queue = ExpectationQueue::default();
        queue.push(delete_detail("k"));
        queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap();

        let err = queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap_err();
        assert!(matches!(err, MockError::AllFulfilled { .. }));
    }

    #[test]
    fn required_record_of_another_kind_blocks_the_scan() {
        let queue = ExpectationQueue::default();
        queue.push(Detail::Get(GetDetail {
            key: Some("k".into()),
            item: None,
        }));
        // Would match, but the Get record in front of it is required.
        queue.push(delete_detail("k"));

        let err = queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap_err();
        match err {
            MockError::Blocked { next, .. } => assert!(next.contains("Get()")),
            other => panic!("expected Blocked, got {other}"),
        }
    }

    #[test]
    fn optional_record_is_skipped_transparently() {
        let queue = ExpectationQueue::default();
        let ping = queue.push(Detail::Ping);
        ping.lock().common.optional = true;
        queue.push(delete_detail("k"));

        queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap();
        queue.verify().unwrap();
    }

    #[test]
    fn mismatch_on_a_required_record_fails_and_leaves_it_unfulfilled() {
        let queue = ExpectationQueue::default();
        queue.push(delete_detail("k"));

        let err = queue
            .find(Method::Delete, |r| key_probe(r, "other"))
            .unwrap_err();
        assert!(matches!(err, MockError::Mismatch(Mismatch::Key { .. })));
        assert!(matches!(queue.verify(), Err(MockError::Unmet { .. })));
    }

    #[test]
    fn planned_calls_absorb_consecutive_matches() {
        let queue = ExpectationQueue::default();
        let record = queue.push(delete_detail("k"));
        record.lock().common.planned_calls = 2;

        queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap();
        assert!(matches!(queue.verify(), Err(MockError::Unmet { .. })));
        queue.find(Method::Delete, |r| key_probe(r, "k")).unwrap();
        queue.verify().unwrap();
    }
}
