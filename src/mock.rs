//! The mock cache client facade.
//!
//! ## Key Components
//! - [`CacheMock`]: the object tests hold. One `expect_*` registration
//!   method per operation kind (returns that kind's chainable builder
//!   handle) and one invocation method per kind (runs the matching engine
//!   and returns the stored outcome). [`CacheMock::expectations_were_met`]
//!   asserts at the end of a test that every required expectation was
//!   consumed.
//!
//! ## Example Usage
//! ```
//! use cachemock::{CacheMock, Item};
//!
//! let mock = CacheMock::new();
//! let item = Item::new("foo", b"bar".to_vec());
//!
//! mock.expect_set().with_item(item.clone());
//! mock.expect_get()
//!     .with_key("foo")
//!     .will_return_item(item.clone());
//!
//! mock.set(Some(&item)).unwrap();
//! assert_eq!(mock.get("foo").unwrap(), Some(item));
//! mock.expectations_were_met().unwrap();
//! ```
//!
//! ## Thread Safety
//! Every method takes `&self`; wrap the mock in an `Arc` to drive it from
//! several threads at once. Registration is meant to finish before
//! concurrent invocation starts, and verification to run after it ends.

use rustc_hash::FxHashMap;

use crate::error::MockError;
use crate::expectation::{
    CounterDetail, Detail, ExpectedAdd, ExpectedAppend, ExpectedClose, ExpectedCompareAndSwap,
    ExpectedDecrement, ExpectedDelete, ExpectedDeleteAll, ExpectedFlushAll, ExpectedGet,
    ExpectedGetMulti, ExpectedIncrement, ExpectedPing, ExpectedPrepend, ExpectedReplace,
    ExpectedSet, ExpectedTouch, ItemDetail, Method,
};
use crate::item::Item;
use crate::matchers;
use crate::queue::{ExpectationQueue, Probe};

/// Programmable test double for a memcache-style cache client.
#[derive(Debug, Default)]
pub struct CacheMock {
    queue: ExpectationQueue,
}

fn item_probe(detail: &ItemDetail, actual: Option<&Item>) -> Probe<()> {
    match matchers::item_matches(detail.expected.as_ref(), actual) {
        Ok(()) => Probe::Matched(()),
        Err(m) => Probe::Mismatch(m),
    }
}

fn counter_probe(detail: &CounterDetail, key: &str, delta: u64) -> Probe<u64> {
    let outcome = matchers::key_matches(detail.key.as_deref(), key)
        .and_then(|()| matchers::delta_matches(detail.delta, delta));
    match outcome {
        Ok(()) => Probe::Matched(detail.value),
        Err(m) => Probe::Mismatch(m),
    }
}

impl CacheMock {
    /// Creates a mock with an empty expectation queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if any registered expectation is neither fulfilled nor
    /// optional, naming the first such expectation. Run this after the code
    /// under test has finished, with no invocations still in flight.
    pub fn expectations_were_met(&self) -> Result<(), MockError> {
        self.queue.verify()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Expects `add` to be called.
    pub fn expect_add(&self) -> ExpectedAdd {
        ExpectedAdd {
            record: self.queue.push(Detail::Add(ItemDetail::default())),
        }
    }

    /// Expects `append` to be called.
    pub fn expect_append(&self) -> ExpectedAppend {
        ExpectedAppend {
            record: self.queue.push(Detail::Append(ItemDetail::default())),
        }
    }

    /// Expects `close` to be called.
    pub fn expect_close(&self) -> ExpectedClose {
        ExpectedClose {
            record: self.queue.push(Detail::Close),
        }
    }

    /// Expects `compare_and_swap` to be called.
    pub fn expect_compare_and_swap(&self) -> ExpectedCompareAndSwap {
        ExpectedCompareAndSwap {
            record: self
                .queue
                .push(Detail::CompareAndSwap(ItemDetail::default())),
        }
    }

    /// Expects `decrement` to be called.
    pub fn expect_decrement(&self) -> ExpectedDecrement {
        ExpectedDecrement {
            record: self.queue.push(Detail::Decrement(CounterDetail::default())),
        }
    }

    /// Expects `delete` to be called.
    pub fn expect_delete(&self) -> ExpectedDelete {
        ExpectedDelete {
            record: self.queue.push(Detail::Delete(Default::default())),
        }
    }

    /// Expects `delete_all` to be called.
    pub fn expect_delete_all(&self) -> ExpectedDeleteAll {
        ExpectedDeleteAll {
            record: self.queue.push(Detail::DeleteAll),
        }
    }

    /// Expects `flush_all` to be called.
    pub fn expect_flush_all(&self) -> ExpectedFlushAll {
        ExpectedFlushAll {
            record: self.queue.push(Detail::FlushAll),
        }
    }

    /// Expects `get` to be called.
    pub fn expect_get(&self) -> ExpectedGet {
        ExpectedGet {
            record: self.queue.push(Detail::Get(Default::default())),
        }
    }

    /// Expects `get_multi` to be called.
    pub fn expect_get_multi(&self) -> ExpectedGetMulti {
        ExpectedGetMulti {
            record: self.queue.push(Detail::GetMulti(Default::default())),
        }
    }

    /// Expects `increment` to be called.
    pub fn expect_increment(&self) -> ExpectedIncrement {
        ExpectedIncrement {
            record: self.queue.push(Detail::Increment(CounterDetail::default())),
        }
    }

    /// Expects `ping` to be called.
    pub fn expect_ping(&self) -> ExpectedPing {
        ExpectedPing {
            record: self.queue.push(Detail::Ping),
        }
    }

    /// Expects `prepend` to be called.
    pub fn expect_prepend(&self) -> ExpectedPrepend {
        ExpectedPrepend {
            record: self.queue.push(Detail::Prepend(ItemDetail::default())),
        }
    }

    /// Expects `replace` to be called.
    pub fn expect_replace(&self) -> ExpectedReplace {
        ExpectedReplace {
            record: self.queue.push(Detail::Replace(ItemDetail::default())),
        }
    }

    /// Expects `set` to be called.
    pub fn expect_set(&self) -> ExpectedSet {
        ExpectedSet {
            record: self.queue.push(Detail::Set(ItemDetail::default())),
        }
    }

    /// Expects `touch` to be called.
    pub fn expect_touch(&self) -> ExpectedTouch {
        ExpectedTouch {
            record: self.queue.push(Detail::Touch(Default::default())),
        }
    }

    // -----------------------------------------------------------------------
    // Invocation
    // -----------------------------------------------------------------------

    /// Mocked `add`.
    pub fn add(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue.find(Method::Add, |record| match &record.detail {
            Detail::Add(d) => item_probe(d, item),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `append`.
    pub fn append(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue.find(Method::Append, |record| match &record.detail {
            Detail::Append(d) => item_probe(d, item),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `close`.
    pub fn close(&self) -> Result<(), MockError> {
        self.queue.find(Method::Close, |record| match &record.detail {
            Detail::Close => Probe::Matched(()),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `compare_and_swap`.
    pub fn compare_and_swap(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue
            .find(Method::CompareAndSwap, |record| match &record.detail {
                Detail::CompareAndSwap(d) => item_probe(d, item),
                _ => Probe::WrongKind,
            })
    }

    /// Mocked `decrement`; returns the configured counter value.
    pub fn decrement(&self, key: &str, delta: u64) -> Result<u64, MockError> {
        self.queue
            .find(Method::Decrement, |record| match &record.detail {
                Detail::Decrement(d) => counter_probe(d, key, delta),
                _ => Probe::WrongKind,
            })
    }

    /// Mocked `delete`.
    pub fn delete(&self, key: &str) -> Result<(), MockError> {
        self.queue.find(Method::Delete, |record| match &record.detail {
            Detail::Delete(d) => match matchers::key_matches(d.key.as_deref(), key) {
                Ok(()) => Probe::Matched(()),
                Err(m) => Probe::Mismatch(m),
            },
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `delete_all`.
    pub fn delete_all(&self) -> Result<(), MockError> {
        self.queue
            .find(Method::DeleteAll, |record| match &record.detail {
                Detail::DeleteAll => Probe::Matched(()),
                _ => Probe::WrongKind,
            })
    }

    /// Mocked `flush_all`.
    pub fn flush_all(&self) -> Result<(), MockError> {
        self.queue.find(Method::FlushAll, |record| match &record.detail {
            Detail::FlushAll => Probe::Matched(()),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `get`; returns the configured item, if any.
    pub fn get(&self, key: &str) -> Result<Option<Item>, MockError> {
        self.queue.find(Method::Get, |record| match &record.detail {
            Detail::Get(d) => match matchers::key_matches(d.key.as_deref(), key) {
                Ok(()) => Probe::Matched(d.item.clone()),
                Err(m) => Probe::Mismatch(m),
            },
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `get_multi`; returns the configured key→item mapping.
    pub fn get_multi(&self, keys: &[&str]) -> Result<FxHashMap<String, Item>, MockError> {
        self.queue.find(Method::GetMulti, |record| match &record.detail {
            Detail::GetMulti(d) => match matchers::keys_match(d.keys.as_deref(), keys) {
                Ok(()) => Probe::Matched(d.items.clone()),
                Err(m) => Probe::Mismatch(m),
            },
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `increment`; returns the configured counter value.
    pub fn increment(&self, key: &str, delta: u64) -> Result<u64, MockError> {
        self.queue
            .find(Method::Increment, |record| match &record.detail {
                Detail::Increment(d) => counter_probe(d, key, delta),
                _ => Probe::WrongKind,
            })
    }

    /// Mocked `ping`.
    pub fn ping(&self) -> Result<(), MockError> {
        self.queue.find(Method::Ping, |record| match &record.detail {
            Detail::Ping => Probe::Matched(()),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `prepend`.
    pub fn prepend(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue.find(Method::Prepend, |record| match &record.detail {
            Detail::Prepend(d) => item_probe(d, item),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `replace`.
    pub fn replace(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue.find(Method::Replace, |record| match &record.detail {
            Detail::Replace(d) => item_probe(d, item),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `set`.
    pub fn set(&self, item: Option<&Item>) -> Result<(), MockError> {
        self.queue.find(Method::Set, |record| match &record.detail {
            Detail::Set(d) => item_probe(d, item),
            _ => Probe::WrongKind,
        })
    }

    /// Mocked `touch`.
    pub fn touch(&self, key: &str, seconds: i32) -> Result<(), MockError> {
        self.queue.find(Method::Touch, |record| match &record.detail {
            Detail::Touch(d) => {
                let outcome = matchers::key_matches(d.key.as_deref(), key)
                    .and_then(|()| matchers::seconds_match(d.seconds, seconds));
                match outcome {
                    Ok(()) => Probe::Matched(()),
                    Err(m) => Probe::Mismatch(m),
                }
            }
            _ => Probe::WrongKind,
        })
    }
}
