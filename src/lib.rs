//! cachemock: a programmable test double for a memcache-style cache client.
//!
//! Tests register an ordered sequence of expected operations — with argument
//! matchers, forced results, and call-count rules — then hand the mock to the
//! code under test as if it were a real client. Each incoming call is matched
//! against the pending expectations in registration order; at the end of the
//! test, [`CacheMock::expectations_were_met`] asserts that every required
//! expectation was consumed.
//!
//! ## Key Components
//! - [`CacheMock`]: the facade — `expect_*` registration methods returning
//!   chainable builders, one mocked client method per operation kind, and
//!   end-of-test verification.
//! - [`Item`]: the cache entry value object matched and returned by the
//!   item-carrying operations.
//! - [`MockError`] / [`Mismatch`]: the error taxonomy — forced errors,
//!   argument mismatches, ordering failures, exhaustion, unmet expectations.
//!
//! ## Ordering
//! Expectations assert call order, not just call content. A required
//! expectation gates everything registered after it: a call that would match
//! a later record fails instead, naming the blocking expectation. Optional
//! expectations (`maybe()`) and already-fulfilled records are skipped
//! transparently.
//!
//! ## Example Usage
//! ```
//! use cachemock::{CacheMock, Item};
//!
//! let mock = CacheMock::new();
//! let item = Item::new("foo", b"bar".to_vec());
//!
//! mock.expect_set().with_item(item.clone());
//! mock.expect_get().with_key("foo").will_return_item(item.clone());
//! mock.expect_ping().maybe();
//!
//! // ...hand `mock` to the code under test...
//! mock.set(Some(&item)).unwrap();
//! assert_eq!(mock.get("foo").unwrap(), Some(item));
//!
//! mock.expectations_were_met().unwrap();
//! ```
//!
//! ## Thread Safety
//! All methods take `&self`; share the mock with `Arc` to drive it from
//! several threads. Each expectation carries its own lock, so concurrent
//! calls serialize per record rather than through one global lock.

pub mod error;
pub mod expectation;
pub mod item;
mod matchers;
pub mod mock;
pub mod prelude;
mod queue;

pub use error::{ClientError, Mismatch, MockError};
pub use item::Item;
pub use mock::CacheMock;
