//! Expectation records and their typed builder handles.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Arc<Mutex<Record>>                                              │
//! │  ┌────────────────────────┬───────────────────────────────────┐  │
//! │  │ CommonState            │ Detail (closed enum, one variant  │  │
//! │  │  triggered             │ per operation kind)               │  │
//! │  │  planned_calls         │  matcher fields for that kind     │  │
//! │  │  optional              │  success payload for that kind    │  │
//! │  │  forced error          │                                   │  │
//! │  └────────────────────────┴───────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//!          ▲ shared by                       ▲ shared by
//!   the expectation queue             the typed handle returned
//!   (matching, verification)          by `expect_*` (fluent setup)
//! ```
//!
//! A record's identity and queue position never change after registration.
//! During matching only `triggered` mutates, always under the record's own
//! `parking_lot::Mutex`. The handles mutate matcher and outcome fields
//! through the same lock, but only during single-threaded test setup.
//!
//! The operation set is fixed and closed, so kind dispatch is a plain enum
//! rather than trait objects; every handle is constructed with the variant
//! it names and its setters touch only that variant.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::ClientError;
use crate::item::Item;

/// One of the sixteen operations the mock can expect. Used in error
/// messages; displays as the method call, e.g. `Get()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Method {
    Add,
    Append,
    Close,
    CompareAndSwap,
    Decrement,
    Delete,
    DeleteAll,
    FlushAll,
    Get,
    GetMulti,
    Increment,
    Ping,
    Prepend,
    Replace,
    Set,
    Touch,
}

impl Method {
    /// The client method this kind stands for, rendered as a call.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add()",
            Self::Append => "Append()",
            Self::Close => "Close()",
            Self::CompareAndSwap => "CompareAndSwap()",
            Self::Decrement => "Decrement()",
            Self::Delete => "Delete()",
            Self::DeleteAll => "DeleteAll()",
            Self::FlushAll => "FlushAll()",
            Self::Get => "Get()",
            Self::GetMulti => "GetMulti()",
            Self::Increment => "Increment()",
            Self::Ping => "Ping()",
            Self::Prepend => "Prepend()",
            Self::Replace => "Replace()",
            Self::Set => "Set()",
            Self::Touch => "Touch()",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record state
// ---------------------------------------------------------------------------

/// Fulfillment bookkeeping and outcome shared by every expectation kind.
#[derive(Debug, Default)]
pub(crate) struct CommonState {
    /// Invocations consumed so far. Increases only under the record lock.
    pub(crate) triggered: u32,
    /// Minimum matching calls before the record is fulfilled; 0 and 1 both
    /// mean one call.
    pub(crate) planned_calls: u32,
    /// Optional records never fail verification and are skipped freely
    /// during matching.
    pub(crate) optional: bool,
    /// Error returned verbatim on every matching call.
    pub(crate) forced: Option<ClientError>,
}

impl CommonState {
    pub(crate) fn fulfilled(&self) -> bool {
        self.triggered >= self.planned_calls.max(1)
    }

    /// Whether verification considers this record done.
    pub(crate) fn satisfied(&self) -> bool {
        self.fulfilled() || self.optional
    }

    /// Consumes one invocation. Caller must hold the record lock.
    pub(crate) fn fulfill(&mut self) {
        self.triggered += 1;
    }
}

/// Matcher for the six item-carrying operations (add, append,
/// compare-and-swap, prepend, replace, set).
#[derive(Debug, Default)]
pub(crate) struct ItemDetail {
    /// `None` expects the call to carry no item.
    pub(crate) expected: Option<Item>,
}

#[derive(Debug, Default)]
pub(crate) struct DeleteDetail {
    pub(crate) key: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct GetDetail {
    pub(crate) key: Option<String>,
    pub(crate) item: Option<Item>,
}

#[derive(Debug, Default)]
pub(crate) struct GetMultiDetail {
    pub(crate) keys: Option<Vec<String>>,
    pub(crate) items: FxHashMap<String, Item>,
}

/// Matcher and payload for increment/decrement.
#[derive(Debug, Default)]
pub(crate) struct CounterDetail {
    pub(crate) key: Option<String>,
    pub(crate) delta: Option<u64>,
    pub(crate) value: u64,
}

#[derive(Debug, Default)]
pub(crate) struct TouchDetail {
    pub(crate) key: Option<String>,
    pub(crate) seconds: Option<i32>,
}

/// Kind-specific matcher state and success payload, one variant per
/// operation kind.
#[derive(Debug)]
pub(crate) enum Detail {
    Add(ItemDetail),
    Append(ItemDetail),
    Close,
    CompareAndSwap(ItemDetail),
    Decrement(CounterDetail),
    Delete(DeleteDetail),
    DeleteAll,
    FlushAll,
    Get(GetDetail),
    GetMulti(GetMultiDetail),
    Increment(CounterDetail),
    Ping,
    Prepend(ItemDetail),
    Replace(ItemDetail),
    Set(ItemDetail),
    Touch(TouchDetail),
}

impl Detail {
    pub(crate) fn method(&self) -> Method {
        match self {
            Self::Add(_) => Method::Add,
            Self::Append(_) => Method::Append,
            Self::Close => Method::Close,
            Self::CompareAndSwap(_) => Method::CompareAndSwap,
            Self::Decrement(_) => Method::Decrement,
            Self::Delete(_) => Method::Delete,
            Self::DeleteAll => Method::DeleteAll,
            Self::FlushAll => Method::FlushAll,
            Self::Get(_) => Method::Get,
            Self::GetMulti(_) => Method::GetMulti,
            Self::Increment(_) => Method::Increment,
            Self::Ping => Method::Ping,
            Self::Prepend(_) => Method::Prepend,
            Self::Replace(_) => Method::Replace,
            Self::Set(_) => Method::Set,
            Self::Touch(_) => Method::Touch,
        }
    }
}

/// One pending expectation: fulfillment state plus kind-specific detail.
#[derive(Debug)]
pub(crate) struct Record {
    pub(crate) common: CommonState,
    pub(crate) detail: Detail,
}

/// A record as shared between the queue and its builder handle. The `Mutex`
/// is the per-record lock from the concurrency contract; no two records
/// ever share one.
pub(crate) type SharedRecord = Arc<Mutex<Record>>;

impl Record {
    pub(crate) fn new(detail: Detail) -> SharedRecord {
        Arc::new(Mutex::new(Self {
            common: CommonState::default(),
            detail,
        }))
    }

    pub(crate) fn method(&self) -> Method {
        self.detail.method()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected call to {}", self.method())?;
        match &self.detail {
            Detail::Add(d)
            | Detail::Append(d)
            | Detail::CompareAndSwap(d)
            | Detail::Prepend(d)
            | Detail::Replace(d)
            | Detail::Set(d) => {
                if let Some(item) = &d.expected {
                    write!(f, " with item with key {}", item.key)?;
                }
            }
            Detail::Delete(d) => {
                if let Some(key) = &d.key {
                    write!(f, " with key {key}")?;
                }
            }
            Detail::Get(d) => {
                if let Some(key) = &d.key {
                    write!(f, " with key {key}")?;
                }
                if let Some(item) = &d.item {
                    write!(f, " returning item with key {}", item.key)?;
                }
            }
            Detail::GetMulti(d) => {
                if let Some(keys) = &d.keys {
                    write!(f, " with keys {keys:?}")?;
                }
                if !d.items.is_empty() {
                    write!(f, " returning {} items", d.items.len())?;
                }
            }
            Detail::Decrement(d) | Detail::Increment(d) => {
                if let Some(key) = &d.key {
                    write!(f, " with key {key}")?;
                }
                if let Some(delta) = d.delta {
                    write!(f, " and delta {delta}")?;
                }
            }
            Detail::Touch(d) => {
                if let Some(key) = &d.key {
                    write!(f, " with key {key}")?;
                }
                if let Some(seconds) = d.seconds {
                    write!(f, " and seconds {seconds}")?;
                }
            }
            Detail::Close | Detail::DeleteAll | Detail::FlushAll | Detail::Ping => {}
        }
        if let Some(err) = &self.common.forced {
            write!(f, ", returns error: {err}")?;
        }
        if self.common.optional {
            write!(f, ", execution is optional")?;
        }
        if self.common.planned_calls > 0 {
            write!(f, ", execution calls awaited: {}", self.common.planned_calls)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed builder handles
// ---------------------------------------------------------------------------

/// Adds the three call modifiers shared by every expectation kind.
macro_rules! impl_call_modifiers {
    ($($handle:ident),+ $(,)?) => {$(
        impl $handle {
            /// Makes the expectation optional: never calling it does not
            /// fail verification, and non-matching calls scan past it.
            pub fn maybe(self) -> Self {
                self.record.lock().common.optional = true;
                self
            }

            /// Requires `n` consecutive matching calls before the
            /// expectation counts as fulfilled. Zero is treated as one.
            pub fn times(self, n: u32) -> Self {
                self.record.lock().common.planned_calls = n;
                self
            }

            /// Returns the given error from every call that matches this
            /// expectation, instead of the kind's success value. Argument
            /// matching still happens first.
            pub fn will_return_error<E>(self, err: E) -> Self
            where
                E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
            {
                self.record.lock().common.forced = Some(Arc::from(err.into()));
                self
            }
        }
    )+};
}

/// Handles for the kinds whose only matcher is an item.
macro_rules! item_expectations {
    ($($(#[$meta:meta])* $handle:ident => $variant:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $handle {
            pub(crate) record: SharedRecord,
        }

        impl $handle {
            /// Matches the item passed to the call, field by field. Pass
            /// `None` to expect a call that carries no item; leaving the
            /// matcher unset means the same thing.
            pub fn with_item(self, item: impl Into<Option<Item>>) -> Self {
                if let Detail::$variant(d) = &mut self.record.lock().detail {
                    d.expected = item.into();
                }
                self
            }
        }
    )+};
}

/// Handles for the kinds that take no arguments and return no payload.
macro_rules! bare_expectations {
    ($($(#[$meta:meta])* $handle:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $handle {
            pub(crate) record: SharedRecord,
        }
    )+};
}

/// Handles for increment/decrement: key + delta matcher, numeric payload.
macro_rules! counter_expectations {
    ($($(#[$meta:meta])* $handle:ident => $variant:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $handle {
            pub(crate) record: SharedRecord,
        }

        impl $handle {
            /// Matches both the key and the delta of the call.
            pub fn with_key_and_delta(self, key: impl Into<String>, delta: u64) -> Self {
                if let Detail::$variant(d) = &mut self.record.lock().detail {
                    d.key = Some(key.into());
                    d.delta = Some(delta);
                }
                self
            }

            /// Sets the counter value the call returns on a match.
            pub fn will_return_value(self, value: u64) -> Self {
                if let Detail::$variant(d) = &mut self.record.lock().detail {
                    d.value = value;
                }
                self
            }
        }
    )+};
}

item_expectations! {
    /// Expectation for `add`.
    ExpectedAdd => Add,
    /// Expectation for `append`.
    ExpectedAppend => Append,
    /// Expectation for `compare_and_swap`.
    ExpectedCompareAndSwap => CompareAndSwap,
    /// Expectation for `prepend`.
    ExpectedPrepend => Prepend,
    /// Expectation for `replace`.
    ExpectedReplace => Replace,
    /// Expectation for `set`.
    ExpectedSet => Set,
}

bare_expectations! {
    /// Expectation for `close`.
    ExpectedClose,
    /// Expectation for `delete_all`.
    ExpectedDeleteAll,
    /// Expectation for `flush_all`.
    ExpectedFlushAll,
    /// Expectation for `ping`.
    ExpectedPing,
}

counter_expectations! {
    /// Expectation for `decrement`.
    ExpectedDecrement => Decrement,
    /// Expectation for `increment`.
    ExpectedIncrement => Increment,
}

/// Expectation for `delete`.
#[derive(Debug)]
pub struct ExpectedDelete {
    pub(crate) record: SharedRecord,
}

impl ExpectedDelete {
    /// Matches the key passed to `delete`.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        if let Detail::Delete(d) = &mut self.record.lock().detail {
            d.key = Some(key.into());
        }
        self
    }
}

/// Expectation for `get`.
#[derive(Debug)]
pub struct ExpectedGet {
    pub(crate) record: SharedRecord,
}

impl ExpectedGet {
    /// Matches the key passed to `get`.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        if let Detail::Get(d) = &mut self.record.lock().detail {
            d.key = Some(key.into());
        }
        self
    }

    /// Sets the item `get` returns on a match. Unset means `get` returns
    /// no item.
    pub fn will_return_item(self, item: Item) -> Self {
        if let Detail::Get(d) = &mut self.record.lock().detail {
            d.item = Some(item);
        }
        self
    }
}

/// Expectation for `get_multi`.
#[derive(Debug)]
pub struct ExpectedGetMulti {
    pub(crate) record: SharedRecord,
}

impl ExpectedGetMulti {
    /// Matches the ordered key sequence passed to `get_multi`. Length,
    /// content, and order must all agree.
    pub fn with_keys(self, keys: &[&str]) -> Self {
        if let Detail::GetMulti(d) = &mut self.record.lock().detail {
            d.keys = Some(keys.iter().map(|k| (*k).to_owned()).collect());
        }
        self
    }

    /// Sets the key→item mapping `get_multi` returns on a match.
    pub fn will_return_items(self, items: FxHashMap<String, Item>) -> Self {
        if let Detail::GetMulti(d) = &mut self.record.lock().detail {
            d.items = items;
        }
        self
    }
}

/// Expectation for `touch`.
#[derive(Debug)]
pub struct ExpectedTouch {
    pub(crate) record: SharedRecord,
}

impl ExpectedTouch {
    /// Matches both the key and the duration of the call.
    pub fn with_key_and_seconds(self, key: impl Into<String>, seconds: i32) -> Self {
        if let Detail::Touch(d) = &mut self.record.lock().detail {
            d.key = Some(key.into());
            d.seconds = Some(seconds);
        }
        self
    }
}

impl_call_modifiers!(
    ExpectedAdd,
    ExpectedAppend,
    ExpectedClose,
    ExpectedCompareAndSwap,
    ExpectedDecrement,
    ExpectedDelete,
    ExpectedDeleteAll,
    ExpectedFlushAll,
    ExpectedGet,
    ExpectedGetMulti,
    ExpectedIncrement,
    ExpectedPing,
    ExpectedPrepend,
    ExpectedReplace,
    ExpectedSet,
    ExpectedTouch,
);
