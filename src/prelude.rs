//! Convenience re-exports for test modules.

pub use crate::error::{ClientError, Mismatch, MockError};
pub use crate::expectation::{
    ExpectedAdd, ExpectedAppend, ExpectedClose, ExpectedCompareAndSwap, ExpectedDecrement,
    ExpectedDelete, ExpectedDeleteAll, ExpectedFlushAll, ExpectedGet, ExpectedGetMulti,
    ExpectedIncrement, ExpectedPing, ExpectedPrepend, ExpectedReplace, ExpectedSet, ExpectedTouch,
    Method,
};
pub use crate::item::Item;
pub use crate::mock::CacheMock;
