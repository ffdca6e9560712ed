//! Argument matcher predicates.
//!
//! Pure free functions comparing the actual arguments of an invocation
//! against the values configured on an expectation record. Each returns
//! `Ok(())` on a match or a descriptive [`Mismatch`]. None of them touch a
//! record's lock; they see only the values handed to them.
//!
//! Unset expectations (`None`) impose no constraint, with one exception:
//! [`item_matches`] treats an unset expected item as "expects no item", so
//! exactly one unset side is a mismatch. This mirrors how a memcache client
//! call with a nil item is itself a distinct, assertable shape.

use crate::error::Mismatch;
use crate::item::Item;

/// Compares a single key. `None` matches any key.
pub(crate) fn key_matches(expected: Option<&str>, actual: &str) -> Result<(), Mismatch> {
    match expected {
        Some(expected) if expected != actual => Err(Mismatch::Key {
            expected: expected.to_owned(),
            actual: actual.to_owned(),
        }),
        _ => Ok(()),
    }
}

/// Compares an ordered key sequence. Length, content, and order must all
/// agree; sequences sharing elements in a different order do not match.
/// `None` matches any sequence.
pub(crate) fn keys_match(expected: Option<&[String]>, actual: &[&str]) -> Result<(), Mismatch> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let equal = expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| e == a);
    if equal {
        Ok(())
    } else {
        Err(Mismatch::Keys {
            expected: expected.to_vec(),
            actual: actual.iter().map(|k| (*k).to_owned()).collect(),
        })
    }
}

/// Compares two optional items field by field.
///
/// Both absent is a match; exactly one absent is a mismatch; otherwise key,
/// payload bytes, flags, expiration, and CAS token must all be equal. The
/// first differing field is reported.
pub(crate) fn item_matches(expected: Option<&Item>, actual: Option<&Item>) -> Result<(), Mismatch> {
    let (expected, actual) = match (expected, actual) {
        (None, None) => return Ok(()),
        (None, Some(actual)) => {
            return Err(Mismatch::UnexpectedItem {
                key: actual.key.clone(),
            });
        }
        (Some(expected), None) => {
            return Err(Mismatch::MissingItem {
                key: expected.key.clone(),
            });
        }
        (Some(expected), Some(actual)) => (expected, actual),
    };

    if expected.key != actual.key {
        return Err(item_field("key", &expected.key, &actual.key));
    }
    if expected.value != actual.value {
        return Err(item_field(
            "value",
            String::from_utf8_lossy(&expected.value),
            String::from_utf8_lossy(&actual.value),
        ));
    }
    if expected.flags != actual.flags {
        return Err(item_field("flags", expected.flags, actual.flags));
    }
    if expected.expiration != actual.expiration {
        return Err(item_field(
            "expiration",
            expected.expiration,
            actual.expiration,
        ));
    }
    if expected.cas_id != actual.cas_id {
        return Err(item_field("cas_id", expected.cas_id, actual.cas_id));
    }
    Ok(())
}

/// Compares an increment/decrement delta. `None` matches any delta.
pub(crate) fn delta_matches(expected: Option<u64>, actual: u64) -> Result<(), Mismatch> {
    match expected {
        Some(expected) if expected != actual => Err(Mismatch::Delta { expected, actual }),
        _ => Ok(()),
    }
}

/// Compares a touch duration in seconds. `None` matches any duration.
pub(crate) fn seconds_match(expected: Option<i32>, actual: i32) -> Result<(), Mismatch> {
    match expected {
        Some(expected) if expected != actual => Err(Mismatch::Seconds { expected, actual }),
        _ => Ok(()),
    }
}

fn item_field(
    field: &'static str,
    expected: impl ToString,
    actual: impl ToString,
) -> Mismatch {
    Mismatch::ItemField {
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
