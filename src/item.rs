//! Cache item value object.
//!
//! ## Key Components
//! - [`Item`]: one cache entry as a memcache-style client sees it — key,
//!   payload bytes, opaque flags, expiration seconds, and a CAS version token.
//!
//! ## Example Usage
//! ```
//! use cachemock::item::Item;
//!
//! let item = Item::new("session:42", b"payload".to_vec());
//! assert_eq!(item.key, "session:42");
//! assert_eq!(item.flags, 0);
//! ```

/// One cache entry.
///
/// All fields are public so tests can build items with struct literals plus
/// `..Default::default()`. Equality compares every field; the payload is
/// compared by content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Entry key.
    pub key: String,
    /// Payload bytes.
    pub value: Vec<u8>,
    /// Opaque client flags stored alongside the payload.
    pub flags: u32,
    /// Expiration in seconds; not interpreted by the mock.
    pub expiration: i32,
    /// Compare-and-swap version token.
    pub cas_id: u64,
}

impl Item {
    /// Creates an item with the given key and payload; the remaining fields
    /// default to zero.
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_remaining_fields() {
        let item = Item::new("k", b"v".to_vec());
        assert_eq!(item.key, "k");
        assert_eq!(item.value, b"v");
        assert_eq!(item.flags, 0);
        assert_eq!(item.expiration, 0);
        assert_eq!(item.cas_id, 0);
    }

    #[test]
    fn equality_is_field_wise() {
        let a = Item::new("k", b"v".to_vec());
        let mut b = a.clone();
        assert_eq!(a, b);
        b.cas_id = 7;
        assert_ne!(a, b);
    }
}
