// ==============================================
// CALL ORDERING / GATE RULE TESTS (integration)
// ==============================================
//
// Expectations assert the order a real client would issue calls in: a
// required expectation blocks everything registered after it until it is
// matched, while optional and fulfilled records are skipped transparently.
// These scenarios drive the full facade rather than the queue internals.

use cachemock::prelude::*;
use rustc_hash::FxHashMap;

fn item(key: &str, value: &[u8]) -> Item {
    Item::new(key, value.to_vec())
}

mod gate_rule {
    use super::*;

    #[test]
    fn calls_in_registration_order_succeed() {
        let mock = CacheMock::new();
        let foo = item("foo", b"bar");
        mock.expect_set().with_item(foo.clone());
        mock.expect_get().with_key("foo").will_return_item(foo.clone());

        mock.set(Some(&foo)).unwrap();
        assert_eq!(mock.get("foo").unwrap(), Some(foo));
        mock.expectations_were_met().unwrap();
    }

    #[test]
    fn call_arriving_before_its_turn_names_the_blocking_expectation() {
        let mock = CacheMock::new();
        let foo = item("foo", b"bar");
        mock.expect_set().with_item(foo.clone());
        mock.expect_get().with_key("foo").will_return_item(foo);

        let err = mock.get("foo").unwrap_err();
        match &err {
            MockError::Blocked { next, .. } => {
                assert!(next.contains("Set()"), "blocking record not named: {next}");
            }
            other => panic!("expected Blocked, got {other}"),
        }
        assert!(err.to_string().contains("Get()"));
        assert!(mock.expectations_were_met().is_err());
    }

    #[test]
    fn required_record_with_mismatching_arguments_blocks_later_matches() {
        let mock = CacheMock::new();
        mock.expect_delete().with_key("first");
        // Would match the call below, but sits behind the required delete.
        mock.expect_delete().with_key("second");

        let err = mock.delete("second").unwrap_err();
        assert!(matches!(err, MockError::Mismatch(Mismatch::Key { .. })));
        assert!(mock.expectations_were_met().is_err());
    }

    #[test]
    fn optional_expectation_is_skipped_freely() {
        let mock = CacheMock::new();
        mock.expect_ping().maybe();
        mock.expect_close();

        mock.close().unwrap();
        mock.expectations_were_met().unwrap();
    }

    #[test]
    fn optional_expectation_still_matches_when_invoked() {
        let mock = CacheMock::new();
        mock.expect_ping().maybe();
        mock.expect_close();

        mock.ping().unwrap();
        mock.close().unwrap();
        mock.expectations_were_met().unwrap();
    }

    #[test]
    fn unexpected_kind_fails_and_verification_reports_the_gap() {
        let mock = CacheMock::new();
        mock.expect_close();

        assert!(mock.ping().is_err());
        assert!(mock.delete_all().is_err());
        assert!(mock.flush_all().is_err());
        assert!(mock.expectations_were_met().is_err());
    }

    #[test]
    fn fulfilled_records_are_skipped_regardless_of_kind() {
        let mock = CacheMock::new();
        mock.expect_ping();
        mock.expect_close();

        mock.ping().unwrap();
        mock.close().unwrap();
        mock.expectations_were_met().unwrap();
    }
}

mod exhaustion {
    use super::*;

    #[test]
    fn empty_mock_reports_a_plain_unexpected_call() {
        let mock = CacheMock::new();
        let err = mock.ping().unwrap_err();
        assert!(matches!(err, MockError::Unexpected { .. }));
    }

    #[test]
    fn second_identical_call_fails_once_the_only_record_is_consumed() {
        let mock = CacheMock::new();
        mock.expect_close();

        mock.close().unwrap();
        mock.expectations_were_met().unwrap();

        let err = mock.close().unwrap_err();
        assert!(matches!(err, MockError::AllFulfilled { .. }));
        assert!(err.to_string().contains("all expectations were already fulfilled"));
    }
}

mod call_modifiers {
    use super::*;

    #[test]
    fn times_requires_exactly_that_many_calls() {
        let mock = CacheMock::new();
        mock.expect_ping().times(3);

        mock.ping().unwrap();
        mock.ping().unwrap();
        assert!(
            mock.expectations_were_met().is_err(),
            "two of three planned calls must not fulfill the record"
        );
        mock.ping().unwrap();
        mock.expectations_were_met().unwrap();

        let err = mock.ping().unwrap_err();
        assert!(matches!(err, MockError::AllFulfilled { .. }));
    }

    #[test]
    fn forced_error_counts_toward_fulfillment() {
        let mock = CacheMock::new();
        mock.expect_flush_all().will_return_error("memcache: server error");

        let err = mock.flush_all().unwrap_err();
        assert_eq!(
            err.as_client().map(ToString::to_string).as_deref(),
            Some("memcache: server error")
        );
        mock.expectations_were_met().unwrap();
    }

    #[test]
    fn forced_error_is_repeated_across_planned_calls() {
        let mock = CacheMock::new();
        mock.expect_ping().times(2).will_return_error("down");

        assert!(mock.ping().unwrap_err().as_client().is_some());
        assert!(mock.ping().unwrap_err().as_client().is_some());
        mock.expectations_were_met().unwrap();
    }
}

mod get_multi_sequences {
    use super::*;

    fn mapping() -> FxHashMap<String, Item> {
        let mut items = FxHashMap::default();
        items.insert("a".to_string(), item("a", b"item-a"));
        items.insert("b".to_string(), item("b", b"item-b"));
        items
    }

    #[test]
    fn extra_key_is_a_sequence_mismatch() {
        let mock = CacheMock::new();
        mock.expect_get_multi()
            .with_keys(&["a", "b"])
            .will_return_items(mapping());

        let err = mock.get_multi(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, MockError::Mismatch(Mismatch::Keys { .. })));
        assert!(mock.expectations_were_met().is_err());
    }

    #[test]
    fn reordered_keys_are_a_sequence_mismatch() {
        let mock = CacheMock::new();
        mock.expect_get_multi()
            .with_keys(&["a", "b"])
            .will_return_items(mapping());

        let err = mock.get_multi(&["b", "a"]).unwrap_err();
        assert!(matches!(err, MockError::Mismatch(Mismatch::Keys { .. })));
    }

    #[test]
    fn exact_sequence_returns_the_configured_mapping() {
        let mock = CacheMock::new();
        mock.expect_get_multi()
            .with_keys(&["a", "b"])
            .will_return_items(mapping());

        let items = mock.get_multi(&["a", "b"]).unwrap();
        assert_eq!(items, mapping());
        mock.expectations_were_met().unwrap();
    }
}

mod counters {
    use super::*;

    #[test]
    fn delta_mismatch_leaves_the_record_unfulfilled() {
        let mock = CacheMock::new();
        mock.expect_decrement()
            .with_key_and_delta("k", 10)
            .will_return_value(20);

        let err = mock.decrement("k", 15).unwrap_err();
        assert!(matches!(err, MockError::Mismatch(Mismatch::Delta { .. })));
        assert!(
            mock.expectations_were_met().is_err(),
            "a rejected call must not fulfill the record"
        );
    }

    #[test]
    fn matching_decrement_returns_the_configured_value() {
        let mock = CacheMock::new();
        mock.expect_decrement()
            .with_key_and_delta("k", 10)
            .will_return_value(20);

        assert_eq!(mock.decrement("k", 10).unwrap(), 20);
        mock.expectations_were_met().unwrap();
    }
}
