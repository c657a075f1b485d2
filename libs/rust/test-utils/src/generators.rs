//! Shared proptest generators for command inputs.

use proptest::prelude::*;

/// Generate policy names as created on the vault.
pub fn policy_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{2,24}"
}

/// Generate key GUIDs.
pub fn key_guid_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

/// Generate sensitive values to tokenize (card, SSN or free text).
pub fn token_data_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}",
        "[0-9]{3}-[0-9]{2}-[0-9]{4}",
        "[A-Za-z0-9 ]{1,40}",
    ]
}

/// Generate paired batch inputs: (policy names, values, key GUIDs) of one length.
pub fn batch_strategy(
    max: usize,
) -> impl Strategy<Value = (Vec<String>, Vec<String>, Vec<String>)> {
    (1..=max).prop_flat_map(|len| {
        (
            prop::collection::vec(policy_name_strategy(), len),
            prop::collection::vec(token_data_strategy(), len),
            prop::collection::vec(
                prop_oneof![Just("0".to_string()), key_guid_strategy()],
                len,
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn test_key_guid_format() {
        let mut runner = TestRunner::default();
        for _ in 0..10 {
            let value = key_guid_strategy().new_tree(&mut runner).unwrap().current();
            assert_eq!(value.len(), 36);
            assert_eq!(value.matches('-').count(), 4);
        }
    }

    #[test]
    fn test_batch_lengths_match() {
        let mut runner = TestRunner::default();
        for _ in 0..10 {
            let (names, data, keys) = batch_strategy(5).new_tree(&mut runner).unwrap().current();
            assert!(!names.is_empty());
            assert_eq!(names.len(), data.len());
            assert_eq!(names.len(), keys.len());
        }
    }
}
