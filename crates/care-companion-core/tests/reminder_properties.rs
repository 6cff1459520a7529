//! Property tests for the reminder list and the symptom matcher.

use care_companion_core::matcher::{SymptomMatcher, FOLLOW_UP_REPLY, SYMPTOM_VOCABULARY};
use care_companion_core::models::ReminderList;
use proptest::prelude::*;

fn reminder_list() -> impl Strategy<Value = ReminderList> {
    prop::collection::vec("[a-zA-Z ]{1,20}[a-z]", 0..8).prop_map(ReminderList::new)
}

proptest! {
    #[test]
    fn add_non_blank_appends_trimmed(mut list in reminder_list(), text in "\\PC{0,30}") {
        let before = list.items().to_vec();
        let result = list.add(&text).map(str::to_string);

        if text.trim().is_empty() {
            prop_assert!(result.is_err());
            prop_assert_eq!(list.items(), before.as_slice());
        } else {
            let added = result.ok();
            prop_assert_eq!(added.as_deref(), Some(text.trim()));
            prop_assert_eq!(list.len(), before.len() + 1);
            prop_assert_eq!(&list.items()[..before.len()], before.as_slice());
            prop_assert_eq!(list.get(before.len()), Some(text.trim()));
        }
    }

    #[test]
    fn whitespace_only_never_added(mut list in reminder_list(), text in "[ \\t\\n]{0,10}") {
        let before = list.clone();
        prop_assert!(list.add(&text).is_err());
        prop_assert_eq!(list, before);
    }

    #[test]
    fn remove_preserves_order_of_the_rest(list in reminder_list(), seed in any::<prop::sample::Index>()) {
        prop_assume!(!list.is_empty());
        let index = seed.index(list.len());

        let mut expected = list.items().to_vec();
        let expected_removed = expected.remove(index);

        let mut list = list;
        let removed = list.remove(index).unwrap();

        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(list.items(), expected.as_slice());
    }

    #[test]
    fn remove_out_of_range_changes_nothing(mut list in reminder_list(), extra in 0usize..5) {
        let before = list.clone();
        let index = list.len() + extra;
        prop_assert!(list.remove(index).is_err());
        prop_assert_eq!(list, before);
    }

    #[test]
    fn matcher_reply_names_exactly_the_mentioned_symptoms(
        chosen in prop::array::uniform4(any::<bool>()),
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        filler in "[0-9 ,.!?]{0,8}",
        uppercase in any::<bool>(),
    ) {
        // Filler has no letters, so only the chosen words can match
        let mut input = filler.clone();
        for &i in &order {
            if chosen[i] {
                input.push_str(SYMPTOM_VOCABULARY[i]);
                input.push_str(&filler);
            }
        }
        if uppercase {
            input = input.to_uppercase();
        }

        let named: Vec<&str> = (0..4).filter(|&i| chosen[i]).map(|i| SYMPTOM_VOCABULARY[i]).collect();
        let expected = if named.is_empty() {
            FOLLOW_UP_REPLY.to_string()
        } else {
            format!("Bot: Based on your symptoms, you have {}", named.join(", "))
        };

        prop_assert_eq!(SymptomMatcher::new().respond(&input), expected);
    }

    #[test]
    fn matcher_reply_is_total(input in "\\PC{0,60}") {
        let reply = SymptomMatcher::new().respond(&input);
        let lower = input.to_lowercase();

        match reply.strip_prefix("Bot: Based on your symptoms, you have ") {
            Some(list) => {
                for word in list.split(", ") {
                    prop_assert!(SYMPTOM_VOCABULARY.contains(&word));
                    prop_assert!(lower.contains(word));
                }
            }
            None => {
                prop_assert_eq!(reply.as_str(), FOLLOW_UP_REPLY);
                prop_assert!(SYMPTOM_VOCABULARY.iter().all(|w| !lower.contains(w)));
            }
        }
    }

    #[test]
    fn matcher_detects_in_vocabulary_order(
        picks in prop::collection::vec(0usize..4, 1..4),
        uppercase in any::<bool>(),
    ) {
        let words: Vec<&str> = picks.iter().rev().map(|&i| SYMPTOM_VOCABULARY[i]).collect();
        let mut input = format!("I have {}", words.join(" and "));
        if uppercase {
            input = input.to_uppercase();
        }

        let matcher = SymptomMatcher::new();
        let detected = matcher.detect(&input);

        let expected: Vec<&str> = SYMPTOM_VOCABULARY
            .iter()
            .copied()
            .filter(|w| words.contains(w))
            .collect();
        prop_assert_eq!(detected, expected);
    }
}
