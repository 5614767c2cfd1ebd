//! Property tests for answer selection
//!
//! Clicks are generated as option indices; every sequence must keep the selection
//! within the question's required count and free of duplicates.

use proptest::prelude::*;
use quizdeck::Selection;
use quizdeck::models::OptionKey;
use std::collections::HashSet;

const OPTIONS: usize = 6;

fn key(index: usize) -> OptionKey {
    OptionKey::positional(index % OPTIONS)
}

fn apply(clicks: &[usize], multi: bool, required: usize) -> Selection {
    clicks.iter().fold(Selection::new(), |selection, &click| {
        selection.select(key(click), multi, required).selection
    })
}

proptest! {
    #[test]
    fn single_select_holds_at_most_the_last_click(clicks in prop::collection::vec(0..OPTIONS, 1..20)) {
        let selection = apply(&clicks, false, 1);

        prop_assert_eq!(selection.len(), 1);
        let last = *clicks.last().unwrap();
        prop_assert_eq!(selection.keys(), &[key(last)][..]);
    }

    #[test]
    fn multi_select_never_exceeds_required(
        clicks in prop::collection::vec(0..OPTIONS, 0..30),
        required in 2usize..=4,
    ) {
        let selection = apply(&clicks, true, required);

        prop_assert!(selection.len() <= required);
        let unique: HashSet<_> = selection.keys().iter().collect();
        prop_assert_eq!(unique.len(), selection.len());
    }

    #[test]
    fn submit_enabled_iff_exactly_required(
        clicks in prop::collection::vec(0..OPTIONS, 0..30),
        required in 2usize..=4,
    ) {
        let selection = apply(&clicks, true, required);
        prop_assert_eq!(selection.is_complete(required), selection.len() == required);
    }

    #[test]
    fn overflow_click_evicts_oldest(required in 2usize..=4) {
        let full = apply(&(0..required).collect::<Vec<_>>(), true, required);
        prop_assert!(full.is_complete(required));

        let update = full.select(key(required), true, required);

        prop_assert_eq!(update.evicted, Some(key(0)));
        prop_assert_eq!(update.selection.len(), required);
        prop_assert_eq!(update.selection.keys().last(), Some(&key(required)));
    }

    #[test]
    fn clicking_selected_option_removes_it(
        clicks in prop::collection::vec(0..OPTIONS, 1..30),
        required in 2usize..=4,
    ) {
        let selection = apply(&clicks, true, required);
        if let Some(first) = selection.keys().first().cloned() {
            let update = selection.select(first.clone(), true, required);
            prop_assert!(update.deselected);
            prop_assert!(!update.selection.contains(&first));
            prop_assert_eq!(update.selection.len(), selection.len() - 1);
        }
    }
}

#[test]
fn requires_two_select_a_b_c() {
    let selection = apply(&[0, 1, 2], true, 2);
    assert_eq!(selection.keys(), &[key(1), key(2)][..]);
    assert!(selection.is_complete(2));
}
