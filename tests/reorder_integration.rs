//! End-to-end checks that applying a planned instruction sequence, one move
//! at a time the way the list API does, actually produces the desired order.

use chromalist::model::{Entry, ImageInfo};
use chromalist::reorder::{plan_update, ListUpdateEntry};

fn entry(entry_id: usize, film_id: &str) -> Entry {
    Entry {
        entry_id: entry_id.to_string(),
        film_id: film_id.to_string(),
        name: film_id.to_string(),
        release_year: 2001,
        adult: false,
        poster_customisable: false,
        poster_url: format!("https://posters.example/{film_id}.jpg?v=abc"),
        adult_poster_url: String::new(),
        list_position: entry_id,
        cache_key: format!("{film_id}_abc"),
        image_info: ImageInfo {
            path: format!("https://posters.example/{film_id}.jpg?v=abc"),
            colors: Vec::new(),
        },
        sort_vals: None,
    }
}

/// Applies one absolute-position move the way the list API does.
fn apply(order: &mut Vec<String>, instructions: &[ListUpdateEntry]) {
    for instruction in instructions {
        let item = order.remove(instruction.position as usize);
        order.insert(instruction.new_position as usize, item);
    }
}

/// Plans a reorder from `current` to `desired` and verifies that replaying
/// the instructions transforms the list exactly as requested.
fn assert_plan_applies(current: &[&str], desired: &[&str], offset: i64, reverse: bool) {
    let n = current.len() as i64;
    let entries: Vec<Entry> = desired
        .iter()
        .map(|film| {
            let position = current.iter().position(|c| c == film).unwrap();
            entry(position, film)
        })
        .collect();

    let plan = plan_update(&entries, 1, offset, reverse).unwrap();

    // Compute where each desired index should land after offset/reverse
    let mut expected = vec![String::new(); current.len()];
    for (i, film) in desired.iter().enumerate() {
        let mut end = (i as i64 + n - offset).rem_euclid(n);
        if reverse {
            end = (n - end) % n;
        }
        expected[end as usize] = film.to_string();
    }

    let mut order: Vec<String> = current.iter().map(|s| s.to_string()).collect();
    apply(&mut order, &plan.entries);
    assert_eq!(
        order, expected,
        "replaying the plan (current {current:?}, desired {desired:?}, offset {offset}, reverse {reverse}) diverged"
    );
}

#[test]
fn test_single_item_list_needs_no_moves() {
    let entries = vec![entry(0, "only")];
    let plan = plan_update(&entries, 1, 0, false).unwrap();
    assert!(plan.entries.is_empty());
}

#[test]
fn test_two_item_swap() {
    assert_plan_applies(&["a", "b"], &["b", "a"], 0, false);
}

#[test]
fn test_identity_produces_no_instructions() {
    let entries = vec![entry(0, "a"), entry(1, "b"), entry(2, "c")];
    let plan = plan_update(&entries, 1, 0, false).unwrap();
    assert!(plan.entries.is_empty());
}

#[test]
fn test_pull_tail_to_head_is_one_instruction() {
    // Moving C to the front shifts A and B along for free
    let entries = vec![entry(2, "c"), entry(0, "a"), entry(1, "b")];
    let plan = plan_update(&entries, 1, 0, false).unwrap();
    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.entries[0].position, 2);
    assert_eq!(plan.entries[0].new_position, 0);

    let mut order = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    apply(&mut order, &plan.entries);
    assert_eq!(order, vec!["c", "a", "b"]);
}

#[test]
fn test_full_reversal_applies() {
    assert_plan_applies(&["a", "b", "c", "d", "e"], &["e", "d", "c", "b", "a"], 0, false);
}

#[test]
fn test_arbitrary_permutations_apply() {
    assert_plan_applies(&["a", "b", "c", "d", "e"], &["c", "a", "e", "b", "d"], 0, false);
    assert_plan_applies(&["a", "b", "c", "d", "e"], &["b", "e", "a", "d", "c"], 0, false);
    assert_plan_applies(&["a", "b", "c", "d"], &["d", "b", "a", "c"], 0, false);
}

#[test]
fn test_offset_rotations_apply() {
    for offset in 0..5 {
        assert_plan_applies(&["a", "b", "c", "d", "e"], &["c", "a", "e", "b", "d"], offset, false);
    }
}

#[test]
fn test_reverse_flag_applies() {
    assert_plan_applies(&["a", "b", "c", "d", "e"], &["c", "a", "e", "b", "d"], 0, true);
    assert_plan_applies(&["a", "b", "c"], &["a", "b", "c"], 0, true);
}

#[test]
fn test_offset_and_reverse_combined() {
    for offset in 0..4 {
        assert_plan_applies(&["a", "b", "c", "d"], &["d", "b", "a", "c"], offset, true);
    }
}
