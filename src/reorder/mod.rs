//! Minimal move-instruction planning for list reorders.
//!
//! The list API reorders through "move the entry at absolute position X to
//! absolute position Y" instructions applied one at a time, each instruction
//! seeing the positions left behind by the previous one. Planning therefore
//! simulates the API's behavior over a tracked-position table: entries
//! already in place produce no instruction, so a nearly-sorted list yields a
//! short plan.
//!
//! An entry's numeric id doubles as its current absolute position, which is
//! how the API seeds a freshly fetched list.

use crate::model::Entry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors planning a reorder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReorderError {
    /// Entry id is not the numeric position proxy the planner needs.
    #[error("entry id {0:?} is not numeric")]
    BadEntryId(String),
}

/// Instruction verb accepted by the list update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Move,
}

/// One "move from absolute position to absolute position" instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdateEntry {
    pub action: UpdateAction,
    pub position: i64,
    pub new_position: i64,
}

/// Body of a list update request. The version must match the fetched list or
/// the API rejects the whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdateRequest {
    pub version: i64,
    pub entries: Vec<ListUpdateEntry>,
}

/// A film and the absolute position it should end up at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilmTargetPosition {
    film_id: String,
    position: i64,
}

/// Plans the move instructions that turn the list's current order into the
/// order of `entries`.
///
/// `entries` is the desired final order. `offset` rotates the result
/// head-ward by that many slots, and `reverse` flips it; both act on target
/// positions, not on the instruction stream.
pub fn plan_update(
    entries: &[Entry],
    version: i64,
    offset: i64,
    reverse: bool,
) -> Result<ListUpdateRequest, ReorderError> {
    let n = entries.len() as i64;
    if n == 0 {
        return Ok(ListUpdateRequest {
            version,
            entries: Vec::new(),
        });
    }

    let mut tracked: HashMap<String, i64> = HashMap::with_capacity(entries.len());
    let mut targets: Vec<FilmTargetPosition> = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let current: i64 = entry
            .entry_id
            .parse()
            .map_err(|_| ReorderError::BadEntryId(entry.entry_id.clone()))?;

        let mut end = (i as i64 + n - offset).rem_euclid(n);
        if reverse {
            end = (n - end) % n;
        }

        tracked.insert(entry.film_id.clone(), current);
        targets.push(FilmTargetPosition {
            film_id: entry.film_id.clone(),
            position: end,
        });
    }

    targets.sort_by_key(|t| t.position);

    Ok(ListUpdateRequest {
        version,
        entries: plan_moves(&mut tracked, &targets),
    })
}

/// Walks the targets in ascending position order, emitting an instruction
/// for every entry not already where it belongs and updating the tracked
/// table the way the API will.
fn plan_moves(
    tracked: &mut HashMap<String, i64>,
    targets: &[FilmTargetPosition],
) -> Vec<ListUpdateEntry> {
    let mut instructions = Vec::new();

    for film in targets {
        let current = tracked[&film.film_id];
        if film.position == current {
            continue;
        }

        instructions.push(ListUpdateEntry {
            action: UpdateAction::Move,
            position: current,
            new_position: film.position,
        });
        tracked.insert(film.film_id.clone(), film.position);

        // A head-ward move shifts everything it passed over down one slot.
        // Tail-ward moves leave the table untouched; they cannot arise while
        // the tracked positions are the dense range 0..n-1.
        for (other, pos) in tracked.iter_mut() {
            if *other != film.film_id && film.position <= *pos && *pos < current {
                *pos += 1;
            }
        }
    }

    instructions
}
