//! Sibling reordering: positional moves on one sibling group and the dense
//! `display_order` batch that records the new order in the content API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// One set of siblings that is ordered independently of every other set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum SiblingGroup {
    /// The main categories
    Roots,
    /// The subcategories of one main category
    ChildrenOf { parent_id: i64 },
}

/// A move requested from the admin tree view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveOp {
    /// Swap with the previous sibling
    Up { index: usize },
    /// Swap with the next sibling
    Down { index: usize },
    /// Drag-and-drop relocation; `to` is clamped into the group
    Reorder { from: usize, to: usize },
}

/// New position of one category, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderUpdate {
    pub id: i64,
    pub display_order: i32,
}

/// Apply `op` to `items` in place.
///
/// Returns `Ok(false)` when the move changes nothing (up on the first item,
/// down on the last, or a drop onto the same slot). Indices that do not exist
/// in the group are rejected.
pub fn apply_move<T>(items: &mut [T], op: MoveOp) -> Result<bool> {
    let len = items.len();
    let check = |index: usize| {
        if index < len {
            Ok(index)
        } else {
            Err(AppError::BadRequest(format!(
                "Index {} is out of range for a group of {} categories",
                index, len
            )))
        }
    };

    match op {
        MoveOp::Up { index } => {
            let index = check(index)?;
            if index == 0 {
                return Ok(false);
            }
            items.swap(index, index - 1);
        }
        MoveOp::Down { index } => {
            let index = check(index)?;
            if index + 1 == len {
                return Ok(false);
            }
            items.swap(index, index + 1);
        }
        MoveOp::Reorder { from, to } => {
            let from = check(from)?;
            let to = to.min(len - 1);
            if from == to {
                return Ok(false);
            }
            if from < to {
                items[from..=to].rotate_left(1);
            } else {
                items[to..=from].rotate_right(1);
            }
        }
    }

    Ok(true)
}

/// Dense 1..=N positions for every id, in the given order
pub fn order_batch(ids: &[i64]) -> Vec<OrderUpdate> {
    ids.iter()
        .enumerate()
        .map(|(position, &id)| OrderUpdate {
            id,
            display_order: position as i32 + 1,
        })
        .collect()
}

/// Plan a move on a sibling group. `None` means the move is a no-op and
/// nothing should be sent.
pub fn plan_move(sibling_ids: &[i64], op: MoveOp) -> Result<Option<Vec<OrderUpdate>>> {
    let mut reordered = sibling_ids.to_vec();
    if !apply_move(&mut reordered, op)? {
        return Ok(None);
    }
    Ok(Some(order_batch(&reordered)))
}
