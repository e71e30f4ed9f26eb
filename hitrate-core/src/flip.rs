//! Flip detection — bar-over-bar crossing of a reference value over a comparator.
//!
//! At most one flip per bar. The up-condition is evaluated first and
//! short-circuits the down-condition; this resolves the boundary case
//! `r[i-1] == c[i-1]`, which otherwise satisfies both conditions.

use serde::{Deserialize, Serialize};

use crate::align::AlignedSeries;
use crate::domain::Direction;

/// The bar at which the reference crossed the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipEvent {
    pub bar_index: usize,
    pub direction: Direction,
}

/// Detect a flip of `reference` across `comparator` at `bar_index`.
///
/// - Up iff `r[i-1] <= c[i-1]` and `r[i] > c[i]`.
/// - Down iff `r[i-1] >= c[i-1]` and `r[i] < c[i]`, evaluated only when
///   the up-condition did not hold.
///
/// Returns `None` at bar 0 and whenever any of the four values is
/// undefined (warm-up, NaN, out of range).
pub fn detect(
    reference: &AlignedSeries,
    comparator: &AlignedSeries,
    bar_index: usize,
) -> Option<FlipEvent> {
    if bar_index == 0 {
        return None;
    }
    let r_prev = reference.value_at(bar_index - 1)?;
    let r_cur = reference.value_at(bar_index)?;
    let c_prev = comparator.value_at(bar_index - 1)?;
    let c_cur = comparator.value_at(bar_index)?;

    if r_prev <= c_prev && r_cur > c_cur {
        return Some(FlipEvent {
            bar_index,
            direction: Direction::Up,
        });
    }
    if r_prev >= c_prev && r_cur < c_cur {
        return Some(FlipEvent {
            bar_index,
            direction: Direction::Down,
        });
    }
    None
}

/// Whether the reference sat on the pre-flip side of the comparator at a
/// bar, for a flip in `direction`.
///
/// Non-strict, mirroring the flip preconditions: an Up flip admits
/// `r[i-1] == c[i-1]`, so an equality bar counts as held for either
/// direction. Used by the persistence filter to walk backward from a
/// flip. `false` when either value is undefined.
pub fn held_pre_flip_side(
    reference: &AlignedSeries,
    comparator: &AlignedSeries,
    bar_index: usize,
    direction: Direction,
) -> bool {
    let (Some(r), Some(c)) = (
        reference.value_at(bar_index),
        comparator.value_at(bar_index),
    ) else {
        return false;
    };
    match direction {
        Direction::Up => r <= c,
        Direction::Down => r >= c,
    }
}
