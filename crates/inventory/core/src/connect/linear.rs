//! Optimal partition of items laid out on a single row or column.

use std::sync::Arc;

use crate::bonus::BonusCatalog;
use crate::config::InventoryConfig;
use crate::env::BonusDefinition;
use crate::state::{InventoryState, ItemHandle};

/// A contiguous run `[start, end)` of the ordered component and its bonus.
#[derive(Clone, Debug)]
pub(crate) struct Slice {
    pub start: usize,
    pub end: usize,
    pub bonus: Arc<BonusDefinition>,
}

#[derive(Clone, Debug, Default)]
struct Partition {
    score: i64,
    slices: Vec<Slice>,
}

/// Orders `component` along its axis when it is a strict line.
///
/// A line has at least three items whose centers all share one row or one
/// column. Ties along the axis fall back to placement order.
pub(crate) fn linear_order(
    state: &InventoryState,
    component: &[ItemHandle],
) -> Option<Vec<ItemHandle>> {
    if component.len() < 3 {
        return None;
    }

    let mut keyed = Vec::with_capacity(component.len());
    for &handle in component {
        let item = state.item(handle)?;
        keyed.push((item.center_x2()?, item.placement_order(), handle));
    }

    let (first, _, _) = keyed[0];
    let same_row = keyed.iter().all(|((_, y), _, _)| *y == first.1);
    let same_column = keyed.iter().all(|((x, _), _, _)| *x == first.0);

    if same_row {
        keyed.sort_by_key(|&((x, _), order, _)| (x, order));
    } else if same_column {
        keyed.sort_by_key(|&((_, y), order, _)| (y, order));
    } else {
        return None;
    }
    Some(keyed.into_iter().map(|(_, _, handle)| handle).collect())
}

/// Splits `ordered` into contiguous matching slices minimizing total priority.
///
/// For every prefix end, the matching slice with the lowest accumulated
/// score wins; on equal scores the shorter slice is kept. A prefix without
/// any matching final slice leaves its last item ungrouped.
pub(crate) fn optimal_partition(
    state: &InventoryState,
    catalog: &BonusCatalog,
    ordered: &[ItemHandle],
) -> Vec<Slice> {
    let mut dp: Vec<Partition> = vec![Partition::default()];

    for end in 1..=ordered.len() {
        let mut best: Option<Partition> = None;
        let last_start = end.saturating_sub(InventoryConfig::MIN_GROUP_SIZE - 1);

        for start in (0..last_start).rev() {
            let slice = &ordered[start..end];
            if !state.is_connected(slice) {
                continue;
            }
            let Some(bonus) = catalog.best_exact_counts(&state.ids_of(slice)) else {
                continue;
            };
            let score = dp[start].score + i64::from(bonus.priority);
            if best.as_ref().is_none_or(|current| score < current.score) {
                let mut partition = dp[start].clone();
                partition.score = score;
                partition.slices.push(Slice {
                    start,
                    end,
                    bonus: Arc::clone(bonus),
                });
                best = Some(partition);
            }
        }

        let next = best.unwrap_or_else(|| dp[end - 1].clone());
        dp.push(next);
    }

    dp.pop().map(|partition| partition.slices).unwrap_or_default()
}
