//! Picks the story that held the top spot most often in a window.

use std::collections::HashMap;

use crate::store::samples::Sample;
use crate::ItemId;

/// Most frequent id in `samples`.
///
/// Ties go to the id whose first sample appears latest, i.e. the story that
/// reached the top most recently. Returns `None` for an empty window.
pub fn select(samples: &[Sample]) -> Option<ItemId> {
    // counts in first-appearance order
    let mut counts: Vec<(ItemId, usize)> = Vec::new();
    let mut index: HashMap<ItemId, usize> = HashMap::new();

    for sample in samples {
        match index.get(&sample.id) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(sample.id, counts.len());
                counts.push((sample.id, 1));
            }
        }
    }

    let mut best: Option<(ItemId, usize)> = None;
    for (id, count) in counts {
        // >= so a later id wins ties
        if best.map_or(true, |(_, best_count)| count >= best_count) {
            best = Some((id, count));
        }
    }

    best.map(|(id, _)| id)
}
