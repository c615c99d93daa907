//! Result-set merging
//!
//! Multi-query plans return overlapping result sets; merging dedups strictly
//! by the provider-assigned id. First occurrence wins, so results from
//! earlier (higher-priority) queries rank first before scoring.

use crate::model::Spot;
use std::collections::HashSet;

/// Merge result sets, deduplicating by spot id
pub fn merge(result_sets: Vec<Vec<Spot>>) -> Vec<Spot> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for set in result_sets {
        for spot in set {
            if seen.insert(spot.id.clone()) {
                merged.push(spot);
            }
        }
    }

    merged
}
