use std::collections::BTreeMap;

use crate::BoxCandidate;

/// Count surviving detections per class name.
pub fn tally_items(detections: &[BoxCandidate]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for b in detections {
        *counts.entry(b.class_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// The item a frame is reported as: the class with the most surviving
/// boxes. Ties resolve to the lexicographically smallest name so repeated
/// runs report the same item.
pub fn dominant_item(counts: &BTreeMap<String, usize>) -> Option<(&str, usize)> {
    let mut best: Option<(&str, usize)> = None;
    for (name, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((name, count));
        }
    }
    best
}
