use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{iou, BoxCandidate};

/// Which candidates a kept box is allowed to suppress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressionScope {
    /// Suppress across all classes together: a confident box of one class
    /// removes overlapping boxes of every class.
    AllClasses,
    /// Suppress only within the same class.
    PerClass,
}

/// Non-maximum suppression settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NmsParams {
    /// Overlap at or above this IoU removes the lower-confidence box.
    pub iou_threshold: f32,
    pub scope: SuppressionScope,
}

impl Default for NmsParams {
    fn default() -> Self {
        Self {
            iou_threshold: 0.4,
            scope: SuppressionScope::AllClasses,
        }
    }
}

/// Greedy non-maximum suppression.
///
/// Candidates are ordered by descending confidence (stable, so equal
/// confidences keep their insertion order and the result is deterministic);
/// the best remaining box is accepted and every remaining box overlapping
/// it at `iou_threshold` or more is dropped. The accepted set comes back in
/// descending-confidence order.
pub fn suppress(mut candidates: Vec<BoxCandidate>, params: &NmsParams) -> Vec<BoxCandidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut remaining = candidates;
    while !remaining.is_empty() {
        let best = remaining.remove(0);
        remaining.retain(|c| {
            if params.scope == SuppressionScope::PerClass && c.class_index != best.class_index {
                return true;
            }
            iou(&best, c) < params.iou_threshold
        });
        accepted.push(best);
    }

    log::debug!("suppression kept {} boxes", accepted.len());
    accepted
}
