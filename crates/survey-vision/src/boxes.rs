/// One classified box candidate in normalized image coordinates.
///
/// Corner and center/size forms are kept together and stay algebraically
/// consistent; candidates are built by the decoder and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxCandidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    pub confidence: f32,
    pub class_index: usize,
    pub class_name: String,
}

impl BoxCandidate {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }
}

/// Intersection over union of two axis-aligned boxes.
///
/// A zero-area union (both boxes degenerate) yields 0 rather than NaN, so
/// degenerate candidates read as non-overlapping.
pub fn iou(a: &BoxCandidate, b: &BoxCandidate) -> f32 {
    let ix = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let iy = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let intersection = ix * iy;
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn candidate(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> BoxCandidate {
        BoxCandidate {
            x1,
            y1,
            x2,
            y2,
            cx: (x1 + x2) / 2.0,
            cy: (y1 + y2) / 2.0,
            w: x2 - x1,
            h: y2 - y1,
            confidence,
            class_index: 0,
            class_name: "item".to_owned(),
        }
    }

    #[test]
    fn iou_of_a_box_with_itself_is_one() {
        let a = candidate(0.1, 0.1, 0.4, 0.5, 0.9);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_is_symmetric() {
        let a = candidate(0.0, 0.0, 0.5, 0.5, 0.9);
        let b = candidate(0.25, 0.25, 0.75, 0.75, 0.8);
        assert!((iou(&a, &b) - iou(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn disjoint_boxes_have_zero_iou() {
        let a = candidate(0.0, 0.0, 0.2, 0.2, 0.9);
        let b = candidate(0.5, 0.5, 0.7, 0.7, 0.8);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn degenerate_union_is_zero_not_nan() {
        let a = candidate(0.3, 0.3, 0.3, 0.3, 0.9);
        let b = candidate(0.3, 0.3, 0.3, 0.3, 0.8);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn quarter_overlap_matches_hand_computation() {
        let a = candidate(0.0, 0.0, 0.2, 0.2, 0.9);
        let b = candidate(0.1, 0.1, 0.3, 0.3, 0.8);
        // intersection 0.01, union 0.04 + 0.04 - 0.01
        assert!((iou(&a, &b) - 1.0 / 7.0).abs() < 1e-6);
    }
}
