use serde::{Deserialize, Serialize};

use crate::{BoxCandidate, LabelTable};

/// Geometry channels preceding the per-class confidence channels.
const GEOMETRY_CHANNELS: usize = 4;

/// Errors raised while interpreting a detector output tensor.
///
/// All of these are configuration inconsistencies: they mean the tensor
/// shape, buffer, and label table do not describe the same model, and must
/// be surfaced at setup rather than swallowed.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("tensor buffer holds {got} values, expected {channels} x {elements}")]
    BufferMismatch {
        got: usize,
        channels: usize,
        elements: usize,
    },
    #[error("tensor has {channels} channels but {labels} labels require {expected}")]
    ChannelMismatch {
        channels: usize,
        labels: usize,
        expected: usize,
    },
    #[error("class index {index} outside label table of size {size}")]
    LabelOutOfRange { index: usize, size: usize },
}

/// Borrowed channel-major view over a flat `[channels x elements]` detector
/// output, as produced by single-batch YOLO-style heads.
///
/// `value(j, c)` reads channel `j` of spatial cell `c`; the underlying
/// layout is `data[c + elements * j]`.
#[derive(Clone, Copy, Debug)]
pub struct OutputTensor<'a> {
    channels: usize,
    elements: usize,
    data: &'a [f32],
}

impl<'a> OutputTensor<'a> {
    pub fn new(channels: usize, elements: usize, data: &'a [f32]) -> Result<Self, DecodeError> {
        if data.len() != channels * elements {
            return Err(DecodeError::BufferMismatch {
                got: data.len(),
                channels,
                elements,
            });
        }
        Ok(Self {
            channels,
            elements,
            data,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn elements(&self) -> usize {
        self.elements
    }

    #[inline]
    fn value(&self, channel: usize, element: usize) -> f32 {
        self.data[element + self.elements * channel]
    }
}

/// Decoder settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodeParams {
    /// Minimum best-class score required to keep a candidate.
    pub conf_threshold: f32,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            conf_threshold: 0.01,
        }
    }
}

/// Decode a detector output tensor into classified box candidates.
///
/// For each spatial cell the best class score is taken over all class
/// channels; cells below `conf_threshold` are dropped, as are boxes with a
/// negative extent or with derived corners outside the normalized `[0,1]`
/// square. Every emitted box satisfies `x1 <= x2` and `y1 <= y2`. An empty
/// result is a valid "no detections this frame" outcome.
pub fn decode_boxes(
    tensor: &OutputTensor<'_>,
    labels: &LabelTable,
    params: &DecodeParams,
) -> Result<Vec<BoxCandidate>, DecodeError> {
    let expected = GEOMETRY_CHANNELS + labels.len();
    if tensor.channels() != expected {
        return Err(DecodeError::ChannelMismatch {
            channels: tensor.channels(),
            labels: labels.len(),
            expected,
        });
    }

    let mut candidates = Vec::new();
    for cell in 0..tensor.elements() {
        let mut best_conf = f32::NEG_INFINITY;
        let mut best_class = 0usize;
        for class in 0..labels.len() {
            let conf = tensor.value(GEOMETRY_CHANNELS + class, cell);
            if conf > best_conf {
                best_conf = conf;
                best_class = class;
            }
        }

        if best_conf <= params.conf_threshold {
            continue;
        }

        let cx = tensor.value(0, cell);
        let cy = tensor.value(1, cell);
        let w = tensor.value(2, cell);
        let h = tensor.value(3, cell);

        // negative extents would invert the corners
        if w < 0.0 || h < 0.0 {
            continue;
        }

        let x1 = cx - w / 2.0;
        let y1 = cy - h / 2.0;
        let x2 = cx + w / 2.0;
        let y2 = cy + h / 2.0;

        // boundary predictions with corners outside the normalized square
        // are degenerate and dropped
        let in_bounds = [x1, y1, x2, y2].iter().all(|v| (0.0..=1.0).contains(v));
        if !in_bounds {
            continue;
        }

        let class_name = labels
            .name(best_class)
            .ok_or(DecodeError::LabelOutOfRange {
                index: best_class,
                size: labels.len(),
            })?
            .to_owned();

        candidates.push(BoxCandidate {
            x1,
            y1,
            x2,
            y2,
            cx,
            cy,
            w,
            h,
            confidence: best_conf,
            class_index: best_class,
            class_name,
        });
    }

    log::debug!(
        "decoded {} candidates from {} cells",
        candidates.len(),
        tensor.elements()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_class_labels() -> LabelTable {
        LabelTable::new(vec!["beaker".to_owned(), "goggle".to_owned()])
    }

    /// Channel-major buffer for a single-cell, two-class head.
    fn single_cell(cx: f32, cy: f32, w: f32, h: f32, c0: f32, c1: f32) -> Vec<f32> {
        vec![cx, cy, w, h, c0, c1]
    }

    #[test]
    fn decodes_one_confident_cell() {
        let data = single_cell(0.5, 0.5, 0.2, 0.2, 0.9, 0.1);
        let tensor = OutputTensor::new(6, 1, &data).unwrap();
        let params = DecodeParams {
            conf_threshold: 0.5,
        };

        let boxes = decode_boxes(&tensor, &two_class_labels(), &params).unwrap();
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert_eq!(b.class_index, 0);
        assert_eq!(b.class_name, "beaker");
        assert_relative_eq!(b.x1, 0.4, epsilon = 1e-6);
        assert_relative_eq!(b.y1, 0.4, epsilon = 1e-6);
        assert_relative_eq!(b.x2, 0.6, epsilon = 1e-6);
        assert_relative_eq!(b.y2, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn below_threshold_cells_yield_empty_result() {
        let data = single_cell(0.5, 0.5, 0.2, 0.2, 0.3, 0.2);
        let tensor = OutputTensor::new(6, 1, &data).unwrap();
        let params = DecodeParams {
            conf_threshold: 0.5,
        };
        let boxes = decode_boxes(&tensor, &two_class_labels(), &params).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn out_of_bounds_corners_are_discarded() {
        // box centered near the edge spills outside [0,1]
        let data = single_cell(0.95, 0.5, 0.2, 0.2, 0.9, 0.1);
        let tensor = OutputTensor::new(6, 1, &data).unwrap();
        let boxes =
            decode_boxes(&tensor, &two_class_labels(), &DecodeParams::default()).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn negative_extents_are_discarded() {
        let data = single_cell(0.5, 0.5, -0.2, 0.2, 0.9, 0.1);
        let tensor = OutputTensor::new(6, 1, &data).unwrap();
        let boxes =
            decode_boxes(&tensor, &two_class_labels(), &DecodeParams::default()).unwrap();
        assert!(boxes.is_empty());

        let data = single_cell(0.5, 0.5, 0.2, -0.2, 0.9, 0.1);
        let tensor = OutputTensor::new(6, 1, &data).unwrap();
        let boxes =
            decode_boxes(&tensor, &two_class_labels(), &DecodeParams::default()).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn all_emitted_corners_are_normalized_and_ordered() {
        // two cells, channel-major: [cx cx' | cy cy' | w w' | h h' | c0 c0' | c1 c1']
        let data = vec![
            0.3, 0.7, //
            0.4, 0.6, //
            0.2, 0.3, //
            0.2, 0.4, //
            0.8, 0.2, //
            0.1, 0.7,
        ];
        let tensor = OutputTensor::new(6, 2, &data).unwrap();
        let boxes =
            decode_boxes(&tensor, &two_class_labels(), &DecodeParams::default()).unwrap();
        assert_eq!(boxes.len(), 2);
        for b in &boxes {
            for v in [b.x1, b.y1, b.x2, b.y2] {
                assert!((0.0..=1.0).contains(&v));
            }
            assert!(b.x1 <= b.x2 && b.y1 <= b.y2);
        }
        assert_eq!(boxes[1].class_name, "goggle");
    }

    #[test]
    fn channel_mismatch_is_a_fatal_error() {
        let data = vec![0.0; 5];
        let tensor = OutputTensor::new(5, 1, &data).unwrap();
        let err = decode_boxes(&tensor, &two_class_labels(), &DecodeParams::default())
            .unwrap_err();
        assert!(matches!(err, DecodeError::ChannelMismatch { .. }));
    }

    #[test]
    fn buffer_length_is_validated() {
        let data = vec![0.0; 7];
        assert!(matches!(
            OutputTensor::new(6, 1, &data),
            Err(DecodeError::BufferMismatch { .. })
        ));
    }
}
