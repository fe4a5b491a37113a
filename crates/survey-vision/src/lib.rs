//! Item recognition for the survey mission stack.
//!
//! The pipeline runs over one captured frame at a time:
//! marker corners -> [`rectify_sheet`] -> rectified sheet image ->
//! detector output tensor -> [`decode_boxes`] -> [`suppress`] ->
//! [`tally_items`]. Every stage is a pure function over its inputs; an
//! empty detection set is a valid outcome, not an error.

mod boxes;
mod decoder;
mod labels;
mod nms;
mod rectify;
mod tally;

pub use boxes::{iou, BoxCandidate};
pub use decoder::{decode_boxes, DecodeError, DecodeParams, OutputTensor};
pub use labels::LabelTable;
pub use nms::{suppress, NmsParams, SuppressionScope};
pub use rectify::{
    order_corners, rectify_sheet, CornerQuad, OrderedQuad, RectifyError, SheetTemplate,
};
pub use tally::{dominant_item, tally_items};
