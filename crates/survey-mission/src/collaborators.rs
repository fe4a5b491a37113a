//! Boundary contracts for the hardware and inference collaborators.
//!
//! The mission core never touches actuators, cameras, marker detection, or
//! neural-network execution directly; it drives these traits. Production
//! hosts adapt their robot API behind them, tests use scripted stubs.

use survey_core::{GrayImage, Waypoint};
use survey_vision::CornerQuad;

/// Which flashlight an actuation command addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FlashSide {
    Front,
    Back,
}

/// Synchronous actuation primitives. Every call reports success or failure
/// immediately; the retry discipline lives in the mission runner, not here.
pub trait Actuation {
    fn move_to(&mut self, waypoint: &Waypoint) -> bool;
    fn set_flashlight(&mut self, side: FlashSide, level: f32) -> bool;
    fn take_item_snapshot(&mut self) -> bool;
}

/// Image source. Frames are already undistorted by the host; `None` means
/// the capture failed and may be retried.
pub trait Camera {
    fn capture(&mut self) -> Option<GrayImage>;
}

/// One fiducial marker observed in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedMarker {
    pub id: u32,
    pub corners: CornerQuad,
}

/// Fiducial marker detection. An empty result is a valid "no markers in
/// frame" outcome, not an error.
pub trait MarkerDetector {
    fn detect(&mut self, image: &GrayImage) -> Vec<DetectedMarker>;
}

#[derive(thiserror::Error, Debug)]
#[error("inference failed: {0}")]
pub struct InferenceError(pub String);

/// Raw detector head output for one frame: a flat channel-major
/// `[channels x elements]` buffer of 32-bit floats.
#[derive(Clone, Debug)]
pub struct TensorOutput {
    pub channels: usize,
    pub elements: usize,
    pub data: Vec<f32>,
}

/// Neural-network execution. The core only interprets the output tensor;
/// resizing, normalization, and the forward pass are the collaborator's
/// concern.
pub trait InferenceEngine {
    fn infer(&mut self, sheet: &GrayImage) -> Result<TensorOutput, InferenceError>;
}

/// Pick the marker to rectify when several are visible: lowest id wins.
///
/// This replaces "first reported" selection so the choice does not depend
/// on detector iteration order.
pub fn pick_marker(markers: &[DetectedMarker]) -> Option<&DetectedMarker> {
    markers.iter().min_by_key(|m| m.id)
}
