//! High-level facade crate for the `survey-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying mission crates
//! - (feature-gated) adapters between `image::GrayImage` and the
//!   lightweight frame types the mission core works on.
//!
//! ## Quickstart
//!
//! ```no_run
//! use survey::MissionConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = std::fs::read_to_string("mission.json")?;
//! let config = MissionConfig::from_json_str(&text)?;
//! println!("{} areas planned", config.areas.len());
//! # Ok(())
//! # }
//! ```
//!
//! A full run wires the four collaborator traits ([`mission::Actuation`],
//! [`mission::Camera`], [`mission::MarkerDetector`],
//! [`mission::InferenceEngine`]) to the host robot API and hands them to
//! [`MissionRunner::run`].
//!
//! ## API map
//! - `survey::core`: frame buffers, homographies, waypoints, logging setup.
//! - `survey::vision`: tensor decoding, suppression, sheet rectification.
//! - `survey::nav`: keep-out zones, corridors, transit routing.
//! - `survey::mission`: configuration, collaborator traits, the runner.
//! - `survey::frame` (feature `image`): `image` crate adapters.

pub use survey_core as core;
pub use survey_mission as mission;
pub use survey_nav as nav;
pub use survey_vision as vision;

pub use survey_core::Waypoint;
pub use survey_mission::{MissionConfig, MissionReport, MissionRunner};
pub use survey_nav::ZoneAwareRouter;
pub use survey_vision::{BoxCandidate, LabelTable, SheetTemplate};

#[cfg(feature = "image")]
pub mod frame;

/// Decode, suppress, and tally one sheet's detector output in a single
/// call: the per-frame recognition pipeline without the inference step.
pub fn count_sheet_items(
    tensor: &vision::OutputTensor<'_>,
    labels: &vision::LabelTable,
    decode: &vision::DecodeParams,
    nms: &vision::NmsParams,
) -> Result<std::collections::BTreeMap<String, usize>, vision::DecodeError> {
    let candidates = vision::decode_boxes(tensor, labels, decode)?;
    let surviving = vision::suppress(candidates, nms);
    Ok(vision::tally_items(&surviving))
}
