use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use survey_core::Waypoint;
use survey_nav::{Corridor, KeepOutZone};
use survey_vision::{DecodeParams, NmsParams, SheetTemplate};

use crate::collaborators::FlashSide;
use crate::retry::{OnExhausted, RetryPolicy};

/// Item reported for an area when perception comes up empty (no marker, no
/// surviving detections, or an unavailable inference engine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultItem {
    pub name: String,
    pub count: usize,
}

impl Default for DefaultItem {
    fn default() -> Self {
        Self {
            name: "beaker".to_owned(),
            count: 3,
        }
    }
}

/// Flashlight command issued before an area's capture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlashCommand {
    pub side: FlashSide,
    pub level: f32,
}

/// Static plan for one survey area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaPlan {
    pub id: u32,
    /// Waypoints flown before the corridor transit (or before the anchor
    /// when there is no corridor).
    #[serde(default)]
    pub approach: Vec<Waypoint>,
    /// Viewing pose in front of the area.
    pub anchor: Waypoint,
    /// Transit corridor toward the anchor; absent for direct approaches.
    #[serde(default)]
    pub corridor: Option<Corridor>,
    /// Keep-out zones covering the corridor.
    #[serde(default)]
    pub zones: Vec<KeepOutZone>,
    /// Pre-baked safe route used when the corridor search is infeasible;
    /// without one, infeasibility aborts the mission.
    #[serde(default)]
    pub fallback_route: Option<Vec<Waypoint>>,
    #[serde(default)]
    pub flashlight: Option<FlashCommand>,
    /// Route flown when revisiting this area at the end of the mission.
    #[serde(default)]
    pub return_route: Vec<Waypoint>,
}

/// Final mission phase: read the requested item at the clue pose, then
/// revisit the area holding it and take the closing snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CluePhase {
    pub waypoint: Waypoint,
}

/// Immutable mission configuration, loaded once before the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Class names matching the detector's class channels, in order.
    pub labels: Vec<String>,
    /// Where the robot starts, in mission frame.
    pub start: Point3<f64>,
    pub areas: Vec<AreaPlan>,
    #[serde(default)]
    pub clue: Option<CluePhase>,
    #[serde(default)]
    pub decode: DecodeParams,
    #[serde(default)]
    pub nms: NmsParams,
    #[serde(default)]
    pub sheet_template: SheetTemplate,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub on_exhausted: OnExhausted,
    #[serde(default)]
    pub default_item: DefaultItem,
}

impl MissionConfig {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
