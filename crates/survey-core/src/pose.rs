use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A commanded pose: 3-D position plus orientation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Waypoint {
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        (self.position - other.position).norm()
    }
}

/// Rotation of `angle` radians about an arbitrary (not necessarily unit)
/// axis. A zero axis yields the identity rotation.
pub fn axis_rotation(axis: Vector3<f64>, angle: f64) -> UnitQuaternion<f64> {
    match Unit::try_new(axis, 1e-12) {
        Some(unit) => UnitQuaternion::from_axis_angle(&unit, angle),
        None => UnitQuaternion::identity(),
    }
}
