use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ZoneError {
    #[error("keep-out zone has zero extent (x {x_min}..{x_max}, z {z_min}..{z_max})")]
    Degenerate {
        x_min: f64,
        x_max: f64,
        z_min: f64,
        z_max: f64,
    },
}

/// Axis-aligned keep-out rectangle in the horizontal transit plane.
///
/// Built from two diagonal corners in either order; the stored bounds are
/// normalized so `x_min < x_max` and `z_min < z_max`. Zones are static
/// mission configuration and never change during a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoneCorners", into = "ZoneCorners")]
pub struct KeepOutZone {
    x_min: f64,
    x_max: f64,
    z_min: f64,
    z_max: f64,
}

impl KeepOutZone {
    pub fn new(a: (f64, f64), b: (f64, f64)) -> Result<Self, ZoneError> {
        let (x_min, x_max) = (a.0.min(b.0), a.0.max(b.0));
        let (z_min, z_max) = (a.1.min(b.1), a.1.max(b.1));
        if x_min >= x_max || z_min >= z_max {
            return Err(ZoneError::Degenerate {
                x_min,
                x_max,
                z_min,
                z_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            z_min,
            z_max,
        })
    }

    /// Zone membership, inclusive on the boundary.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.z_min <= z && z <= self.z_max
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn z_bounds(&self) -> (f64, f64) {
        (self.z_min, self.z_max)
    }
}

/// Serialized form: two diagonal corners, order-insensitive.
#[derive(Serialize, Deserialize)]
struct ZoneCorners {
    a: [f64; 2],
    b: [f64; 2],
}

impl TryFrom<ZoneCorners> for KeepOutZone {
    type Error = ZoneError;

    fn try_from(c: ZoneCorners) -> Result<Self, Self::Error> {
        KeepOutZone::new((c.a[0], c.a[1]), (c.b[0], c.b[1]))
    }
}

impl From<KeepOutZone> for ZoneCorners {
    fn from(z: KeepOutZone) -> Self {
        Self {
            a: [z.x_min, z.z_min],
            b: [z.x_max, z.z_max],
        }
    }
}
