use serde::{Deserialize, Serialize};

fn default_margin() -> f64 {
    0.2
}

fn default_step() -> f64 {
    0.01
}

/// Axis-aligned transit corridor between two survey areas.
///
/// Only `x` and `z` vary while transiting; `y` is fixed for the corridor.
/// Candidate transit points are inset from each boundary by `margin` and
/// spaced `step` apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub y: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

/// Flattened candidate grid for one corridor.
///
/// Enumeration order is fixed: x-major, both axes ascending. The router's
/// tie-break (first minimum wins) depends on this order, so the grid is
/// built once per corridor and reused for every route query.
#[derive(Clone, Debug)]
pub struct TransitGrid {
    y: f64,
    points: Vec<(f64, f64)>,
}

impl TransitGrid {
    pub fn build(corridor: &Corridor) -> Self {
        let xs = axis_samples(corridor.x_min, corridor.x_max, corridor.margin, corridor.step);
        let zs = axis_samples(corridor.z_min, corridor.z_max, corridor.margin, corridor.step);

        let mut points = Vec::with_capacity(xs.len() * zs.len());
        for &x in &xs {
            for &z in &zs {
                points.push((x, z));
            }
        }
        log::debug!(
            "built transit grid: {} x {} = {} candidates",
            xs.len(),
            zs.len(),
            points.len()
        );
        Self {
            y: corridor.y,
            points,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// Inclusive samples of `[lo + margin, hi - margin]` spaced `step` apart.
///
/// Indices are multiplied rather than accumulated so the grid does not
/// drift over long spans. An inverted or empty span yields no samples.
fn axis_samples(lo: f64, hi: f64, margin: f64, step: f64) -> Vec<f64> {
    let start = lo + margin;
    let stop = hi - margin;
    if stop < start || step <= 0.0 {
        return Vec::new();
    }
    let count = ((stop - start) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| start + i as f64 * step).collect()
}
