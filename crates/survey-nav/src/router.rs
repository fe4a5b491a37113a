use nalgebra::Point3;

use survey_core::Waypoint;

use crate::{Corridor, KeepOutZone, TransitGrid};

#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    /// Every grid candidate lies inside a keep-out zone. Retrying cannot
    /// help: the search is static, so the caller must fall back to a
    /// pre-configured route or abort.
    #[error("no feasible transit point: all {candidates} grid candidates are blocked")]
    NoFeasiblePoint { candidates: usize },
}

/// Nearest-detour transit search over a corridor grid.
///
/// This is deliberately an exhaustive `O(grid)` scan rather than a path
/// planner: corridors are small, static, and known in advance, and the
/// fixed enumeration order makes the result reproducible. The candidate
/// grid is flattened once at construction.
#[derive(Clone, Debug)]
pub struct ZoneAwareRouter {
    grid: TransitGrid,
}

impl ZoneAwareRouter {
    pub fn new(corridor: &Corridor) -> Self {
        Self {
            grid: TransitGrid::build(corridor),
        }
    }

    /// Cheapest unblocked transit point between `current` and `target`.
    ///
    /// Cost is the two-leg Euclidean path length through the candidate,
    /// with the candidate pinned to the corridor's `y` plane. The first
    /// minimum in enumeration order wins.
    pub fn transit_point(
        &self,
        current: &Point3<f64>,
        target: &Point3<f64>,
        zones: &[KeepOutZone],
    ) -> Result<Point3<f64>, RouteError> {
        let y = self.grid.y();
        let mut best: Option<(f64, Point3<f64>)> = None;

        for &(x, z) in self.grid.points() {
            if zones.iter().any(|zone| zone.contains(x, z)) {
                continue;
            }
            let p = Point3::new(x, y, z);
            let cost = (p - current).norm() + (target - p).norm();
            if best.map_or(true, |(c, _)| cost < c) {
                best = Some((cost, p));
            }
        }

        match best {
            Some((cost, p)) => {
                log::debug!(
                    "transit point ({:.3}, {:.3}, {:.3}) cost {:.3}",
                    p.x,
                    p.y,
                    p.z,
                    cost
                );
                Ok(p)
            }
            None => Err(RouteError::NoFeasiblePoint {
                candidates: self.grid.points().len(),
            }),
        }
    }

    /// Ordered waypoints threading the corridor: the transit point (flown
    /// with the target's orientation) followed by the target itself.
    pub fn plan(
        &self,
        current: &Point3<f64>,
        target: &Waypoint,
        zones: &[KeepOutZone],
    ) -> Result<Vec<Waypoint>, RouteError> {
        let transit = self.transit_point(current, &target.position, zones)?;
        Ok(vec![
            Waypoint::new(transit, target.orientation),
            *target,
        ])
    }
}
