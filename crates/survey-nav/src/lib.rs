//! Zone-aware transit planning for the survey mission stack.
//!
//! A corridor between two survey areas is a small, static, axis-aligned
//! region of the horizontal transit plane. Keep-out zones are rectangles in
//! that plane; the router enumerates a fixed discretized grid over the
//! corridor and picks the cheapest unblocked transit point. The geometry is
//! known before the mission starts, so the grid is flattened once per
//! corridor and reused across route queries.

mod corridor;
mod router;
mod zone;

pub use corridor::{Corridor, TransitGrid};
pub use router::{RouteError, ZoneAwareRouter};
pub use zone::{KeepOutZone, ZoneError};
