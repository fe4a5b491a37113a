//! Core types and utilities for the survey mission stack.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about detectors, markers, or actuation; it provides the image buffers,
//! projective transforms, and pose types the higher-level crates share.

mod homography;
mod image;
mod logger;
mod pose;

pub use homography::{homography_from_quad, warp_perspective, Homography};
pub use image::{GrayImage, GrayImageView};
pub use pose::{axis_rotation, Waypoint};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
