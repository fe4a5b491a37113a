//! Sequential survey mission driver.
//!
//! The mission model is single-threaded and synchronous: move, capture,
//! recognize, record, one area after another. Hardware and inference live
//! behind the collaborator traits ([`Actuation`], [`Camera`],
//! [`MarkerDetector`], [`InferenceEngine`]); every commanded action runs
//! inside the bounded-retry loop of [`run_with_retry`]. The runner keeps
//! the mission moving on empty perception results and tolerated retry
//! exhaustion, and fails fast on configuration faults and infeasible
//! transit plans.

mod collaborators;
mod config;
mod report;
mod retry;
mod runner;

pub use collaborators::{
    pick_marker, Actuation, Camera, DetectedMarker, FlashSide, InferenceEngine, InferenceError,
    MarkerDetector, TensorOutput,
};
pub use config::{AreaPlan, CluePhase, DefaultItem, FlashCommand, MissionConfig};
pub use report::{AreaRecord, MissionReport, RecognitionSource};
pub use retry::{run_with_retry, OnExhausted, RetryOutcome, RetryPolicy};
pub use runner::{MissionError, MissionRunner};
