use nalgebra::Point3;

use survey_core::{GrayImage, Waypoint};
use survey_nav::{RouteError, ZoneAwareRouter};
use survey_vision::{
    decode_boxes, dominant_item, rectify_sheet, suppress, tally_items, DecodeError, LabelTable,
    OutputTensor, RectifyError,
};

use crate::collaborators::{pick_marker, Actuation, Camera, InferenceEngine, MarkerDetector};
use crate::config::{AreaPlan, CluePhase, MissionConfig};
use crate::report::{AreaRecord, MissionReport, RecognitionSource};
use crate::retry::{run_with_retry, OnExhausted};

/// Fatal mission failures.
///
/// Transient actuation failures never show up here unless the exhaustion
/// policy is `Abort`; empty perception results are not failures at all.
#[derive(thiserror::Error, Debug)]
pub enum MissionError {
    #[error("transit planning failed for area {area}")]
    Planning {
        area: u32,
        #[source]
        source: RouteError,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Rectify(#[from] RectifyError),
    #[error("retries exhausted while {action}")]
    ActuationExhausted { action: String },
}

/// Outcome of recognizing one captured frame.
struct FrameItem {
    name: String,
    count: usize,
}

/// Sequential mission driver.
///
/// One step completes fully before the next begins; the only mutable state
/// across steps is the tracked position and the accumulating report.
pub struct MissionRunner<'a, A, C, M, I> {
    config: &'a MissionConfig,
    labels: LabelTable,
    actuation: A,
    camera: C,
    markers: M,
    inference: I,
    position: Point3<f64>,
}

impl<'a, A, C, M, I> MissionRunner<'a, A, C, M, I>
where
    A: Actuation,
    C: Camera,
    M: MarkerDetector,
    I: InferenceEngine,
{
    pub fn new(
        config: &'a MissionConfig,
        actuation: A,
        camera: C,
        markers: M,
        inference: I,
    ) -> Self {
        let labels = LabelTable::new(config.labels.clone());
        let position = config.start;
        Self {
            config,
            labels,
            actuation,
            camera,
            markers,
            inference,
            position,
        }
    }

    /// Fly the whole mission: survey every configured area in order, then
    /// run the closing clue phase when one is configured.
    pub fn run(mut self) -> Result<MissionReport, MissionError> {
        let config = self.config;
        log::info!(
            "mission start at ({:.3}, {:.3}, {:.3}), {} areas",
            self.position.x,
            self.position.y,
            self.position.z,
            config.areas.len()
        );

        let mut report = MissionReport::default();
        for area in &config.areas {
            let record = self.survey_area(area)?;
            log::info!(
                "area {}: {} x{}",
                record.area_id,
                record.item_name,
                record.item_count
            );
            report.areas.push(record);
        }

        if let Some(clue) = &config.clue {
            self.closing_phase(clue, &mut report)?;
        }

        log::info!("mission complete");
        Ok(report)
    }

    fn survey_area(&mut self, area: &AreaPlan) -> Result<AreaRecord, MissionError> {
        let mut exhausted = Vec::new();

        let route = self.plan_route(area)?;
        for (i, waypoint) in route.iter().enumerate() {
            let label = format!("moving to area {} waypoint {}", area.id, i + 1);
            self.fly_to(waypoint, &label, &mut exhausted)?;
        }

        if let Some(flash) = &area.flashlight {
            let label = format!("setting flashlight for area {}", area.id);
            self.command(&label, &mut exhausted, |a| {
                a.set_flashlight(flash.side, flash.level)
            })?;
        }

        let capture_label = format!("capturing frame at area {}", area.id);
        let item = match self.capture_frame(&capture_label, &mut exhausted)? {
            Some(frame) => self.recognize(&frame)?,
            None => None,
        };

        let default = &self.config.default_item;
        let (item_name, item_count, source) = match item {
            Some(found) => (found.name, found.count, RecognitionSource::Detected),
            None => {
                log::info!(
                    "area {}: no item recognized, assuming default {} x{}",
                    area.id,
                    default.name,
                    default.count
                );
                (
                    default.name.clone(),
                    default.count,
                    RecognitionSource::DefaultAssumed,
                )
            }
        };

        Ok(AreaRecord {
            area_id: area.id,
            item_name,
            item_count,
            source,
            exhausted_actions: exhausted,
        })
    }

    /// Ordered waypoints toward an area: the configured approach, then the
    /// corridor transit (or the anchor directly when there is no corridor).
    ///
    /// Route infeasibility is fatal unless the area carries a pre-baked
    /// fallback route; retrying a static search cannot change its answer.
    fn plan_route(&self, area: &AreaPlan) -> Result<Vec<Waypoint>, MissionError> {
        let mut route = area.approach.clone();
        let start = route
            .last()
            .map(|w| w.position)
            .unwrap_or(self.position);

        match &area.corridor {
            Some(corridor) => {
                let router = ZoneAwareRouter::new(corridor);
                match router.plan(&start, &area.anchor, &area.zones) {
                    Ok(mut transit) => route.append(&mut transit),
                    Err(err) => match &area.fallback_route {
                        Some(fallback) => {
                            log::warn!(
                                "area {}: {err}, using pre-baked fallback route",
                                area.id
                            );
                            route.extend(fallback.iter().copied());
                            route.push(area.anchor);
                        }
                        None => {
                            return Err(MissionError::Planning {
                                area: area.id,
                                source: err,
                            })
                        }
                    },
                }
            }
            None => route.push(area.anchor),
        }
        Ok(route)
    }

    fn fly_to(
        &mut self,
        waypoint: &Waypoint,
        label: &str,
        exhausted: &mut Vec<String>,
    ) -> Result<(), MissionError> {
        let actuation = &mut self.actuation;
        let outcome = run_with_retry(&self.config.retry, label, || actuation.move_to(waypoint));
        // position tracks the commanded pose either way: the mission keeps
        // flying the remaining plan from where it should be
        self.position = waypoint.position;
        if !outcome.succeeded {
            self.note_exhaustion(label, exhausted)?;
        }
        Ok(())
    }

    fn command<F>(
        &mut self,
        label: &str,
        exhausted: &mut Vec<String>,
        mut action: F,
    ) -> Result<(), MissionError>
    where
        F: FnMut(&mut A) -> bool,
    {
        let actuation = &mut self.actuation;
        let outcome = run_with_retry(&self.config.retry, label, || action(actuation));
        if !outcome.succeeded {
            self.note_exhaustion(label, exhausted)?;
        }
        Ok(())
    }

    fn note_exhaustion(
        &self,
        label: &str,
        exhausted: &mut Vec<String>,
    ) -> Result<(), MissionError> {
        exhausted.push(label.to_owned());
        match self.config.on_exhausted {
            OnExhausted::Continue => {
                log::warn!("{label}: retries exhausted, continuing mission");
                Ok(())
            }
            OnExhausted::Abort => Err(MissionError::ActuationExhausted {
                action: label.to_owned(),
            }),
        }
    }

    fn capture_frame(
        &mut self,
        label: &str,
        exhausted: &mut Vec<String>,
    ) -> Result<Option<GrayImage>, MissionError> {
        let camera = &mut self.camera;
        let mut frame = None;
        let outcome = run_with_retry(&self.config.retry, label, || {
            frame = camera.capture();
            frame.is_some()
        });
        if !outcome.succeeded {
            self.note_exhaustion(label, exhausted)?;
        }
        Ok(frame)
    }

    /// Recognize the item on the sheet addressed by the frame's marker.
    ///
    /// `Ok(None)` covers every valid empty outcome: no marker visible, an
    /// unavailable inference engine, or no detection surviving decode and
    /// suppression. Tensor/label mismatches and degenerate markers are
    /// configuration faults and abort the run.
    fn recognize(&mut self, frame: &GrayImage) -> Result<Option<FrameItem>, MissionError> {
        let observed = self.markers.detect(frame);
        let Some(marker) = pick_marker(&observed) else {
            log::info!("no marker in frame");
            return Ok(None);
        };
        log::debug!("rectifying sheet for marker {}", marker.id);

        let sheet = rectify_sheet(&frame.view(), &marker.corners, &self.config.sheet_template)?;

        let output = match self.inference.infer(&sheet) {
            Ok(output) => output,
            Err(err) => {
                log::warn!("{err}, treating frame as empty");
                return Ok(None);
            }
        };

        let tensor = OutputTensor::new(output.channels, output.elements, &output.data)?;
        let candidates = decode_boxes(&tensor, &self.labels, &self.config.decode)?;
        let detections = suppress(candidates, &self.config.nms);
        let counts = tally_items(&detections);

        Ok(dominant_item(&counts).map(|(name, count)| FrameItem {
            name: name.to_owned(),
            count,
        }))
    }

    /// Closing phase: read the requested item at the clue pose, revisit the
    /// area that reported it, and take the closing snapshot.
    fn closing_phase(
        &mut self,
        clue: &CluePhase,
        report: &mut MissionReport,
    ) -> Result<(), MissionError> {
        let mut exhausted = Vec::new();
        self.fly_to(&clue.waypoint, "moving to clue pose", &mut exhausted)?;

        let captured = self.capture_frame("capturing frame at clue pose", &mut exhausted)?;
        let requested = match captured {
            Some(frame) => self.recognize(&frame)?.map(|item| item.name),
            None => None,
        };
        let requested =
            requested.unwrap_or_else(|| self.config.default_item.name.clone());
        log::info!("clue requests item '{requested}'");
        report.clue_item = Some(requested.clone());

        // no area reported the requested item: revisit the first area
        let target_id = report
            .area_with_item(&requested)
            .or_else(|| self.config.areas.first().map(|a| a.id));
        let Some(target_id) = target_id else {
            report.clue_exhausted_actions = exhausted;
            return Ok(());
        };
        let Some(area) = self.config.areas.iter().find(|a| a.id == target_id) else {
            report.clue_exhausted_actions = exhausted;
            return Ok(());
        };

        log::info!("revisiting area {target_id}");
        let revisit: Vec<Waypoint> = area
            .return_route
            .iter()
            .copied()
            .chain(std::iter::once(area.anchor))
            .collect();
        for (i, waypoint) in revisit.iter().enumerate() {
            let label = format!("returning to area {} waypoint {}", target_id, i + 1);
            self.fly_to(waypoint, &label, &mut exhausted)?;
        }

        self.command("taking item snapshot", &mut exhausted, |a| {
            a.take_item_snapshot()
        })?;
        report.revisited_area = Some(target_id);
        report.clue_exhausted_actions = exhausted;
        Ok(())
    }
}
