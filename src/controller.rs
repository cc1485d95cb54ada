//! Orchestration of one selection: load, detect, normalize, render.
//!
//! The controller is a plain state machine. Asynchronous work happens
//! outside of it, and each completion is handed back together with the
//! generation it was started under. Completions from a superseded
//! generation are dropped without touching the state.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;

use crate::detection::{DEFAULT_MAX_RESULTS, Detector};
use crate::error::{DetectionError, PipelineError};
use crate::loader::{self, LoadedImage};
use crate::models::{Detections, DisplayedImage, NormalizedDetection, RawDetection, Size};
use crate::normalize::{fit_within, normalize};
use crate::overlay::{Marker, OverlayLayer, build_markers};

/// Identifies one pipeline run. Strictly increasing per controller.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Detecting,
    Ready,
    /// Carries the message shown to the user
    Failed(String),
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Status::Loading | Status::Detecting)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    pub status: Status,
    pub image: Option<DisplayedImage>,
    pub detections: Vec<NormalizedDetection>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            image: None,
            detections: Vec::new(),
        }
    }
}

pub struct PipelineController {
    state: PipelineState,
    generation: Generation,
    max_results: usize,
    viewport: Option<Size>,
    loaded: Option<LoadedImage>,
    raw: Vec<RawDetection>,
    inference_size: Option<Size>,
    overlay: OverlayLayer,
}

impl PipelineController {
    pub fn new(max_results: usize) -> Self {
        Self {
            state: PipelineState::default(),
            generation: 0,
            max_results,
            viewport: None,
            loaded: None,
            raw: Vec::new(),
            inference_size: None,
            overlay: OverlayLayer::new(),
        }
    }

    /// Fit displayed images inside `viewport` instead of showing them at natural size
    pub fn with_viewport(mut self, viewport: Option<Size>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn status(&self) -> &Status {
        &self.state.status
    }

    pub fn is_busy(&self) -> bool {
        self.state.status.is_busy()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn displayed_image(&self) -> Option<DisplayedImage> {
        self.state.image
    }

    pub fn loaded_image(&self) -> Option<&LoadedImage> {
        self.loaded.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        self.overlay.as_slice()
    }

    pub fn overlay(&self) -> &OverlayLayer {
        &self.overlay
    }

    pub fn status_message(&self) -> String {
        match &self.state.status {
            Status::Idle => "Select an image".to_string(),
            Status::Loading => "Loading...".to_string(),
            Status::Detecting => "Recognizing...".to_string(),
            Status::Ready => match self.state.detections.len() {
                0 => "No objects detected".to_string(),
                1 => "1 object detected".to_string(),
                n => format!("{} objects detected", n),
            },
            Status::Failed(message) => message.clone(),
        }
    }

    /// Start a new run. Whatever was on screen is cleared before this returns,
    /// and every completion tagged with an older generation becomes stale.
    pub fn select_file(&mut self, path: &Path) -> Generation {
        self.generation += 1;
        self.reset();
        self.state.status = Status::Loading;
        log::info!("run {}: loading {}", self.generation, path.display());
        self.generation
    }

    fn reset(&mut self) {
        self.state = PipelineState::default();
        self.loaded = None;
        self.raw.clear();
        self.inference_size = None;
        self.overlay.clear();
    }

    fn accepts(&self, generation: Generation, expected: &Status, step: &str) -> bool {
        if !self.is_current(generation) {
            log::debug!(
                "discarding {} result of run {} (current run is {})",
                step,
                generation,
                self.generation
            );
            return false;
        }
        if &self.state.status != expected {
            log::debug!(
                "discarding {} result of run {} in state {:?}",
                step,
                generation,
                self.state.status
            );
            return false;
        }
        true
    }

    /// Apply the outcome of the load step.
    ///
    /// On success the run moves to `Detecting` and the decoded image is
    /// returned so the caller can start detection on it.
    pub fn apply_load<E: Display>(
        &mut self,
        generation: Generation,
        result: Result<LoadedImage, E>,
    ) -> Option<Arc<DynamicImage>> {
        if !self.accepts(generation, &Status::Loading, "load") {
            return None;
        }

        match result {
            Ok(loaded) => {
                let natural = loaded.natural;
                let rendered = match self.viewport {
                    Some(viewport) => fit_within(natural, viewport),
                    None => natural,
                };
                log::info!(
                    "run {}: image {} shown at {}",
                    generation,
                    natural,
                    rendered
                );
                let image = loaded.image.clone();
                self.state.image = Some(DisplayedImage { natural, rendered });
                self.loaded = Some(loaded);
                self.state.status = Status::Detecting;
                Some(image)
            }
            Err(error) => {
                self.fail(generation, &error);
                None
            }
        }
    }

    /// Apply the outcome of the detect step. Returns whether it was applied.
    pub fn apply_detection<E: Display>(
        &mut self,
        generation: Generation,
        result: Result<Detections, E>,
    ) -> bool {
        if !self.accepts(generation, &Status::Detecting, "detection") {
            return false;
        }

        match result {
            Ok(detections) => {
                self.raw = detections.items;
                self.inference_size = detections.inference_size;
                self.renormalize();
                self.state.status = Status::Ready;
                log::info!(
                    "run {}: {} detections",
                    generation,
                    self.state.detections.len()
                );
            }
            Err(error) => {
                // the image stays up, but with no overlays
                self.raw.clear();
                self.state.detections.clear();
                self.overlay.clear();
                self.fail(generation, &error);
            }
        }
        true
    }

    fn fail(&mut self, generation: Generation, error: &dyn Display) {
        log::warn!("run {} failed: {}", generation, error);
        self.state.status = Status::Failed(error.to_string());
    }

    /// Re-fit the current image to a new viewport and move its markers along
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
        let Some(image) = self.state.image.as_mut() else {
            return;
        };
        let rendered = fit_within(image.natural, viewport);
        if rendered == image.rendered {
            return;
        }
        image.rendered = rendered;
        if self.state.status == Status::Ready {
            self.renormalize();
        }
    }

    fn renormalize(&mut self) {
        let Some(image) = self.state.image else {
            return;
        };
        self.state.detections = normalize(&self.raw, self.inference_size, image.rendered);
        self.overlay.replace(build_markers(&self.state.detections));
    }

    /// Drive one complete run: load, detect, normalize.
    pub async fn run(
        &mut self,
        path: impl AsRef<Path>,
        detector: Arc<dyn Detector>,
    ) -> Result<&[NormalizedDetection], PipelineError> {
        let path = path.as_ref();
        let generation = self.select_file(path);

        let image = match loader::load(path).await {
            Ok(loaded) => self.apply_load::<PipelineError>(generation, Ok(loaded)),
            Err(error) => {
                self.apply_load(generation, Err(&error));
                return Err(error.into());
            }
        };
        let Some(image) = image else {
            return Ok(self.state.detections.as_slice());
        };

        log::info!("run {}: detecting with {}", generation, detector.name());
        match detect_task(detector, image, self.max_results).await {
            Ok(detections) => {
                self.apply_detection::<PipelineError>(generation, Ok(detections));
            }
            Err(error) => {
                self.apply_detection(generation, Err(&error));
                return Err(error.into());
            }
        }

        Ok(self.state.detections.as_slice())
    }
}

impl Default for PipelineController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

/// Run `detector` on the blocking pool so the event loop stays responsive
pub async fn detect_task(
    detector: Arc<dyn Detector>,
    image: Arc<DynamicImage>,
    max_results: usize,
) -> Result<Detections, DetectionError> {
    tokio::task::spawn_blocking(move || detector.detect(&image, max_results))
        .await
        .map_err(|e| DetectionError::Worker(e.to_string()))?
}
