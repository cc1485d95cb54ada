use std::sync::{Arc, Mutex};

use image::DynamicImage;

use crate::detection::Detector;
use crate::error::DetectionError;
use crate::models::Detections;

type InitFn<D> = Box<dyn Fn() -> Result<D, DetectionError> + Send + Sync>;

/// Builds the wrapped detector on first use and reuses it for every later run.
///
/// A failed initialization is reported as the run's error and attempted
/// again on the next call.
pub struct LazyDetector<D> {
    name: String,
    init: InitFn<D>,
    instance: Mutex<Option<Arc<D>>>,
}

impl<D: Detector> LazyDetector<D> {
    pub fn new(
        name: impl Into<String>,
        init: impl Fn() -> Result<D, DetectionError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            init: Box::new(init),
            instance: Mutex::new(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.instance
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn instance(&self) -> Result<Arc<D>, DetectionError> {
        // Clone the Arc out so the lock is released before inference
        let mut guard = self
            .instance
            .lock()
            .map_err(|_| DetectionError::Init(format!("{} detector lock poisoned", self.name)))?;

        if let Some(detector) = guard.as_ref() {
            return Ok(detector.clone());
        }

        log::info!("Initializing {} detector...", self.name);
        let detector = Arc::new((self.init)()?);
        *guard = Some(detector.clone());
        log::info!("{} detector initialized", self.name);
        Ok(detector)
    }
}

impl<D: Detector> Detector for LazyDetector<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(
        &self,
        image: &DynamicImage,
        max_results: usize,
    ) -> Result<Detections, DetectionError> {
        self.instance()?.detect(image, max_results)
    }
}
