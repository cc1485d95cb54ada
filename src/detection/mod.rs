pub mod contours;
pub mod lazy;
pub mod preprocessing;
pub mod region;

use image::DynamicImage;

use crate::error::DetectionError;
use crate::models::Detections;

pub use lazy::LazyDetector;
pub use region::{RegionDetector, RegionDetectorConfig};

/// Default cap on detections per image
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// An object-detection capability.
///
/// Implementations are blocking; callers on an async loop should run them
/// on a blocking worker. Boxes come back in the detector's own inference
/// space, which it reports alongside them.
pub trait Detector: Send + Sync {
    /// Human-readable name (used in logs)
    fn name(&self) -> &str;

    /// Detect at most `max_results` objects in `image`
    fn detect(
        &self,
        image: &DynamicImage,
        max_results: usize,
    ) -> Result<Detections, DetectionError>;
}
