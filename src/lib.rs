pub mod config;
pub mod controller;
pub mod detection;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod overlay;

pub use config::Settings;
pub use controller::{Generation, PipelineController, PipelineState, Status};
pub use detection::{Detector, LazyDetector, RegionDetector, RegionDetectorConfig};
pub use error::{DecodeError, DetectionError, PipelineError};
pub use loader::LoadedImage;
pub use models::{
    BoundingBox, Detections, DisplayedImage, NormalizedDetection, RawDetection, Size,
};
pub use overlay::{Marker, OverlayLayer};

#[cfg(feature = "gui")]
pub mod gui;
