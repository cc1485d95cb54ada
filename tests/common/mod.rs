mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from detectlens for tests
pub use detectlens::{
    BoundingBox, Detections, DetectionError, Detector, LoadedImage, NormalizedDetection,
    PipelineController, RawDetection, Size, Status,
};
