use image::DynamicImage;

use crate::detection::{Detector, contours, preprocessing};
use crate::error::DetectionError;
use crate::models::{Contour, Detections, RawDetection, Size};

/// Tuning for [`RegionDetector`]
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDetectorConfig {
    /// Resolution every input is resized to before detection
    pub inference_size: Size,
    pub blur_sigma: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Edge regions with fewer pixels than this are dropped
    pub min_region_pixels: u32,
}

impl Default for RegionDetectorConfig {
    fn default() -> Self {
        Self {
            inference_size: Size::new(300, 300),
            blur_sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 100.0,
            min_region_pixels: 20,
        }
    }
}

/// Weight-free detector: edge regions at a fixed inference resolution,
/// labeled by shape and scored by how densely edges trace their outline.
#[derive(Debug, Clone)]
pub struct RegionDetector {
    config: RegionDetectorConfig,
}

impl RegionDetector {
    pub fn new(config: RegionDetectorConfig) -> Result<Self, DetectionError> {
        if config.inference_size.is_degenerate() {
            return Err(DetectionError::Init(format!(
                "inference size must be non-zero, got {}",
                config.inference_size
            )));
        }
        if !(config.blur_sigma > 0.0) {
            return Err(DetectionError::Init(format!(
                "blur sigma must be positive, got {}",
                config.blur_sigma
            )));
        }
        if config.low_threshold > config.high_threshold {
            return Err(DetectionError::Init(format!(
                "low threshold {} exceeds high threshold {}",
                config.low_threshold, config.high_threshold
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegionDetectorConfig {
        &self.config
    }
}

/// Shape label for a region, from its aspect ratio and outline density
pub fn classify(contour: &Contour) -> &'static str {
    let aspect = contour.aspect_ratio();
    let density = contour.edge_density();

    if density < 0.5 {
        "region"
    } else if aspect > 1.25 {
        "wide"
    } else if aspect < 0.8 {
        "tall"
    } else if density < 0.85 {
        // a traced circle covers roughly 0.7 of its box outline
        "circle"
    } else {
        "square"
    }
}

impl Detector for RegionDetector {
    fn name(&self) -> &str {
        "region"
    }

    fn detect(
        &self,
        image: &DynamicImage,
        max_results: usize,
    ) -> Result<Detections, DetectionError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DetectionError::InvalidInput {
                width: image.width(),
                height: image.height(),
            });
        }

        let inference_size = self.config.inference_size;
        if max_results == 0 {
            return Ok(Detections {
                items: Vec::new(),
                inference_size: Some(inference_size),
            });
        }

        let resized = preprocessing::resize_to(image, inference_size);
        let gray = preprocessing::to_grayscale(&resized);
        let blurred = preprocessing::apply_blur(&gray, self.config.blur_sigma);
        let edges = preprocessing::detect_edges(
            &blurred,
            self.config.low_threshold,
            self.config.high_threshold,
        );
        let regions = contours::find_contours(&edges, self.config.min_region_pixels);

        log::debug!(
            "{} edge regions at {} (input {}x{})",
            regions.len(),
            inference_size,
            image.width(),
            image.height()
        );

        let mut items: Vec<RawDetection> = regions
            .iter()
            .map(|region| RawDetection {
                label: classify(region).to_string(),
                score: region.edge_density(),
                bbox: region.bbox(),
            })
            .collect();

        // stable sort: equal scores keep scan order
        items.sort_by(|a, b| b.score.total_cmp(&a.score));
        items.truncate(max_results);

        Ok(Detections {
            items,
            inference_size: Some(inference_size),
        })
    }
}
