#![allow(dead_code)]

use detectlens::{
    BoundingBox, DetectionError, Detections, Detector, LoadedImage, Marker, RawDetection, Size,
};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Creates a solid red test image and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32) -> NamedTempFile {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([255u8, 0u8, 0u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Creates a temp file with a `.png` suffix whose contents are not an image
pub fn create_non_image_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(b"this is plain text, not pixels")
        .expect("Failed to write temp file");
    file
}

/// Black canvas with white filled squares at the given top-left corners
pub fn squares_image(width: u32, height: u32, side: u32, corners: &[(u32, u32)]) -> DynamicImage {
    let mut img = GrayImage::new(width, height);
    for &(cx, cy) in corners {
        for y in cy..(cy + side).min(height) {
            for x in cx..(cx + side).min(width) {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
    }
    DynamicImage::ImageLuma8(img)
}

/// An already-decoded image, for driving the controller without touching disk
pub fn loaded_image(width: u32, height: u32) -> LoadedImage {
    LoadedImage {
        path: PathBuf::from("fixture.png"),
        bytes: Arc::new(Vec::new()),
        image: Arc::new(DynamicImage::new_rgb8(width, height)),
        natural: Size::new(width, height),
    }
}

pub fn raw(label: &str, score: f32, x: f32, y: f32, width: f32, height: f32) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        score,
        bbox: BoundingBox::new(x, y, width, height),
    }
}

pub fn detections(items: Vec<RawDetection>, inference: Size) -> Detections {
    Detections {
        items,
        inference_size: Some(inference),
    }
}

/// Returns the same detections for every image
pub struct FixedDetector {
    pub result: Detections,
}

impl Detector for FixedDetector {
    fn name(&self) -> &str {
        "fixed"
    }

    fn detect(
        &self,
        _image: &DynamicImage,
        max_results: usize,
    ) -> Result<Detections, DetectionError> {
        let mut result = self.result.clone();
        result.items.truncate(max_results);
        Ok(result)
    }
}

/// Always fails inference
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn name(&self) -> &str {
        "failing"
    }

    fn detect(
        &self,
        _image: &DynamicImage,
        _max_results: usize,
    ) -> Result<Detections, DetectionError> {
        Err(DetectionError::Inference("model exploded".to_string()))
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_bbox(actual: &BoundingBox, expected: (f32, f32, f32, f32)) {
    assert_close(actual.x, expected.0);
    assert_close(actual.y, expected.1);
    assert_close(actual.width, expected.2);
    assert_close(actual.height, expected.3);
}

/// A marker's `(x, y, width, height)` in display pixels
pub fn marker_rect(marker: &Marker) -> (f32, f32, f32, f32) {
    (marker.x, marker.y, marker.width, marker.height)
}
