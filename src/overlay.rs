use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;

use crate::models::NormalizedDetection;

/// Outline colors, picked by marker index
pub const PALETTE: [Rgba<u8>; 6] = [
    Rgba([230, 25, 75, 255]),
    Rgba([60, 180, 75, 255]),
    Rgba([0, 130, 200, 255]),
    Rgba([245, 130, 48, 255]),
    Rgba([145, 30, 180, 255]),
    Rgba([255, 225, 25, 255]),
];

/// One overlay marker, positioned relative to the displayed image's top-left corner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Marker {
    pub fn color(&self) -> Rgba<u8> {
        PALETTE[self.index % PALETTE.len()]
    }
}

/// `"<label> <score as percent, one decimal>%"`, halves rounded away from zero
pub fn format_label(label: &str, score: f32) -> String {
    let percent = (score * 100.0 * 10.0).round() / 10.0;
    format!("{} {:.1}%", label, percent)
}

/// Build one marker per detection, each from that detection's own box
pub fn build_markers(detections: &[NormalizedDetection]) -> Vec<Marker> {
    detections
        .iter()
        .enumerate()
        .map(|(index, detection)| Marker {
            index,
            label: format_label(&detection.label, detection.score),
            x: detection.bbox.x,
            y: detection.bbox.y,
            width: detection.bbox.width,
            height: detection.bbox.height,
        })
        .collect()
}

/// The set of markers currently shown over the image
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer {
    markers: Vec<Marker>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a whole new marker set. Nothing from the previous round survives.
    pub fn replace(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Outline every marker onto `canvas`, which must be at display size.
/// Parts of a box falling outside the canvas are clipped.
pub fn draw_markers(canvas: &mut RgbaImage, markers: &[Marker]) {
    for marker in markers {
        let color = marker.color();
        let x = marker.x.round() as i32;
        let y = marker.y.round() as i32;
        let width = marker.width.round().max(1.0) as u32;
        let height = marker.height.round().max(1.0) as u32;

        draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(width, height), color);
        // second, inset pass for a 2px outline
        if width > 2 && height > 2 {
            draw_hollow_rect_mut(
                canvas,
                Rect::at(x + 1, y + 1).of_size(width - 2, height - 2),
                color,
            );
        }
    }
}
