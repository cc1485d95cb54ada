//! Mapping of detector boxes from inference space into display space.

use crate::models::{NormalizedDetection, RawDetection, Size};

/// Per-axis ratios `(display.width / inference.width, display.height / inference.height)`.
///
/// Returns `None` when the inference size is missing or has a zero side.
pub fn scale_factors(inference: Option<Size>, display: Size) -> Option<(f32, f32)> {
    let inference = inference.filter(|size| !size.is_degenerate())?;
    Some((
        display.width as f32 / inference.width as f32,
        display.height as f32 / inference.height as f32,
    ))
}

/// Rescale every box into display space, preserving order.
///
/// The two axes are scaled independently. If no usable inference size is
/// available the boxes pass through untouched.
pub fn normalize(
    raw: &[RawDetection],
    inference: Option<Size>,
    display: Size,
) -> Vec<NormalizedDetection> {
    let Some((sx, sy)) = scale_factors(inference, display) else {
        log::warn!(
            "inference size {:?} unusable, leaving {} boxes unscaled",
            inference,
            raw.len()
        );
        return raw.iter().cloned().map(NormalizedDetection::from).collect();
    };

    raw.iter()
        .map(|detection| NormalizedDetection {
            label: detection.label.clone(),
            score: detection.score,
            bbox: detection.bbox.scaled(sx, sy),
        })
        .collect()
}

/// Size an image occupies when fitted inside `viewport`.
///
/// Aspect ratio is kept, the image is never enlarged past its natural size,
/// and neither side collapses to zero.
pub fn fit_within(natural: Size, viewport: Size) -> Size {
    if natural.is_degenerate() || viewport.is_degenerate() {
        return natural;
    }

    let scale = (viewport.width as f32 / natural.width as f32)
        .min(viewport.height as f32 / natural.height as f32)
        .min(1.0);

    Size::new(
        ((natural.width as f32 * scale).round() as u32).max(1),
        ((natural.height as f32 * scale).round() as u32).max(1),
    )
}
