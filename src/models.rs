use serde::Serialize;

/// Pixel extent of an image or coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, so no ratio can be taken against it
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned box: top-left corner plus extent, in whatever space produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}

/// One detection as reported by a detector, bbox in inference space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDetection {
    pub label: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

/// A detection whose bbox has been rescaled into display space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDetection {
    pub label: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

impl From<RawDetection> for NormalizedDetection {
    fn from(raw: RawDetection) -> Self {
        Self {
            label: raw.label,
            score: raw.score,
            bbox: raw.bbox,
        }
    }
}

/// Everything a detector hands back for one image
#[derive(Debug, Clone, Default)]
pub struct Detections {
    pub items: Vec<RawDetection>,
    /// Resolution the model worked at. `None` if the detector could not say.
    pub inference_size: Option<Size>,
}

/// The image currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedImage {
    pub natural: Size,
    pub rendered: Size,
}

/// Connected edge region found by the region detector
#[derive(Debug, Clone)]
pub struct Contour {
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl Contour {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn perimeter(&self) -> f32 {
        // Approximate perimeter from bounding box
        2.0 * (self.width() as f32 + self.height() as f32)
    }

    pub fn aspect_ratio(&self) -> f32 {
        let w = self.width() as f32;
        let h = self.height() as f32;
        if h == 0.0 {
            return 0.0;
        }
        w / h
    }

    /// Share of the box outline covered by edge pixels, clamped to [0, 1]
    pub fn edge_density(&self) -> f32 {
        let perimeter = self.perimeter();
        if perimeter == 0.0 {
            return 0.0;
        }
        (self.pixel_count as f32 / perimeter).clamp(0.0, 1.0)
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x as f32,
            self.min_y as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}
