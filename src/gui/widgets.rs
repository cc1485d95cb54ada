use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme};

use crate::overlay::Marker;

const LABEL_SIZE: f32 = 14.0;

/// Draws each marker from its own descriptor, on top of the displayed image
#[derive(Debug, Clone, Default)]
pub struct OverlayCanvas {
    pub markers: Vec<Marker>,
}

fn to_color(marker: &Marker) -> Color {
    let [r, g, b, _] = marker.color().0;
    Color::from_rgb8(r, g, b)
}

impl<Message> canvas::Program<Message> for OverlayCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        for marker in &self.markers {
            let color = to_color(marker);
            let outline = Path::rectangle(
                Point::new(marker.x, marker.y),
                Size::new(marker.width, marker.height),
            );
            frame.stroke(
                &outline,
                Stroke::default().with_width(2.0).with_color(color),
            );

            // label sits just above the box, or inside it at the top edge
            let label_y = if marker.y >= LABEL_SIZE + 2.0 {
                marker.y - LABEL_SIZE - 2.0
            } else {
                marker.y + 2.0
            };
            frame.fill_text(Text {
                content: marker.label.clone(),
                position: Point::new(marker.x + 2.0, label_y),
                color,
                size: Pixels(LABEL_SIZE),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
