use std::path::PathBuf;
use std::sync::Arc;

use iced::widget::image::Handle;
use iced::widget::{Canvas, Image, button, column, container, row, stack, text};
use iced::{ContentFit, Element, Length, Subscription, Task, window};
use rfd::AsyncFileDialog;

use super::Message;
use super::widgets::OverlayCanvas;
use crate::config::Settings;
use crate::controller::{PipelineController, detect_task};
use crate::detection::Detector;
use crate::loader::{self, IMAGE_EXTENSIONS};
use crate::models::Size;

const WINDOW_SIZE: (f32, f32) = (1024.0, 768.0);
/// Space taken by padding and the controls row
const CHROME: (f32, f32) = (40.0, 100.0);

pub struct DetectlensApp {
    controller: PipelineController,
    detector: Arc<dyn Detector>,
    handle: Option<Handle>,
}

fn viewport_for(window: iced::Size) -> Size {
    Size::new(
        (window.width - CHROME.0).max(1.0) as u32,
        (window.height - CHROME.1).max(1.0) as u32,
    )
}

impl DetectlensApp {
    pub fn new(
        settings: Settings,
        detector: Arc<dyn Detector>,
        initial: Option<PathBuf>,
    ) -> (Self, Task<Message>) {
        let viewport = settings.viewport.unwrap_or_else(|| {
            viewport_for(iced::Size::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
        });
        let mut app = Self {
            controller: PipelineController::new(settings.max_results)
                .with_viewport(Some(viewport)),
            detector,
            handle: None,
        };
        let task = match initial {
            Some(path) => app.start(path),
            None => Task::none(),
        };
        (app, task)
    }

    fn start(&mut self, path: PathBuf) -> Task<Message> {
        let generation = self.controller.select_file(&path);
        self.handle = None;
        Task::perform(loader::load(path), move |result| {
            Message::Loaded(generation, result.map_err(Arc::new))
        })
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select Image")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file(),
                |handle| Message::Picked(handle.map(|file| file.path().to_path_buf())),
            ),
            Message::Picked(None) => Task::none(),
            Message::Picked(Some(path)) => self.start(path),
            Message::Loaded(generation, result) => {
                let Some(image) = self.controller.apply_load(generation, result) else {
                    return Task::none();
                };
                self.handle = self
                    .controller
                    .loaded_image()
                    .map(|loaded| Handle::from_bytes(loaded.bytes.to_vec()));
                Task::perform(
                    detect_task(self.detector.clone(), image, self.controller.max_results()),
                    move |result| Message::Detected(generation, result.map_err(Arc::new)),
                )
            }
            Message::Detected(generation, result) => {
                self.controller.apply_detection(generation, result);
                Task::none()
            }
            Message::Resized(size) => {
                self.controller.set_viewport(viewport_for(size));
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let displayed = self.controller.displayed_image();
        let picture: Element<'_, Message> = match (displayed, &self.handle) {
            (Some(shown), Some(handle)) => {
                let width = Length::Fixed(shown.rendered.width as f32);
                let height = Length::Fixed(shown.rendered.height as f32);
                let overlay = OverlayCanvas {
                    markers: self.controller.markers().to_vec(),
                };
                stack![
                    Image::new(handle.clone())
                        .width(width)
                        .height(height)
                        .content_fit(ContentFit::Fill),
                    Canvas::new(overlay).width(width).height(height),
                ]
                .into()
            }
            _ => text(self.controller.status_message()).into(),
        };

        let label = if self.controller.is_busy() {
            "Recognizing..."
        } else {
            "Select Image"
        };

        column![
            container(picture)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
            row![
                button(text(label)).on_press(Message::PickImage),
                text(self.controller.status_message()),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .padding(20)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        window::resize_events().map(|(_id, size)| Message::Resized(size))
    }
}

/// Open the desktop viewer, optionally starting on `initial`
pub fn run(
    settings: Settings,
    detector: Arc<dyn Detector>,
    initial: Option<PathBuf>,
) -> anyhow::Result<()> {
    iced::application(
        move || DetectlensApp::new(settings.clone(), detector.clone(), initial.clone()),
        DetectlensApp::update,
        DetectlensApp::view,
    )
    .title("detectlens")
    .subscription(DetectlensApp::subscription)
    .window_size(WINDOW_SIZE)
    .run()
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}
