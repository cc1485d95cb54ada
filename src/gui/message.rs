use std::path::PathBuf;
use std::sync::Arc;

use crate::controller::Generation;
use crate::error::{DecodeError, DetectionError};
use crate::loader::LoadedImage;
use crate::models::Detections;

#[derive(Debug, Clone)]
pub enum Message {
    PickImage,
    Picked(Option<PathBuf>),
    Loaded(Generation, Result<LoadedImage, Arc<DecodeError>>),
    Detected(Generation, Result<Detections, Arc<DetectionError>>),
    Resized(iced::Size),
}
