use std::path::PathBuf;

/// Failure to turn a selected file into a displayable image
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a recognized image format")]
    Unsupported { path: PathBuf },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} decoded to an empty image")]
    Empty { path: PathBuf },

    #[error("image decode task failed: {0}")]
    Worker(String),
}

/// Failure inside the detection capability, at init or inference time
#[derive(thiserror::Error, Debug)]
pub enum DetectionError {
    #[error("detector failed to initialize: {0}")]
    Init(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input image: {width}x{height}")]
    InvalidInput { width: u32, height: u32 },

    #[error("detection task failed: {0}")]
    Worker(String),
}

/// Errors that end a pipeline run in the `Failed` state
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Detection(#[from] DetectionError),
}
