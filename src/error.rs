use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Capture device error: {0}")]
    CaptureDevice(String),

    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PulseError>;
