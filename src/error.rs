use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid frame {frame_number}: {reason}")]
    InvalidFrame { frame_number: u64, reason: String },
    #[error("Descriptor mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid score {score} at frame {frame_number}")]
    InvalidScore { frame_number: u64, score: f32 },
    #[error("Detector already flushed")]
    DetectorClosed,
    #[error("Cannot aggregate an empty stream")]
    EmptyStream,
    #[error("Frame rate too small: {0}")]
    InvalidFrameRate(f32),
}
