pub mod error;
pub mod shot_detector;
pub mod timecode;

pub use error::SceneError;
pub use shot_detector::{
    aggregate, detect_scenes, CancelToken, CorruptFramePolicy, DetectorConfig, Frame,
    FrameSource, SceneDetector, Shot, SyntheticSource,
};
pub use timecode::FrameTimecode;
