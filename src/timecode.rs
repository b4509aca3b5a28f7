use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Frame rates below this are treated as invalid.
pub const MIN_FPS: f32 = 1.0 / 100_000.0;

/// 帧号 + 帧率的时间码，渲染为 HH:MM:SS.mmm
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameTimecode {
    frame_num: u64,
    fps: f32,
}

impl FrameTimecode {
    pub fn new(frame_num: u64, fps: f32) -> Result<Self, SceneError> {
        if !fps.is_finite() || fps < MIN_FPS {
            return Err(SceneError::InvalidFrameRate(fps));
        }
        Ok(Self { frame_num, fps })
    }

    pub fn frame_num(&self) -> u64 {
        self.frame_num
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn seconds(&self) -> f64 {
        self.frame_num as f64 / self.fps as f64
    }
}

impl PartialEq for FrameTimecode {
    fn eq(&self, other: &Self) -> bool {
        self.seconds() == other.seconds()
    }
}

impl PartialOrd for FrameTimecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.seconds().partial_cmp(&other.seconds())
    }
}

impl fmt::Display for FrameTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_millis = (self.seconds() * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis / 60_000) % 60;
        let secs = (total_millis / 1000) % 60;
        let millis = total_millis % 1000;
        write!(f, "{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }
}
