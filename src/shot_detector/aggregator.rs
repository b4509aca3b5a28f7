use crate::error::SceneError;
use crate::timecode::FrameTimecode;
use serde::{Deserialize, Serialize};

/// One detected shot. Frames are inclusive on both ends; `end_time` is
/// the presentation time of the frame after `end_frame`, so the time
/// ranges of consecutive shots tile exactly like the frame ranges do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub start_frame: u64,
    pub end_frame: u64,
    pub start_time: FrameTimecode,
    pub end_time: FrameTimecode,
}

impl Shot {
    pub fn frame_count(&self) -> u64 {
        self.end_frame - self.start_frame + 1
    }
}

/// 把边界列表 + 流长度收敛成连续无缝的镜头列表
///
/// An implicit boundary at frame 0 opens the first shot, an implicit one
/// at `total_frames` closes the last; boundaries outside `(0, total_frames)`
/// are ignored because the implicit endpoints already cover them.
pub fn aggregate(
    boundaries: &[u64],
    total_frames: u64,
    fps: f32,
) -> Result<Vec<Shot>, SceneError> {
    if total_frames == 0 {
        return Err(SceneError::EmptyStream);
    }

    let mut starts: Vec<u64> = Vec::with_capacity(boundaries.len() + 1);
    starts.push(0);
    for &b in boundaries {
        if b > 0 && b < total_frames && Some(&b) != starts.last() {
            starts.push(b);
        }
    }

    let mut shots = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = match starts.get(i + 1) {
            Some(&next) => next - 1,
            None => total_frames - 1,
        };
        shots.push(Shot {
            start_frame: start,
            end_frame: end,
            start_time: FrameTimecode::new(start, fps)?,
            end_time: FrameTimecode::new(end + 1, fps)?,
        });
    }

    Ok(shots)
}
