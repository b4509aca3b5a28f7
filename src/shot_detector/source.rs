use crate::error::SceneError;
use crate::shot_detector::frame::Frame;

/// Sequential decoded-frame source in presentation order. Decode and
/// demux live behind this seam; the detection core never touches them.
pub trait FrameSource: Send {
    /// Next frame, or `Ok(None)` at end of stream. Decode failures
    /// surface as [`SceneError::Decode`] and are not retried here.
    fn next_frame(&mut self) -> Result<Option<Frame>, SceneError>;

    fn total_frame_count(&self) -> u64;

    fn frame_rate(&self) -> f32;
}

/// 合成帧源 - 按帧号生成纯色帧（测试与基准用）
pub struct SyntheticSource {
    total_frames: u64,
    fps: f32,
    width: u32,
    height: u32,
    next: u64,
    fill: Box<dyn Fn(u64) -> [u8; 3] + Send>,
}

impl SyntheticSource {
    pub fn with_fill_pattern<F>(total_frames: u64, fps: f32, fill: F) -> Self
    where
        F: Fn(u64) -> [u8; 3] + Send + 'static,
    {
        Self {
            total_frames,
            fps,
            width: 64,
            height: 64,
            next: 0,
            fill: Box::new(fill),
        }
    }

    /// Uniform content: every frame the same solid gray.
    pub fn uniform(total_frames: u64, fps: f32) -> Self {
        Self::with_fill_pattern(total_frames, fps, |_| [128, 128, 128])
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SceneError> {
        if self.next >= self.total_frames {
            return Ok(None);
        }
        let frame_number = self.next;
        self.next += 1;

        let fill = (self.fill)(frame_number);
        let data: Vec<u8> = (0..(self.width * self.height)).flat_map(|_| fill).collect();
        let timestamp_ms = (frame_number as f64 * 1000.0 / self.fps as f64) as u64;

        Ok(Some(Frame::new(
            self.width,
            self.height,
            data,
            timestamp_ms,
            frame_number,
        )))
    }

    fn total_frame_count(&self) -> u64 {
        self.total_frames
    }

    fn frame_rate(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_source_counts_and_ends() {
        let mut source = SyntheticSource::uniform(3, 30.0);
        assert_eq!(source.total_frame_count(), 3);

        for expected in 0..3 {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.frame_number, expected);
            assert!(frame.has_valid_layout());
        }
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_fill_pattern_changes_content() {
        let mut source = SyntheticSource::with_fill_pattern(2, 30.0, |n| {
            if n == 0 {
                [0, 0, 0]
            } else {
                [255, 255, 255]
            }
        });
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_ne!(first.data[0], second.data[0]);
    }
}
