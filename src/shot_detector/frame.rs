use std::time::Duration;

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGB24 格式
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        Self {
            width,
            height,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// RGB24 layout check: 3 bytes per pixel, nothing missing.
    pub fn has_valid_layout(&self) -> bool {
        !self.data.is_empty() && self.data.len() == self.pixel_count() * 3
    }
}

/// Which per-frame content summary the extractor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MetricKind {
    /// Downsampled HSV pixels, compared by mean absolute distance.
    HsvPixels,
    /// Luminance histogram, compared by normalized bin distance.
    LumaHistogram,
}

/// 帧内容描述子（不可变，逐帧比较用）
#[derive(Debug, Clone)]
pub struct FrameDescriptor {
    pub kind: MetricKind,
    pub data: Vec<f32>,
}

impl FrameDescriptor {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn same_shape(&self, other: &FrameDescriptor) -> bool {
        self.kind == other.kind && self.data.len() == other.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 3];
        let frame = Frame::new(100, 100, data, 1000, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.pixel_count(), 10000);
        assert_eq!(frame.timestamp.as_millis(), 1000);
        assert_eq!(frame.frame_number, 30);
        assert!(frame.has_valid_layout());
    }

    #[test]
    fn test_frame_layout_check() {
        let frame = Frame::new(10, 10, vec![0u8; 10], 0, 0);
        assert!(!frame.has_valid_layout());

        let frame = Frame::new(10, 10, Vec::new(), 0, 0);
        assert!(!frame.has_valid_layout());
    }

    #[test]
    fn test_descriptor_shape() {
        let a = FrameDescriptor {
            kind: MetricKind::HsvPixels,
            data: vec![0.0; 12],
        };
        let b = FrameDescriptor {
            kind: MetricKind::HsvPixels,
            data: vec![1.0; 12],
        };
        let c = FrameDescriptor {
            kind: MetricKind::LumaHistogram,
            data: vec![0.0; 12],
        };

        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
