use crate::error::SceneError;
use crate::shot_detector::frame::{Frame, FrameDescriptor, MetricKind};

/// Frames at or below this width are never downscaled.
const DEFAULT_MIN_WIDTH: u32 = 256;
const HISTOGRAM_BINS: usize = 64;

/// 度量提取器 - 把一帧压缩为定长内容描述子
///
/// Pure: identical frame + config always yields the identical descriptor.
pub struct MetricExtractor {
    kind: MetricKind,
    downsample_factor: u32,
}

impl MetricExtractor {
    /// `downsample_factor == 0` picks a factor from the frame width so the
    /// descriptor cost stays bounded regardless of source resolution.
    pub fn new(kind: MetricKind, downsample_factor: u32) -> Self {
        Self {
            kind,
            downsample_factor,
        }
    }

    pub fn extract(&self, frame: &Frame) -> Result<FrameDescriptor, SceneError> {
        if !frame.has_valid_layout() {
            return Err(SceneError::InvalidFrame {
                frame_number: frame.frame_number,
                reason: format!(
                    "expected {} bytes of RGB24, got {}",
                    frame.pixel_count() * 3,
                    frame.data.len()
                ),
            });
        }

        let factor = self.effective_factor(frame.width);
        let (rgb, _, _) = downsample(frame, factor)?;

        let data = match self.kind {
            MetricKind::HsvPixels => hsv_pixels(&rgb),
            MetricKind::LumaHistogram => luma_histogram(&rgb),
        };

        Ok(FrameDescriptor {
            kind: self.kind,
            data,
        })
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    fn effective_factor(&self, frame_width: u32) -> u32 {
        if self.downsample_factor > 0 {
            return self.downsample_factor;
        }
        if frame_width < DEFAULT_MIN_WIDTH {
            1
        } else {
            frame_width / DEFAULT_MIN_WIDTH
        }
    }
}

/// Returns packed RGB of the downscaled frame plus its dimensions.
fn downsample(frame: &Frame, factor: u32) -> Result<(Vec<u8>, u32, u32), SceneError> {
    if factor <= 1 {
        return Ok((frame.data.clone(), frame.width, frame.height));
    }

    let target_w = (frame.width / factor).max(1);
    let target_h = (frame.height / factor).max(1);

    let img = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
        || SceneError::InvalidFrame {
            frame_number: frame.frame_number,
            reason: "frame buffer does not match dimensions".to_string(),
        },
    )?;
    let resized = image::imageops::resize(
        &img,
        target_w,
        target_h,
        image::imageops::FilterType::Triangle,
    );

    Ok((resized.into_raw(), target_w, target_h))
}

/// Per-pixel HSV, each channel scaled to 0..=255.
fn hsv_pixels(rgb: &[u8]) -> Vec<f32> {
    let mut out = Vec::with_capacity(rgb.len());
    for px in rgb.chunks_exact(3) {
        let [h, s, v] = rgb_to_hsv(px[0], px[1], px[2]);
        out.push(h);
        out.push(s);
        out.push(v);
    }
    out
}

/// Luminance histogram normalized to sum 1.
fn luma_histogram(rgb: &[u8]) -> Vec<f32> {
    let mut bins = vec![0u32; HISTOGRAM_BINS];
    let mut total = 0u32;

    for px in rgb.chunks_exact(3) {
        let luma = (px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114) / 1000;
        let idx = (luma as usize * HISTOGRAM_BINS / 256).min(HISTOGRAM_BINS - 1);
        bins[idx] += 1;
        total += 1;
    }

    if total == 0 {
        return vec![0.0; HISTOGRAM_BINS];
    }
    bins.iter()
        .map(|&count| count as f32 / total as f32)
        .collect()
}

fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [f32; 3] {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    [hue / 360.0 * 255.0, saturation * 255.0, max * 255.0]
}
