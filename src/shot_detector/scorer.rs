use crate::error::SceneError;
use crate::shot_detector::frame::{FrameDescriptor, MetricKind};

/// Upper bound of the dissimilarity scale, shared by every metric.
pub const MAX_SCORE: f32 = 255.0;

/// 差异评分器 - 相邻描述子的归一化距离 (0..=255)
///
/// Keeps the previous descriptor; the first frame of a stream scores 0
/// because it has no predecessor.
pub struct DiffScorer {
    last: Option<FrameDescriptor>,
}

impl DiffScorer {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn score(&mut self, current: &FrameDescriptor) -> Result<f32, SceneError> {
        let score = match &self.last {
            None => 0.0,
            Some(last) => {
                if !last.same_shape(current) {
                    return Err(SceneError::ShapeMismatch(format!(
                        "{:?}/{} vs {:?}/{}",
                        last.kind,
                        last.len(),
                        current.kind,
                        current.len()
                    )));
                }
                match current.kind {
                    MetricKind::HsvPixels => mean_abs_distance(&last.data, &current.data),
                    MetricKind::LumaHistogram => histogram_distance(&last.data, &current.data),
                }
            }
        };

        self.last = Some(current.clone());
        Ok(score)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for DiffScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean absolute per-component difference. Components are 0..=255,
/// so the result already sits on the shared score scale.
fn mean_abs_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() {
        return 0.0;
    }
    let sum: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    sum / a.len() as f32
}

/// Half the L1 distance between two unit histograms lies in 0..=1;
/// scale it onto 0..=255 so one threshold fits both metrics.
fn histogram_distance(a: &[f32], b: &[f32]) -> f32 {
    let l1: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    (l1 / 2.0) * MAX_SCORE
}
