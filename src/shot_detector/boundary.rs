use crate::error::SceneError;
use crate::shot_detector::window::RollingStats;
use log::debug;

/// Multiplier applied to the window stdev in adaptive mode.
const ADAPTIVE_K: f32 = 3.0;
/// Adaptive stats need at least this many samples before they are trusted.
const ADAPTIVE_MIN_SAMPLES: usize = 2;

/// Threshold policy seam: fixed vs adaptive, picked once at construction.
pub trait ThresholdPolicy: Send {
    /// Cut threshold for the incoming score.
    fn effective_threshold(&self) -> f32;

    /// Feed a score that did NOT produce a boundary. Accepted spikes are
    /// kept out of the window so they do not inflate later thresholds.
    fn observe(&mut self, score: f32);

    fn reset(&mut self);
}

pub struct FixedThreshold {
    threshold: f32,
}

impl FixedThreshold {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl ThresholdPolicy for FixedThreshold {
    fn effective_threshold(&self) -> f32 {
        self.threshold
    }

    fn observe(&mut self, _score: f32) {}

    fn reset(&mut self) {}
}

/// `mean + k * stdev` over a rolling window of recent scores.
/// Falls back to the fixed threshold until the window has history.
pub struct AdaptiveThreshold {
    fallback: f32,
    window: RollingStats,
}

impl AdaptiveThreshold {
    pub fn new(fallback: f32, window_size: usize) -> Self {
        Self {
            fallback,
            window: RollingStats::with_capacity(window_size),
        }
    }
}

impl ThresholdPolicy for AdaptiveThreshold {
    fn effective_threshold(&self) -> f32 {
        if self.window.len() < ADAPTIVE_MIN_SAMPLES {
            return self.fallback;
        }
        self.window.mean() + ADAPTIVE_K * self.window.stdev()
    }

    fn observe(&mut self, score: f32) {
        self.window.push(score);
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectorState {
    AwaitingFirstScore,
    Streaming,
    Flushed,
}

/// 边界判定状态机 - 消费分数流，产出剪切点
///
/// Decisions are causal and irrevocable: one pass, no lookahead.
pub struct BoundaryDetector {
    policy: Box<dyn ThresholdPolicy>,
    min_scene_len: u64,
    last_boundary: u64,
    state: DetectorState,
    boundaries: Vec<u64>,
}

impl BoundaryDetector {
    pub fn new(policy: Box<dyn ThresholdPolicy>, min_scene_len: u64) -> Self {
        Self {
            policy,
            min_scene_len,
            last_boundary: 0,
            state: DetectorState::AwaitingFirstScore,
            boundaries: Vec::new(),
        }
    }

    /// Process one `(frame_index, score)` sample. Returns the accepted
    /// boundary frame, if any.
    pub fn process(&mut self, frame_index: u64, score: f32) -> Result<Option<u64>, SceneError> {
        if self.state == DetectorState::Flushed {
            return Err(SceneError::DetectorClosed);
        }
        if score.is_nan() || score < 0.0 {
            return Err(SceneError::InvalidScore {
                frame_number: frame_index,
                score,
            });
        }

        if self.state == DetectorState::AwaitingFirstScore {
            // The first frame has no predecessor and can never be a boundary.
            self.state = DetectorState::Streaming;
            self.policy.observe(score);
            return Ok(None);
        }

        let effective = self.policy.effective_threshold();
        if score > effective && frame_index - self.last_boundary >= self.min_scene_len {
            debug!(
                "boundary at frame {} (score {:.2} > threshold {:.2})",
                frame_index, score, effective
            );
            self.last_boundary = frame_index;
            self.boundaries.push(frame_index);
            return Ok(Some(frame_index));
        }

        self.policy.observe(score);
        Ok(None)
    }

    /// 收尾：之后的输入一律拒绝
    pub fn finish(&mut self) {
        self.state = DetectorState::Flushed;
    }

    /// Boundaries accepted so far. Stays valid after a failed run, so the
    /// caller can still collect partial output.
    pub fn boundaries(&self) -> &[u64] {
        &self.boundaries
    }

    pub fn reset(&mut self) {
        self.policy.reset();
        self.last_boundary = 0;
        self.state = DetectorState::AwaitingFirstScore;
        self.boundaries.clear();
    }
}
