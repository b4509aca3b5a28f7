use crate::error::SceneError;
use crate::shot_detector::aggregator::{aggregate, Shot};
use crate::shot_detector::boundary::{AdaptiveThreshold, BoundaryDetector, FixedThreshold};
use crate::shot_detector::extractor::MetricExtractor;
use crate::shot_detector::frame::{Frame, MetricKind};
use crate::shot_detector::queue::BoundedQueue;
use crate::shot_detector::scorer::DiffScorer;
use crate::shot_detector::source::FrameSource;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// What to do with a frame the extractor rejects mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorruptFramePolicy {
    /// Abort the run (the default; matches the rest of the error model).
    Fail,
    /// Log and drop the frame, leaving detector state untouched.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Score level above which a cut is proposed (0..=255 scale).
    pub threshold: f32,
    /// Minimum frames between accepted boundaries.
    pub min_scene_len: u64,
    /// Descriptor resolution reduction; 0 = derive from frame width.
    pub downsample_factor: u32,
    /// Rolling-statistics threshold instead of the fixed one.
    pub adaptive: bool,
    /// Frames of score history for the adaptive statistics.
    pub window_size: usize,
    pub metric: MetricKind,
    pub corrupt_frame_policy: CorruptFramePolicy,
    /// Decode-to-detect queue depth (backpressure bound).
    pub queue_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 27.0,
            min_scene_len: 15,
            downsample_factor: 0,
            adaptive: false,
            window_size: 30,
            metric: MetricKind::HsvPixels,
            corrupt_frame_policy: CorruptFramePolicy::Fail,
            queue_capacity: 4,
        }
    }
}

impl DetectorConfig {
    /// Adaptive preset: threshold follows the recent score statistics,
    /// with the fixed threshold as fallback until history accumulates.
    pub fn adaptive() -> Self {
        Self {
            adaptive: true,
            ..Default::default()
        }
    }
}

/// 流式检测核心 - 提取、评分、边界判定串成单线程管线
///
/// State is scoped to one run; build a fresh one per video or `reset`.
pub struct SceneDetector {
    extractor: MetricExtractor,
    scorer: DiffScorer,
    detector: BoundaryDetector,
    corrupt_frame_policy: CorruptFramePolicy,
    frames_seen: u64,
}

impl SceneDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        let detector = if config.adaptive {
            BoundaryDetector::new(
                Box::new(AdaptiveThreshold::new(config.threshold, config.window_size)),
                config.min_scene_len,
            )
        } else {
            BoundaryDetector::new(
                Box::new(FixedThreshold::new(config.threshold)),
                config.min_scene_len,
            )
        };

        Self {
            extractor: MetricExtractor::new(config.metric, config.downsample_factor),
            scorer: DiffScorer::new(),
            detector,
            corrupt_frame_policy: config.corrupt_frame_policy,
            frames_seen: 0,
        }
    }

    /// Run one frame through the pipeline. Returns the boundary frame if
    /// this frame opened a new shot.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<Option<u64>, SceneError> {
        self.frames_seen = self.frames_seen.max(frame.frame_number + 1);

        let descriptor = match self.extractor.extract(frame) {
            Ok(d) => d,
            Err(err @ SceneError::InvalidFrame { .. }) => {
                if self.corrupt_frame_policy == CorruptFramePolicy::Skip {
                    warn!("skipping corrupt frame {}: {}", frame.frame_number, err);
                    return Ok(None);
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let score = self.scorer.score(&descriptor)?;
        self.detector.process(frame.frame_number, score)
    }

    /// Flush the detector and tile the stream into shots.
    pub fn finish(&mut self, total_frames: u64, fps: f32) -> Result<Vec<Shot>, SceneError> {
        self.detector.finish();
        aggregate(self.detector.boundaries(), total_frames, fps)
    }

    /// Cuts accepted so far; usable for partial collection after an error.
    pub fn boundaries(&self) -> &[u64] {
        self.detector.boundaries()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn reset(&mut self) {
        self.scorer.reset();
        self.detector.reset();
        self.frames_seen = 0;
    }
}

/// Cooperative abort signal shared between the caller, the decode
/// worker, and the detection loop.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Detect shots in `source`: a dedicated worker thread decodes into a
/// bounded queue, the calling thread extracts, scores, and decides.
///
/// On cancellation the run returns the shots already closed by the last
/// accepted boundary; the open tail shot is discarded, not fabricated.
pub fn detect_scenes<S>(
    mut source: S,
    config: &DetectorConfig,
    cancel: &CancelToken,
) -> Result<Vec<Shot>, SceneError>
where
    S: FrameSource + 'static,
{
    let fps = source.frame_rate();
    debug!(
        "detection run: {} frames declared, {:.2} fps",
        source.total_frame_count(),
        fps
    );

    let queue: BoundedQueue<Frame> = BoundedQueue::with_capacity(config.queue_capacity);
    let producer = queue.clone();
    let worker_cancel = cancel.clone();

    let decoder = thread::Builder::new()
        .name("scenecut-decode".to_string())
        .spawn(move || -> Result<(), SceneError> {
            let mut result = Ok(());
            while !worker_cancel.is_cancelled() {
                match source.next_frame() {
                    Ok(Some(frame)) => {
                        if !producer.push(frame) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                }
            }
            // Closing wakes a consumer blocked on pop, whatever the exit path.
            producer.close();
            result
        })
        .map_err(|e| SceneError::Decode(format!("failed to spawn decode worker: {e}")))?;

    let mut engine = SceneDetector::new(config);
    let mut stage_result: Result<(), SceneError> = Ok(());

    while let Some(frame) = queue.pop() {
        if let Err(err) = engine.process_frame(&frame) {
            stage_result = Err(err);
            break;
        }
        if cancel.is_cancelled() {
            break;
        }
    }
    // Wakes a producer blocked on push so the worker can exit.
    queue.close();

    let decode_result = decoder
        .join()
        .map_err(|_| SceneError::Decode("decode worker panicked".to_string()))?;

    stage_result?;

    if cancel.is_cancelled() {
        warn!(
            "detection aborted after {} frames, {} boundaries kept",
            engine.frames_seen(),
            engine.boundaries().len()
        );
        return match engine.boundaries().last().copied() {
            Some(last_cut) => aggregate(engine.boundaries(), last_cut, fps),
            None => Ok(Vec::new()),
        };
    }

    decode_result?;

    let total_frames = engine.frames_seen();
    debug!(
        "detection finished: {} frames, {} boundaries",
        total_frames,
        engine.boundaries().len()
    );
    engine.finish(total_frames, fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_frame(fill: u8, frame_number: u64) -> Frame {
        let data = vec![fill; 64 * 64 * 3];
        Frame::new(64, 64, data, frame_number * 33, frame_number)
    }

    fn config(threshold: f32, min_scene_len: u64) -> DetectorConfig {
        DetectorConfig {
            threshold,
            min_scene_len,
            downsample_factor: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_uniform_stream_is_single_shot() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        for i in 0..50 {
            let cut = engine.process_frame(&create_test_frame(128, i)).unwrap();
            assert!(cut.is_none());
        }
        let shots = engine.finish(50, 30.0).unwrap();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].start_frame, 0);
        assert_eq!(shots[0].end_frame, 49);
    }

    #[test]
    fn test_hard_cut_at_frame_40() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        for i in 0..100 {
            let fill = if i < 40 { 10 } else { 200 };
            let cut = engine.process_frame(&create_test_frame(fill, i)).unwrap();
            if i == 40 {
                assert_eq!(cut, Some(40));
            } else {
                assert!(cut.is_none());
            }
        }
        let shots = engine.finish(100, 30.0).unwrap();
        assert_eq!(shots.len(), 2);
        assert_eq!((shots[0].start_frame, shots[0].end_frame), (0, 39));
        assert_eq!((shots[1].start_frame, shots[1].end_frame), (40, 99));
    }

    #[test]
    fn test_close_cuts_collapse_to_first() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        for i in 0..100 {
            let fill = if i < 20 {
                10
            } else if i < 25 {
                200
            } else {
                80
            };
            engine.process_frame(&create_test_frame(fill, i)).unwrap();
        }
        assert_eq!(engine.boundaries(), &[20]);
        let shots = engine.finish(100, 30.0).unwrap();
        assert_eq!(shots.len(), 2);
    }

    #[test]
    fn test_corrupt_frame_fails_by_default() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        engine.process_frame(&create_test_frame(10, 0)).unwrap();

        let bad = Frame::new(64, 64, vec![0u8; 5], 33, 1);
        assert!(matches!(
            engine.process_frame(&bad),
            Err(SceneError::InvalidFrame { frame_number: 1, .. })
        ));
    }

    #[test]
    fn test_corrupt_frame_skipped_when_configured() {
        let mut cfg = config(30.0, 10);
        cfg.corrupt_frame_policy = CorruptFramePolicy::Skip;
        let mut engine = SceneDetector::new(&cfg);

        engine.process_frame(&create_test_frame(10, 0)).unwrap();
        let bad = Frame::new(64, 64, vec![0u8; 5], 33, 1);
        assert_eq!(engine.process_frame(&bad).unwrap(), None);

        // The stream continues as if the corrupt frame never arrived.
        let cut = engine.process_frame(&create_test_frame(10, 2)).unwrap();
        assert!(cut.is_none());
        assert_eq!(engine.frames_seen(), 3);
    }

    #[test]
    fn test_partial_boundaries_survive_failure() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        for i in 0..50 {
            let fill = if i < 20 { 10 } else { 200 };
            engine.process_frame(&create_test_frame(fill, i)).unwrap();
        }
        assert_eq!(engine.boundaries(), &[20]);

        let bad = Frame::new(64, 64, vec![0u8; 5], 0, 50);
        assert!(engine.process_frame(&bad).is_err());
        // Accepted cuts remain collectable after the failure.
        assert_eq!(engine.boundaries(), &[20]);
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut engine = SceneDetector::new(&config(30.0, 10));
        for i in 0..30 {
            let fill = if i < 20 { 10 } else { 200 };
            engine.process_frame(&create_test_frame(fill, i)).unwrap();
        }
        assert!(!engine.boundaries().is_empty());

        engine.reset();
        assert!(engine.boundaries().is_empty());
        assert_eq!(engine.frames_seen(), 0);
        // First frame after reset scores 0 again.
        let cut = engine.process_frame(&create_test_frame(255, 0)).unwrap();
        assert!(cut.is_none());
    }

    #[test]
    fn test_default_config_values() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.threshold, 27.0);
        assert_eq!(cfg.min_scene_len, 15);
        assert_eq!(cfg.queue_capacity, 4);
        assert!(!cfg.adaptive);
        assert!(DetectorConfig::adaptive().adaptive);
    }
}
