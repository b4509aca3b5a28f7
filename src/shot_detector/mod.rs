//! 镜头边界检测 - 把解码帧流切分成连续的镜头列表
//!
//! 核心流程：
//! 1. 帧源 - 解码线程经有界队列推送帧（背压）
//! 2. 度量提取 - 降采样 HSV 像素或亮度直方图描述子
//! 3. 差异评分 - 相邻描述子的归一化距离 (0..=255)
//! 4. 边界判定 - 固定/自适应阈值状态机 + min_scene_len 抑制
//! 5. 镜头聚合 - 边界列表收敛为无缝镜头区间

pub mod aggregator;
pub mod boundary;
pub mod extractor;
pub mod frame;
pub mod pipeline;
pub mod queue;
pub mod scorer;
pub mod source;
pub mod window;

pub use aggregator::{aggregate, Shot};
pub use boundary::{AdaptiveThreshold, BoundaryDetector, FixedThreshold, ThresholdPolicy};
pub use extractor::MetricExtractor;
pub use frame::{Frame, FrameDescriptor, MetricKind};
pub use pipeline::{
    detect_scenes, CancelToken, CorruptFramePolicy, DetectorConfig, SceneDetector,
};
pub use queue::BoundedQueue;
pub use scorer::{DiffScorer, MAX_SCORE};
pub use source::{FrameSource, SyntheticSource};
pub use window::RollingStats;
