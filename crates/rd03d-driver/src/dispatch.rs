//! 帧分发
//!
//! 成功解码一帧后：帧计数 +1，记录帧时间，然后调用唯一注册的回调。
//!
//! # 单回调槽位
//!
//! 与多播的钩子列表不同，这里只有一个回调槽位：重新注册会替换旧回调。
//!
//! # 使用示例
//!
//! ```rust
//! use rd03d_driver::dispatch::FrameDispatcher;
//! use rd03d_protocol::{Target, MAX_TARGETS};
//!
//! let mut dispatcher = FrameDispatcher::new(0);
//! dispatcher.set_callback(Box::new(|targets: &[Target; MAX_TARGETS], count: usize| {
//!     println!("{} targets, first at {:.1} cm", count, targets[0].distance);
//! }));
//!
//! let targets = [Target::default(); MAX_TARGETS];
//! assert_eq!(dispatcher.dispatch(&targets, 10), 0);
//! assert_eq!(dispatcher.statistics().frame_count, 1);
//! ```

use rd03d_protocol::{MAX_TARGETS, Target, count_valid};
use serde::{Deserialize, Serialize};

/// 帧回调 Trait
///
/// 每成功解码一帧调用一次，参数为 3 个目标槽位的视图和有效目标数（0-3）。
///
/// 回调在解析调用内同步执行，应尽快返回。闭包 `FnMut(&[Target; 3], usize)`
/// 自动实现此 trait。
pub trait FrameCallback: Send {
    /// 当成功解码一帧时调用
    fn on_frame(&mut self, targets: &[Target; MAX_TARGETS], count: usize);
}

impl<F> FrameCallback for F
where
    F: FnMut(&[Target; MAX_TARGETS], usize) + Send,
{
    fn on_frame(&mut self, targets: &[Target; MAX_TARGETS], count: usize) {
        self(targets, count)
    }
}

/// 帧统计（单调不减）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameStatistics {
    /// 成功解码的帧数
    pub frame_count: u64,
    /// 错误数（帧尾失配 + 接收超时）
    pub error_count: u64,
    /// 最近一次成功解码的时间（毫秒），初始为创建时间
    pub last_frame_ms: u64,
}

/// 帧分发器
pub struct FrameDispatcher {
    /// 回调槽位
    callback: Option<Box<dyn FrameCallback>>,
    stats: FrameStatistics,
}

impl FrameDispatcher {
    /// 创建分发器，`now_ms` 作为初始帧时间
    pub fn new(now_ms: u64) -> Self {
        Self {
            callback: None,
            stats: FrameStatistics {
                last_frame_ms: now_ms,
                ..FrameStatistics::default()
            },
        }
    }

    /// 注册回调（替换已有回调），返回是否发生了替换
    pub fn set_callback(&mut self, callback: Box<dyn FrameCallback>) -> bool {
        self.callback.replace(callback).is_some()
    }

    /// 移除回调
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// 是否已注册回调
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// 记录一次错误
    pub fn record_error(&mut self) {
        self.stats.error_count = self.stats.error_count.saturating_add(1);
    }

    /// 分发一帧已解码的目标，返回有效目标数
    pub fn dispatch(&mut self, targets: &[Target; MAX_TARGETS], now_ms: u64) -> usize {
        self.stats.frame_count = self.stats.frame_count.saturating_add(1);
        self.stats.last_frame_ms = now_ms;

        let count = count_valid(targets);
        if let Some(callback) = self.callback.as_mut() {
            callback.on_frame(targets, count);
        }
        count
    }

    /// 统计快照
    pub fn statistics(&self) -> FrameStatistics {
        self.stats
    }
}

impl std::fmt::Debug for FrameDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDispatcher")
            .field("has_callback", &self.has_callback())
            .field("stats", &self.stats)
            .finish()
    }
}
