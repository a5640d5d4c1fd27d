//! 时间源
//!
//! 解析器只需要"毫秒计数"这一种时间概念（对应嵌入式平台上的 `millis()`）。
//! 通过 `Clock` trait 注入，生产环境使用单调时钟，测试使用手动时钟。
//!
//! **App Start Relative Time Pattern**:
//! - 以进程内首次访问时刻为零点
//! - 不受系统时钟调整（NTP、手动修改）影响

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// 单调时钟零点（首次访问时设置，之后不变）
static APP_START: OnceLock<Instant> = OnceLock::new();

/// 获取自零点以来的毫秒数（单调递增）
fn get_monotonic_millis() -> u64 {
    let start = APP_START.get_or_init(Instant::now);
    start.elapsed().as_millis() as u64
}

/// 毫秒时间源
pub trait Clock: Send {
    /// 当前时间（毫秒，单调不减）
    fn now_ms(&self) -> u64;
}

/// 单调时钟（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        get_monotonic_millis()
    }
}

/// 手动时钟
///
/// 克隆体共享同一计数器，测试中可以把一份交给解析器，另一份用于推进时间。
///
/// ```
/// use rd03d_driver::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0);
/// let handle = clock.clone();
/// handle.advance(150);
/// assert_eq!(clock.now_ms(), 150);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// 以给定时刻创建
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// 推进时间
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    /// 设置绝对时间
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}
