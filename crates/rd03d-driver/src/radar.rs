//! RD-03D 雷达驱动
//!
//! 把同步、校验、解码、分发、连接判定串成单线程、轮询驱动的处理流程：
//!
//! ```text
//! byte ─▶ FrameSynchronizer ─(30B)─▶ RadarFrame::try_from ─▶ TargetDecoder ─▶ FrameDispatcher ─▶ 回调
//!                │                          │
//!                └── 超时: error_count++    └── 帧尾失配: error_count++
//! ```
//!
//! 所有处理方法都需要 `&mut self`：同一实例不会被并发处理，无需锁或原子量。

use crate::clock::{Clock, MonotonicClock};
use crate::config::RadarConfig;
use crate::dispatch::{FrameCallback, FrameDispatcher, FrameStatistics};
use crate::error::DriverError;
use crate::heartbeat::ConnectionMonitor;
use crate::source::ByteSource;
use crate::sync::{FrameSynchronizer, ParserState, SyncEvent};
use rd03d_protocol::{FRAME_SIZE, MAX_TARGETS, RadarFrame, Target, TargetDecoder, count_valid};
use tracing::{debug, trace, warn};

/// RD-03D 雷达驱动
///
/// # Example
///
/// ```
/// use rd03d_driver::{ManualClock, Rd03d};
/// use rd03d_protocol::{RadarFrame, RawTarget, MAX_TARGETS, Target};
///
/// let clock = ManualClock::new(0);
/// let mut radar = Rd03d::with_clock(clock.clone());
/// radar.on_frame(|targets: &[Target; MAX_TARGETS], count: usize| {
///     for target in targets.iter().filter(|t| t.valid) {
///         println!("{:.1} cm @ {:.1}° ({} valid)", target.distance, target.angle, count);
///     }
/// });
///
/// let frame = RadarFrame::from_raw_targets([
///     RawTarget::encode(300, 400, -10, 320),
///     RawTarget::default(),
///     RawTarget::default(),
/// ]);
/// radar.feed(frame.as_bytes().iter().copied());
///
/// assert_eq!(radar.frame_count(), 1);
/// assert_eq!(radar.target_count(), 1);
/// assert!((radar.target(0).unwrap().distance - 50.0).abs() < 1e-4);
/// ```
pub struct Rd03d<C: Clock = MonotonicClock> {
    sync: FrameSynchronizer,
    /// 3 个目标槽位，每帧原地覆盖
    targets: [Target; MAX_TARGETS],
    dispatcher: FrameDispatcher,
    monitor: ConnectionMonitor,
    config: RadarConfig,
    clock: C,
}

impl Rd03d<MonotonicClock> {
    /// 使用默认配置和单调时钟创建
    pub fn new() -> Self {
        Self::with_config(RadarConfig::default(), MonotonicClock)
    }
}

impl Default for Rd03d<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Rd03d<C> {
    /// 使用默认配置和指定时钟创建
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(RadarConfig::default(), clock)
    }

    /// 使用指定配置和时钟创建
    ///
    /// 创建时刻同时作为"最近字节时间"和"最近帧时间"，
    /// 因此新实例在第一个连接窗口内视为在线。
    pub fn with_config(config: RadarConfig, clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            sync: FrameSynchronizer::new(now),
            targets: [Target::default(); MAX_TARGETS],
            dispatcher: FrameDispatcher::new(now),
            monitor: ConnectionMonitor::new(config.connection_window_ms),
            config,
            clock,
        }
    }

    // ========================================================================
    // 处理
    // ========================================================================

    /// 处理一个字节
    ///
    /// 先执行超时检查，再把字节交给同步器。
    pub fn process_byte(&mut self, byte: u8) {
        let now = self.clock.now_ms();
        self.run_timeout_guard(now);

        match self.sync.push(byte, now) {
            SyncEvent::Pending => {},
            SyncEvent::HeaderLocked => trace!("Frame header locked"),
            SyncEvent::Complete(bytes) => self.handle_frame(&bytes, now),
        }
    }

    /// 依次处理一组字节，返回处理的字节数
    pub fn feed<I>(&mut self, bytes: I) -> usize
    where
        I: IntoIterator<Item = u8>,
    {
        let mut processed = 0;
        for byte in bytes {
            self.process_byte(byte);
            processed += 1;
        }
        processed
    }

    /// 仅执行超时检查（无新字节时也应定期调用）
    ///
    /// 返回本次是否因超时丢弃了半帧。
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.run_timeout_guard(now)
    }

    /// 轮询入口：超时检查后读空字节源，返回处理的字节数
    ///
    /// 字节源的 IO 错误会直接返回；此前已处理的字节保持生效。
    pub fn update<S>(&mut self, source: &mut S) -> Result<usize, DriverError>
    where
        S: ByteSource + ?Sized,
    {
        self.poll();

        let mut processed = 0;
        while let Some(byte) = source.read_byte()? {
            self.process_byte(byte);
            processed += 1;
        }
        Ok(processed)
    }

    /// 直接解码一帧已切好的 30 字节数据（不经过同步器）
    ///
    /// 用于上游已经完成切帧的场景（如按帧存储的抓包）。校验失败时计一次错误并返回，
    /// 解析器状态不受影响。
    pub fn decode_frame(&mut self, bytes: &[u8]) -> Result<usize, DriverError> {
        let now = self.clock.now_ms();
        let frame = RadarFrame::try_from(bytes).inspect_err(|_| {
            self.dispatcher.record_error();
        })?;
        TargetDecoder::decode_into(&frame, &mut self.targets);
        Ok(self.dispatcher.dispatch(&self.targets, now))
    }

    /// 强制回到帧头搜索状态（不影响计数器）
    pub fn reset_parser(&mut self) {
        self.sync.reset();
    }

    fn run_timeout_guard(&mut self, now: u64) -> bool {
        let buffered = self.sync.buffered();
        let idle_ms = self.sync.idle_ms(now);
        if self.sync.check_timeout(now, self.config.frame_timeout_ms) {
            self.dispatcher.record_error();
            warn!(
                "Frame collection timeout after {}ms with {}/{} bytes, resynchronizing",
                idle_ms, buffered, FRAME_SIZE
            );
            return true;
        }
        false
    }

    fn handle_frame(&mut self, bytes: &[u8; FRAME_SIZE], now: u64) {
        match RadarFrame::try_from(bytes) {
            Ok(frame) => {
                TargetDecoder::decode_into(&frame, &mut self.targets);
                let count = self.dispatcher.dispatch(&self.targets, now);
                trace!("Frame dispatched: {} valid targets", count);
            },
            Err(e) => {
                self.dispatcher.record_error();
                warn!("Dropping radar frame: {}", e);
            },
        }
    }

    // ========================================================================
    // 回调
    // ========================================================================

    /// 注册帧回调（替换已注册的回调）
    pub fn on_frame<F>(&mut self, callback: F)
    where
        F: FrameCallback + 'static,
    {
        if self.dispatcher.set_callback(Box::new(callback)) {
            debug!("Frame callback replaced");
        } else {
            debug!("Frame callback registered");
        }
    }

    /// 移除帧回调
    pub fn clear_callback(&mut self) {
        self.dispatcher.clear_callback();
    }

    // ========================================================================
    // 查询
    // ========================================================================

    /// 获取第 `index` 个目标（0-2），越界返回 `None`
    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    /// 获取全部 3 个目标槽位
    pub fn targets(&self) -> &[Target; MAX_TARGETS] {
        &self.targets
    }

    /// 当前有效目标数（0-3）
    pub fn target_count(&self) -> usize {
        count_valid(&self.targets)
    }

    /// 累计成功解码的帧数
    pub fn frame_count(&self) -> u64 {
        self.dispatcher.statistics().frame_count
    }

    /// 累计错误数（帧尾失配 + 接收超时）
    pub fn error_count(&self) -> u64 {
        self.dispatcher.statistics().error_count
    }

    /// 统计快照
    pub fn statistics(&self) -> FrameStatistics {
        self.dispatcher.statistics()
    }

    /// 当前解析器状态
    pub fn parser_state(&self) -> ParserState {
        self.sync.state()
    }

    /// 设置帧接收超时（毫秒）
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        debug!("Frame timeout set to {}ms", timeout_ms);
        self.config.frame_timeout_ms = timeout_ms;
    }

    /// 当前帧接收超时（毫秒）
    pub fn timeout_ms(&self) -> u64 {
        self.config.frame_timeout_ms
    }

    /// 雷达是否在线（最近一帧距今小于连接窗口）
    pub fn is_connected(&self) -> bool {
        let last = self.dispatcher.statistics().last_frame_ms;
        self.monitor.is_connected(last, self.clock.now_ms())
    }

    /// 当前生效的配置
    pub fn config(&self) -> &RadarConfig {
        &self.config
    }
}

impl<C: Clock> std::fmt::Debug for Rd03d<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rd03d")
            .field("state", &self.sync.state())
            .field("targets", &self.targets)
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish()
    }
}
