//! 帧同步状态机
//!
//! 在无结构的字节流中定位帧边界：
//!
//! ```text
//!            帧头 4 字节全部匹配
//! SyncSeeking ──────────────────▶ Collecting
//!      ▲                              │
//!      │   满 30 字节（无论校验结果） │
//!      └──────────── 或接收超时 ──────┘
//! ```
//!
//! 同步器只负责"切帧"，不做帧尾校验、不做解码、不计数。
//! 完整的 30 字节缓冲区以值的形式交出，交出后立即回到 SyncSeeking，
//! 半帧状态不会跨越帧边界保留。

use rd03d_protocol::{FRAME_HEADER, FRAME_HEADER_SIZE, FRAME_SIZE};

/// 解析器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// 搜索帧头 AA FF 03 00
    #[default]
    SyncSeeking,
    /// 接收目标数据和帧尾
    Collecting,
}

/// 单字节处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// 字节已消费，帧未完成（含帧头失配被丢弃的字节）
    Pending,
    /// 帧头刚好匹配完成，进入 Collecting
    HeaderLocked,
    /// 缓冲区已满，交出完整的 30 字节（尚未校验帧尾）
    Complete([u8; FRAME_SIZE]),
}

/// 帧同步器
#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    /// 帧缓冲区（固定 30 字节，不重新分配）
    buffer: [u8; FRAME_SIZE],
    /// Collecting 状态下的写入位置
    frame_idx: usize,
    /// SyncSeeking 状态下的帧头匹配位置
    sync_idx: usize,
    state: ParserState,
    /// 最近一次处理字节的时间（毫秒）
    last_byte_ms: u64,
}

impl FrameSynchronizer {
    /// 创建同步器，`now_ms` 作为初始"最近字节时间"
    pub fn new(now_ms: u64) -> Self {
        Self {
            buffer: [0u8; FRAME_SIZE],
            frame_idx: 0,
            sync_idx: 0,
            state: ParserState::SyncSeeking,
            last_byte_ms: now_ms,
        }
    }

    /// 当前状态
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// 当前已缓存的字节数（帧头匹配中或接收中）
    pub fn buffered(&self) -> usize {
        match self.state {
            ParserState::SyncSeeking => self.sync_idx,
            ParserState::Collecting => self.frame_idx,
        }
    }

    /// 距最近一次处理字节的时间（毫秒）
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_byte_ms)
    }

    /// 处理一个字节
    pub fn push(&mut self, byte: u8, now_ms: u64) -> SyncEvent {
        self.last_byte_ms = now_ms;

        match self.state {
            ParserState::SyncSeeking => {
                if byte == FRAME_HEADER[self.sync_idx] {
                    self.buffer[self.sync_idx] = byte;
                    self.sync_idx += 1;
                    if self.sync_idx >= FRAME_HEADER_SIZE {
                        self.state = ParserState::Collecting;
                        self.frame_idx = FRAME_HEADER_SIZE;
                        return SyncEvent::HeaderLocked;
                    }
                } else if byte == FRAME_HEADER[0] {
                    // 可能是新帧头的起始字节
                    self.buffer[0] = byte;
                    self.sync_idx = 1;
                } else {
                    self.sync_idx = 0;
                }
                SyncEvent::Pending
            },
            ParserState::Collecting => {
                self.buffer[self.frame_idx] = byte;
                self.frame_idx += 1;
                if self.frame_idx >= FRAME_SIZE {
                    let frame = self.buffer;
                    self.reset();
                    return SyncEvent::Complete(frame);
                }
                SyncEvent::Pending
            },
        }
    }

    /// 超时检查
    ///
    /// 处于 Collecting 且空闲时间超过 `timeout_ms` 时丢弃半帧并回到 SyncSeeking，
    /// 返回 `true`。计数由调用方负责。
    pub fn check_timeout(&mut self, now_ms: u64, timeout_ms: u64) -> bool {
        if self.state == ParserState::Collecting && self.idle_ms(now_ms) > timeout_ms {
            self.reset();
            return true;
        }
        false
    }

    /// 强制回到 SyncSeeking
    pub fn reset(&mut self) {
        self.state = ParserState::SyncSeeking;
        self.sync_idx = 0;
        self.frame_idx = 0;
    }
}
