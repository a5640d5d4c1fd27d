//! 协议常量定义
//!
//! 集中定义帧格式和时序相关的常量，避免在代码中散落"魔法数"。

/// 帧头（AA FF 03 00）
pub const FRAME_HEADER: [u8; FRAME_HEADER_SIZE] = [0xAA, 0xFF, 0x03, 0x00];

/// 帧尾（55 CC）
pub const FRAME_TAIL: [u8; FRAME_TAIL_SIZE] = [0x55, 0xCC];

/// 帧头长度
pub const FRAME_HEADER_SIZE: usize = 4;

/// 帧尾长度
pub const FRAME_TAIL_SIZE: usize = 2;

/// 单个目标数据块长度（4 个 u16 LE 字段）
pub const TARGET_BLOCK_SIZE: usize = 8;

/// 每帧最多上报的目标数
pub const MAX_TARGETS: usize = 3;

/// 完整帧长度：帧头(4) + 3*目标(24) + 帧尾(2)
pub const FRAME_SIZE: usize = FRAME_HEADER_SIZE + MAX_TARGETS * TARGET_BLOCK_SIZE + FRAME_TAIL_SIZE;

/// 帧尾在帧内的偏移
pub const FRAME_TAIL_OFFSET: usize = FRAME_SIZE - FRAME_TAIL_SIZE;

/// 串口波特率（雷达固定，不可配置）
pub const UART_BAUD_RATE: u32 = 256_000;

/// 默认帧接收超时（毫秒）
///
/// 收到帧头后，超过此时间未收到下一个字节，则丢弃半帧并重新同步。
pub const DEFAULT_FRAME_TIMEOUT_MS: u64 = 100;

/// 默认连接判定窗口（毫秒）
///
/// 最近一次有效帧距今小于此值，认为雷达在线。
pub const DEFAULT_CONNECTION_WINDOW_MS: u64 = 1000;

/// 第 `index` 个目标数据块在帧内的起始偏移
///
/// 目标 1: 4-11，目标 2: 12-19，目标 3: 20-27
pub const fn target_block_offset(index: usize) -> usize {
    FRAME_HEADER_SIZE + index * TARGET_BLOCK_SIZE
}
