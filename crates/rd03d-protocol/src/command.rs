//! 雷达命令帧构建
//!
//! 命令帧格式（共 12 字节，仅用于模式切换，上电后写入一次）：
//!
//! ```text
//! FD FC FB FA | 02 00 | 90 00 | 04 03 02 01
//!   前导码     长度LE  命令码LE   后导码
//! ```

use crate::u16_to_bytes_le;

/// 命令帧前导码
pub const COMMAND_PREAMBLE: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];

/// 命令帧后导码
pub const COMMAND_POSTAMBLE: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

/// 命令帧总长度
pub const COMMAND_SIZE: usize = 12;

/// 单目标跟踪模式命令码
pub const CMD_SINGLE_TARGET: u16 = 0x0080;

/// 多目标跟踪模式命令码
pub const CMD_MULTI_TARGET: u16 = 0x0090;

/// 多目标模式命令（预编码）
pub const MULTI_TARGET_CMD: [u8; COMMAND_SIZE] = [
    0xFD, 0xFC, 0xFB, 0xFA, // 前导码
    0x02, 0x00, // 长度
    0x90, 0x00, // 命令：多目标模式
    0x04, 0x03, 0x02, 0x01, // 后导码
];

/// 雷达模式命令
///
/// 只承载 2 字节命令码（长度字段固定为 0x0002）。
///
/// # 示例
///
/// ```rust
/// use rd03d_protocol::{SensorCommand, MULTI_TARGET_CMD};
///
/// assert_eq!(SensorCommand::multi_target().to_bytes(), MULTI_TARGET_CMD);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCommand {
    pub code: u16,
}

impl SensorCommand {
    /// 命令载荷长度（仅命令码）
    const PAYLOAD_LEN: u16 = 2;

    /// 多目标跟踪模式（最多 3 个目标）
    pub const fn multi_target() -> Self {
        Self {
            code: CMD_MULTI_TARGET,
        }
    }

    /// 单目标跟踪模式
    pub const fn single_target() -> Self {
        Self {
            code: CMD_SINGLE_TARGET,
        }
    }

    /// 编码为 12 字节命令帧
    pub fn to_bytes(&self) -> [u8; COMMAND_SIZE] {
        let mut data = [0u8; COMMAND_SIZE];
        data[0..4].copy_from_slice(&COMMAND_PREAMBLE);
        data[4..6].copy_from_slice(&u16_to_bytes_le(Self::PAYLOAD_LEN));
        data[6..8].copy_from_slice(&u16_to_bytes_le(self.code));
        data[8..12].copy_from_slice(&COMMAND_POSTAMBLE);
        data
    }
}
