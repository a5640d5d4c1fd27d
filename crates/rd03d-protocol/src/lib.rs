//! # RD-03D Protocol
//!
//! RD-03D 24GHz 毫米波雷达串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 帧头、帧尾、帧长等协议常量
//! - `frame`: 30 字节数据帧及其完整性校验
//! - `target`: 目标数据块解码（符号位/偏移编码 → 物理量）
//! - `command`: 雷达模式切换命令
//!
//! ## 字节序
//!
//! 与 CAN 协议不同，雷达上报的所有 16 位字段均为**小端字节序**（低字节在前）。
//! 本模块提供显式的字段提取函数，不依赖内存布局或本机字节序。
//!
//! ## 帧格式
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     帧头 AA FF 03 00
//! 4       8     目标 1（x, y, speed, distance_raw，各 u16 LE）
//! 12      8     目标 2
//! 20      8     目标 3
//! 28      2     帧尾 55 CC
//! ```

pub mod command;
pub mod constants;
pub mod frame;
pub mod target;

// 重新导出常用类型
pub use command::*;
pub use constants::*;
pub use frame::*;
pub use target::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid frame header: {actual:02X?}")]
    InvalidHeader { actual: [u8; FRAME_HEADER_SIZE] },

    #[error("Invalid frame tail: expected [55, CC], got {actual:02X?}")]
    InvalidTail { actual: [u8; FRAME_TAIL_SIZE] },
}

/// 小端字节序转 u16
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// u16 转小端字节序
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}
