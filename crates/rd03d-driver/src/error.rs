//! 驱动层错误类型定义
//!
//! 注意：字节流处理中的帧头失配、帧尾失配、接收超时均不会以错误形式返回，
//! 只体现在错误计数器上。这里只覆盖字节源 IO、配置加载和直接帧解码。

use rd03d_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 字节源 IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误（解析失败或取值非法）
    #[error("Invalid config: {0}")]
    Config(String),
}
