//! 驱动层模块
//!
//! 本模块提供 RD-03D 雷达的字节流解析驱动，包括：
//! - 帧同步状态机（帧头搜索、定长接收、超时重同步）
//! - 帧尾校验与目标解码（委托给 `rd03d-protocol`）
//! - 单回调分发与统计计数
//! - 连接状态判定
//!
//! # 使用场景
//!
//! 驱动不打开串口，只消费调用方提供的字节（逐字节、切片或 `ByteSource`）。
//! 单线程、轮询驱动：调用方需要周期性调用 [`Rd03d::update`] 或 [`Rd03d::poll`]，
//! 否则接收超时无法及时触发。

pub mod clock;
pub mod config;
pub mod dispatch;
mod error;
pub mod heartbeat;
mod radar;
pub mod source;
pub mod sync;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::RadarConfig;
pub use dispatch::{FrameCallback, FrameDispatcher, FrameStatistics};
pub use error::DriverError;
pub use heartbeat::ConnectionMonitor;
pub use radar::Rd03d;
pub use source::{ByteSource, ReaderSource, SliceSource};
pub use sync::{FrameSynchronizer, ParserState, SyncEvent};
