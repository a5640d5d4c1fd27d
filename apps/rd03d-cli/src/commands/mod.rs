//! CLI 子命令

pub mod command;
pub mod config;
pub mod decode;

pub use command::CommandArgs;
pub use config::ConfigCommand;
pub use decode::DecodeCommand;
