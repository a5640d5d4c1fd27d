//! 模式切换命令输出

use anyhow::{Context, Result};
use clap::Args;
use rd03d_protocol::SensorCommand;
use std::io::Write;

/// 命令输出参数
#[derive(Args, Debug)]
pub struct CommandArgs {
    /// 单目标模式（默认多目标）
    #[arg(long)]
    pub single: bool,

    /// 输出原始字节而非十六进制文本
    #[arg(long)]
    pub raw: bool,
}

impl CommandArgs {
    pub fn execute(self) -> Result<()> {
        let command = if self.single {
            SensorCommand::single_target()
        } else {
            SensorCommand::multi_target()
        };
        let bytes = command.to_bytes();

        if self.raw {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("写入标准输出失败")?;
            stdout.flush().context("写入标准输出失败")?;
        } else {
            println!("{}", format_hex(&bytes));
        }
        Ok(())
    }
}

/// 按字节空格分隔的大写十六进制
fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
