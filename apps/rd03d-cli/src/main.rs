//! # RD-03D CLI
//!
//! Command-line tool for RD-03D radar captures.
//!
//! ```bash
//! # 解码串口抓包（原始二进制）
//! rd03d-cli decode capture.bin
//!
//! # 解码十六进制文本，输出 JSON Lines
//! rd03d-cli decode --hex --json capture.txt
//!
//! # 输出多目标模式命令（写入串口）
//! rd03d-cli command --raw > /dev/ttyUSB0
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{CommandArgs, ConfigCommand, DecodeCommand};

/// RD-03D CLI - 毫米波雷达数据工具
#[derive(Parser, Debug)]
#[command(name = "rd03d-cli")]
#[command(about = "Decode RD-03D mmWave radar byte streams", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 解码抓包文件（"-" 表示标准输入）
    Decode {
        #[command(flatten)]
        args: DecodeCommand,
    },

    /// 输出模式切换命令
    Command {
        #[command(flatten)]
        args: CommandArgs,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rd03d_cli=info".parse()?)
                .add_directive("rd03d_driver=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { args } => args.execute(),
        Commands::Command { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}
