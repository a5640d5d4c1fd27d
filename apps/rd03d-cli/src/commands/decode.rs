//! 抓包解码命令
//!
//! 将串口抓包（原始二进制或十六进制文本）送入 `Rd03d`，逐帧输出目标。
//!
//! 每处理一个字节就清空输出队列，帧在其最后一个字节到达时立即输出，
//! 因此也适用于持续打开的管道（如 `cat /dev/ttyUSB0 | rd03d-cli decode -`）。

use anyhow::{Context, Result};
use clap::Args;
use crossbeam_channel::{Receiver, bounded};
use rd03d_driver::{ByteSource, FrameStatistics, MonotonicClock, Rd03d, ReaderSource, SliceSource};
use rd03d_protocol::{MAX_TARGETS, Target};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::config::load_config;

/// 解码参数
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// 抓包文件路径（"-" 表示标准输入）
    pub input: PathBuf,

    /// 输入为十六进制文本（忽略空白字符）
    #[arg(long)]
    pub hex: bool,

    /// 以 JSON Lines 输出
    #[arg(long)]
    pub json: bool,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆盖帧收集超时（毫秒）
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// 单帧输出记录
#[derive(Debug, Serialize)]
struct FrameRecord {
    index: u64,
    count: usize,
    targets: [Target; MAX_TARGETS],
}

/// 输出队列容量（每个字节后清空，单个字节最多完成一帧）
const OUTPUT_QUEUE_CAPACITY: usize = 16;

/// 注册帧回调，返回输出队列的接收端
fn attach_output(radar: &mut Rd03d) -> Receiver<FrameRecord> {
    let (tx, rx) = bounded::<FrameRecord>(OUTPUT_QUEUE_CAPACITY);
    let mut index = 0u64;
    radar.on_frame(move |targets: &[Target; MAX_TARGETS], count: usize| {
        index += 1;
        let record = FrameRecord {
            index,
            count,
            targets: *targets,
        };
        if tx.try_send(record).is_err() {
            warn!("Output queue full, dropping frame #{}", index);
        }
    });
    rx
}

/// 汇总输出记录
#[derive(Debug, Serialize)]
struct SummaryRecord {
    bytes: usize,
    frames: u64,
    errors: u64,
}

impl DecodeCommand {
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let mut radar = Rd03d::with_config(config, MonotonicClock);
        if let Some(timeout_ms) = self.timeout_ms {
            radar.set_timeout_ms(timeout_ms);
        }

        let rx = attach_output(&mut radar);
        let mut out = io::stdout();

        let consumed = if self.hex {
            let text = self.read_text()?;
            let bytes = parse_hex(&text)?;
            debug!("Decoded {} bytes of hex input", bytes.len());
            let mut source = SliceSource::new(&bytes);
            self.drain(&mut radar, &mut source, &rx, &mut out)?
        } else if self.is_stdin() {
            let mut source = ReaderSource::new(io::stdin().lock());
            self.drain(&mut radar, &mut source, &rx, &mut out)?
        } else {
            let file = File::open(&self.input)
                .with_context(|| format!("打开输入文件失败: {}", self.input.display()))?;
            let mut source = ReaderSource::new(file);
            self.drain(&mut radar, &mut source, &rx, &mut out)?
        };

        self.print_summary(consumed, &radar.statistics())
    }

    fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    fn read_text(&self) -> Result<String> {
        let mut text = String::new();
        if self.is_stdin() {
            io::stdin().read_to_string(&mut text).context("读取标准输入失败")?;
        } else {
            File::open(&self.input)
                .and_then(|mut f| f.read_to_string(&mut text))
                .with_context(|| format!("读取输入文件失败: {}", self.input.display()))?;
        }
        Ok(text)
    }

    /// 读尽数据源，边解码边输出
    ///
    /// 字节源出错时，先输出已完成的帧再返回错误。
    fn drain<S, W>(
        &self,
        radar: &mut Rd03d,
        source: &mut S,
        rx: &Receiver<FrameRecord>,
        out: &mut W,
    ) -> Result<usize>
    where
        S: ByteSource,
        W: Write,
    {
        radar.poll();

        let mut consumed = 0;
        loop {
            let byte = match source.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => break,
                Err(e) => {
                    self.flush_frames(rx, out)?;
                    return Err(e).context("读取输入失败");
                },
            };
            radar.process_byte(byte);
            consumed += 1;
            self.flush_frames(rx, out)?;
        }

        self.flush_frames(rx, out)?;
        Ok(consumed)
    }

    fn flush_frames<W: Write>(&self, rx: &Receiver<FrameRecord>, out: &mut W) -> Result<()> {
        for record in rx.try_iter() {
            self.print_frame(&record, out)?;
        }
        Ok(())
    }

    fn print_frame<W: Write>(&self, record: &FrameRecord, out: &mut W) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
            return Ok(());
        }

        writeln!(out, "Frame #{}: {} target(s)", record.index, record.count)?;
        for (slot, target) in record.targets.iter().enumerate() {
            if !target.valid {
                continue;
            }
            writeln!(
                out,
                "  [{}] x={:>6} mm  y={:>6} mm  speed={:>5} cm/s  distance={:>8.1}  angle={:>7.2}°",
                slot, target.x, target.y, target.speed, target.distance, target.angle
            )?;
        }
        Ok(())
    }

    fn print_summary(&self, consumed: usize, stats: &FrameStatistics) -> Result<()> {
        if self.json {
            let summary = SummaryRecord {
                bytes: consumed,
                frames: stats.frame_count,
                errors: stats.error_count,
            };
            eprintln!("{}", serde_json::to_string(&summary)?);
        } else {
            println!();
            println!("📊 Summary");
            println!("  bytes:  {}", consumed);
            println!("  frames: {}", stats.frame_count);
            println!("  errors: {}", stats.error_count);
        }
        info!(
            "Decoded {} frames ({} errors) from {} bytes",
            stats.frame_count, stats.error_count, consumed
        );
        Ok(())
    }
}

/// 解析十六进制文本（允许空白与 `0x` 前缀）
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text
        .split_whitespace()
        .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    hex::decode(&cleaned).context("十六进制输入格式错误")
}
