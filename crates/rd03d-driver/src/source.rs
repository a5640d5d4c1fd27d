//! 字节源抽象
//!
//! 驱动本身不打开串口，也不做 OS 层缓冲，只从 `ByteSource` 逐字节读取，
//! 直到"当前无数据"为止（对应嵌入式平台上的 `while (serial.available())`）。

use crate::error::DriverError;
use std::collections::VecDeque;
use std::io::{BufReader, ErrorKind, Read};

/// 字节源
pub trait ByteSource {
    /// 读取一个字节
    ///
    /// - `Ok(Some(b))`: 读到一个字节
    /// - `Ok(None)`: 当前没有可读数据（或已到达流末尾）
    /// - `Err(_)`: 底层 IO 错误
    fn read_byte(&mut self) -> Result<Option<u8>, DriverError>;
}

impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Result<Option<u8>, DriverError> {
        Ok(self.pop_front())
    }
}

/// 内存切片字节源
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// 剩余未读字节数
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>, DriverError> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }
}

/// 基于 `io::Read` 的字节源（文件、管道、已打开的串口句柄等）
///
/// 内部带缓冲。`WouldBlock`/`TimedOut` 视为"当前无数据"，`Interrupted` 自动重试。
///
/// 零长度读取（`Ok(0)`）同样只表示"当前无数据"，不会锁存：
/// 以 VMIN=0 配置的串口在无数据时也返回 0，之后的每次读取仍会访问底层句柄。
/// 对文件或管道，调用方可以用 [`ReaderSource::is_eof`] 判断最近一次读取是否到达末尾。
pub struct ReaderSource<R: Read> {
    reader: BufReader<R>,
    /// 最近一次底层读取返回 0
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            eof: false,
        }
    }

    /// 最近一次读取是否返回了零长度（文件/管道即流末尾）
    ///
    /// 读到新数据后复位。
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, DriverError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(None);
                },
                Ok(_) => {
                    self.eof = false;
                    return Ok(Some(buf[0]));
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None);
                },
                Err(e) => return Err(e.into()),
            }
        }
    }
}
