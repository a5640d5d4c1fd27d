//! 数据帧定义与完整性校验
//!
//! `RadarFrame` 只能通过 `TryFrom<&[u8]>` 构造（或在测试中由原始目标编码），
//! 因此持有 `RadarFrame` 即意味着长度、帧头、帧尾均已校验通过。

use crate::ProtocolError;
use crate::constants::*;
use crate::target::RawTarget;

/// 已校验的 30 字节雷达数据帧
///
/// # 设计特性
///
/// - **Copy trait**：固定 30 字节，无堆分配
/// - **已校验**：帧头 `AA FF 03 00`、帧尾 `55 CC` 均已确认
///
/// # 示例
///
/// ```rust
/// use rd03d_protocol::{RadarFrame, RawTarget, FRAME_SIZE};
///
/// let frame = RadarFrame::from_raw_targets([RawTarget::default(); 3]);
/// let bytes = *frame.as_bytes();
/// assert_eq!(bytes.len(), FRAME_SIZE);
///
/// let parsed = RadarFrame::try_from(&bytes[..]).unwrap();
/// assert_eq!(parsed, frame);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarFrame {
    data: [u8; FRAME_SIZE],
}

impl RadarFrame {
    /// 由三个原始目标编码出完整帧（帧头、帧尾自动填充）
    pub fn from_raw_targets(targets: [RawTarget; MAX_TARGETS]) -> Self {
        let mut data = [0u8; FRAME_SIZE];
        data[..FRAME_HEADER_SIZE].copy_from_slice(&FRAME_HEADER);
        for (index, target) in targets.iter().enumerate() {
            let offset = target_block_offset(index);
            data[offset..offset + TARGET_BLOCK_SIZE].copy_from_slice(&target.to_block());
        }
        data[FRAME_TAIL_OFFSET..].copy_from_slice(&FRAME_TAIL);
        Self { data }
    }

    /// 获取完整帧字节
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.data
    }

    /// 获取第 `index` 个目标数据块（0-2），越界返回 `None`
    pub fn target_block(&self, index: usize) -> Option<[u8; TARGET_BLOCK_SIZE]> {
        if index >= MAX_TARGETS {
            return None;
        }
        let offset = target_block_offset(index);
        let mut block = [0u8; TARGET_BLOCK_SIZE];
        block.copy_from_slice(&self.data[offset..offset + TARGET_BLOCK_SIZE]);
        Some(block)
    }

    /// 解析第 `index` 个目标的原始字段
    pub fn raw_target(&self, index: usize) -> Option<RawTarget> {
        self.target_block(index).map(|block| RawTarget::from_block(&block))
    }
}

impl TryFrom<&[u8]> for RadarFrame {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        // 验证数据长度
        if bytes.len() != FRAME_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: FRAME_SIZE,
                actual: bytes.len(),
            });
        }

        let mut data = [0u8; FRAME_SIZE];
        data.copy_from_slice(bytes);

        // 验证帧头
        if data[..FRAME_HEADER_SIZE] != FRAME_HEADER {
            let mut actual = [0u8; FRAME_HEADER_SIZE];
            actual.copy_from_slice(&data[..FRAME_HEADER_SIZE]);
            return Err(ProtocolError::InvalidHeader { actual });
        }

        // 验证帧尾
        let tail = [data[FRAME_TAIL_OFFSET], data[FRAME_TAIL_OFFSET + 1]];
        if tail != FRAME_TAIL {
            return Err(ProtocolError::InvalidTail { actual: tail });
        }

        Ok(Self { data })
    }
}

impl TryFrom<&[u8; FRAME_SIZE]> for RadarFrame {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8; FRAME_SIZE]) -> Result<Self, Self::Error> {
        Self::try_from(&bytes[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> [u8; FRAME_SIZE] {
        [
            0xAA, 0xFF, 0x03, 0x00, // 帧头
            0x0E, 0x03, 0xB1, 0x86, 0x10, 0x00, 0x40, 0x01, // 目标 1
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 目标 2（空）
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 目标 3（空）
            0x55, 0xCC, // 帧尾
        ]
    }

    #[test]
    fn test_parse_valid_frame() {
        let bytes = sample_bytes();
        let frame = RadarFrame::try_from(&bytes).unwrap();
        assert_eq!(frame.as_bytes(), &bytes);

        let raw = frame.raw_target(0).unwrap();
        assert_eq!(raw.x, 0x030E);
        assert_eq!(raw.y, 0x86B1);
        assert_eq!(raw.speed, 0x0010);
        assert_eq!(raw.distance_raw, 0x0140);

        assert!(frame.raw_target(1).unwrap().is_empty());
        assert!(frame.raw_target(3).is_none());
    }

    #[test]
    fn test_reject_bad_tail() {
        let mut bytes = sample_bytes();
        bytes[29] = 0x00;
        let err = RadarFrame::try_from(&bytes).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidTail {
                actual: [0x55, 0x00]
            }
        );
    }

    #[test]
    fn test_reject_bad_header() {
        let mut bytes = sample_bytes();
        bytes[2] = 0x04;
        let err = RadarFrame::try_from(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidHeader { .. }));
    }

    #[test]
    fn test_reject_bad_length() {
        let bytes = sample_bytes();
        let err = RadarFrame::try_from(&bytes[..29]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidLength {
                expected: 30,
                actual: 29
            }
        );
    }

    #[test]
    fn test_from_raw_targets_layout() {
        let target = RawTarget {
            x: 0x8010,
            y: 0x8005,
            speed: 0x0002,
            distance_raw: 0x0140,
        };
        let frame = RadarFrame::from_raw_targets([RawTarget::default(), target, RawTarget::default()]);
        let bytes = frame.as_bytes();

        assert_eq!(&bytes[..4], &FRAME_HEADER);
        assert_eq!(&bytes[12..20], &[0x10, 0x80, 0x05, 0x80, 0x02, 0x00, 0x40, 0x01]);
        assert_eq!(&bytes[28..], &FRAME_TAIL);
        assert_eq!(frame.raw_target(1), Some(target));
    }
}
