//! 目标数据解码
//!
//! 每个 8 字节目标数据块包含 4 个小端 u16 字段：
//!
//! | 偏移 | 字段 | 编码 |
//! |------|------|------|
//! | 0-1 | X 坐标 (mm) | 符号位-幅值：Bit 15 = 1 为正，= 0 为负 |
//! | 2-3 | Y 坐标 (mm) | 偏移：y = raw - 0x8000 |
//! | 4-5 | 速度 (cm/s) | 符号位-幅值，同 X |
//! | 6-7 | 距离分辨率码 | 原样保存 |
//!
//! 注意：X/速度 与 Y 的编码方式不同（符号位 vs 固定偏移）。
//! 这与雷达实际上报一致，未经传感器文档确认前不要"统一"。

use crate::bytes_to_u16_le;
use crate::constants::{MAX_TARGETS, TARGET_BLOCK_SIZE};
use crate::frame::RadarFrame;
use crate::u16_to_bytes_le;
use bilge::prelude::*;

/// Y 坐标偏移量
pub const Y_OFFSET: u16 = 0x8000;

// ============================================================================
// 字段编码
// ============================================================================

/// 符号位-幅值位域（X 坐标、速度）
///
/// bilge 默认 LSB first：
/// - Bit 0-14: 幅值
/// - Bit 15: 极性（1：正 0：负）
#[bitsize(16)]
#[derive(FromBits, DebugBits, Clone, Copy)]
pub struct SignMagnitude {
    pub magnitude: u15, // Bit 0-14: 幅值
    pub positive: bool, // Bit 15: 极性标志（置位为正）
}

/// 解码符号位-幅值字段
///
/// ```rust
/// use rd03d_protocol::decode_sign_magnitude;
///
/// assert_eq!(decode_sign_magnitude(0x8010), 16);
/// assert_eq!(decode_sign_magnitude(0x0010), -16);
/// ```
pub fn decode_sign_magnitude(raw: u16) -> i16 {
    let field = SignMagnitude::from(raw);
    // 幅值最多 15 位，必然落在 i16 正数范围内
    let magnitude = field.magnitude().value() as i16;
    if field.positive() {
        magnitude
    } else {
        -magnitude
    }
}

/// 编码符号位-幅值字段（幅值超过 0x7FFF 时饱和）
pub fn encode_sign_magnitude(value: i16) -> u16 {
    let magnitude = value.unsigned_abs().min(0x7FFF);
    u16::from(SignMagnitude::new(u15::new(magnitude), value >= 0))
}

/// 解码偏移字段（Y 坐标）：16 位回绕减去 0x8000
///
/// ```rust
/// use rd03d_protocol::decode_offset;
///
/// assert_eq!(decode_offset(0x8005), 5);
/// assert_eq!(decode_offset(0x7FFB), -5);
/// ```
pub fn decode_offset(raw: u16) -> i16 {
    raw.wrapping_sub(Y_OFFSET) as i16
}

/// 编码偏移字段
pub fn encode_offset(value: i16) -> u16 {
    (value as u16).wrapping_add(Y_OFFSET)
}

// ============================================================================
// 原始目标
// ============================================================================

/// 目标数据块的原始字段（未解码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTarget {
    pub x: u16,            // Byte 0-1: X 坐标（符号位-幅值）
    pub y: u16,            // Byte 2-3: Y 坐标（偏移 0x8000）
    pub speed: u16,        // Byte 4-5: 速度（符号位-幅值）
    pub distance_raw: u16, // Byte 6-7: 距离分辨率码
}

impl RawTarget {
    /// 从 8 字节数据块解析（小端字节序）
    pub fn from_block(block: &[u8; TARGET_BLOCK_SIZE]) -> Self {
        Self {
            x: bytes_to_u16_le([block[0], block[1]]),
            y: bytes_to_u16_le([block[2], block[3]]),
            speed: bytes_to_u16_le([block[4], block[5]]),
            distance_raw: bytes_to_u16_le([block[6], block[7]]),
        }
    }

    /// 编码为 8 字节数据块
    pub fn to_block(&self) -> [u8; TARGET_BLOCK_SIZE] {
        let mut block = [0u8; TARGET_BLOCK_SIZE];
        block[0..2].copy_from_slice(&u16_to_bytes_le(self.x));
        block[2..4].copy_from_slice(&u16_to_bytes_le(self.y));
        block[4..6].copy_from_slice(&u16_to_bytes_le(self.speed));
        block[6..8].copy_from_slice(&u16_to_bytes_le(self.distance_raw));
        block
    }

    /// 由物理量构造原始字段（测试及回放数据生成用）
    pub fn encode(x_mm: i16, y_mm: i16, speed_cm_s: i16, distance_raw: u16) -> Self {
        Self {
            x: encode_sign_magnitude(x_mm),
            y: encode_offset(y_mm),
            speed: encode_sign_magnitude(speed_cm_s),
            distance_raw,
        }
    }

    /// 空槽位：X、Y 原始值均为 0
    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

// ============================================================================
// 解码后的目标
// ============================================================================

/// 单个跟踪目标
///
/// 单位：坐标 mm，速度 cm/s，距离 cm，角度 °。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    /// X 坐标（mm，负为左，正为右）
    pub x: i16,
    /// Y 坐标（mm，前向距离）
    pub y: i16,
    /// 速度（cm/s，负为靠近，正为远离）
    pub speed: i16,
    /// 雷达原始距离分辨率码
    pub distance_raw: u16,
    /// 由 X、Y 计算的距离（cm）
    pub distance: f32,
    /// 相对前向（Y）轴的角度（°，正向 +X）
    pub angle: f32,
    /// 是否检测到目标
    pub valid: bool,
}

impl Target {
    /// 由原始字段解码
    pub fn from_raw(raw: RawTarget) -> Self {
        let mut target = Self::default();
        target.update_from_raw(raw);
        target
    }

    /// 用原始字段原地覆盖本槽位
    ///
    /// X、Y 原始值均为 0 时清空为无效状态，忽略其余字段。
    pub fn update_from_raw(&mut self, raw: RawTarget) {
        if raw.is_empty() {
            self.clear();
            return;
        }

        self.x = decode_sign_magnitude(raw.x);
        self.y = decode_offset(raw.y);
        self.speed = decode_sign_magnitude(raw.speed);
        self.distance_raw = raw.distance_raw;

        let x_mm = f32::from(self.x);
        let y_mm = f32::from(self.y);
        self.distance = (x_mm * x_mm + y_mm * y_mm).sqrt() / 10.0;
        self.angle = x_mm.atan2(y_mm).to_degrees();
        self.valid = true;
    }

    /// 清空目标数据
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 统计有效目标数（0-3）
pub fn count_valid(targets: &[Target]) -> usize {
    targets.iter().filter(|t| t.valid).count()
}

/// 目标解码器
///
/// 将已校验帧中的三个目标块依次解码到调用方持有的目标数组中（原地覆盖，不重新分配）。
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetDecoder;

impl TargetDecoder {
    /// 解码整帧，返回有效目标数
    pub fn decode_into(frame: &RadarFrame, targets: &mut [Target; MAX_TARGETS]) -> usize {
        for (index, slot) in targets.iter_mut().enumerate() {
            match frame.raw_target(index) {
                Some(raw) => slot.update_from_raw(raw),
                None => slot.clear(),
            }
        }
        count_valid(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sign_magnitude_polarity() {
        assert_eq!(decode_sign_magnitude(0x8010), 16);
        assert_eq!(decode_sign_magnitude(0x0010), -16);
        assert_eq!(decode_sign_magnitude(0x8000), 0);
        assert_eq!(decode_sign_magnitude(0x0000), 0);
        assert_eq!(decode_sign_magnitude(0xFFFF), 0x7FFF);
        assert_eq!(decode_sign_magnitude(0x7FFF), -0x7FFF);
    }

    #[test]
    fn test_sign_magnitude_bitfield() {
        let field = SignMagnitude::from(0x8123u16);
        assert!(field.positive());
        assert_eq!(field.magnitude().value(), 0x0123);

        let encoded = u16::from(SignMagnitude::new(u15::new(0x0010), false));
        assert_eq!(encoded, 0x0010);
    }

    #[test]
    fn test_offset_encoding() {
        assert_eq!(decode_offset(0x8000), 0);
        assert_eq!(decode_offset(0x8005), 5);
        assert_eq!(decode_offset(0x7FFB), -5);
        assert_eq!(decode_offset(0xFFFF), 0x7FFF);
        assert_eq!(decode_offset(0x0000), i16::MIN);
    }

    #[test]
    fn test_raw_target_from_block() {
        let raw = RawTarget::from_block(&[0x10, 0x80, 0x05, 0x80, 0x0A, 0x00, 0x40, 0x01]);
        assert_eq!(
            raw,
            RawTarget {
                x: 0x8010,
                y: 0x8005,
                speed: 0x000A,
                distance_raw: 0x0140,
            }
        );
        assert_eq!(raw.to_block(), [0x10, 0x80, 0x05, 0x80, 0x0A, 0x00, 0x40, 0x01]);
    }

    #[test]
    fn test_decode_target_fields() {
        let target = Target::from_raw(RawTarget {
            x: 0x8010,
            y: 0x8005,
            speed: 0x000A,
            distance_raw: 320,
        });

        assert!(target.valid);
        assert_eq!(target.x, 16);
        assert_eq!(target.y, 5);
        assert_eq!(target.speed, -10);
        assert_eq!(target.distance_raw, 320);
    }

    #[test]
    fn test_derived_distance_and_angle() {
        let target = Target::from_raw(RawTarget::encode(30, 40, 0, 0));

        assert_eq!(target.x, 30);
        assert_eq!(target.y, 40);
        assert!((target.distance - 5.0).abs() < 1e-5, "distance: {}", target.distance);
        let expected = 30f32.atan2(40.0).to_degrees();
        assert!((target.angle - expected).abs() < 1e-4, "angle: {}", target.angle);
        assert!((target.angle - 36.87).abs() < 0.01);
    }

    #[test]
    fn test_angle_sign_follows_x() {
        let left = Target::from_raw(RawTarget::encode(-500, 500, 0, 0));
        let right = Target::from_raw(RawTarget::encode(500, 500, 0, 0));
        assert!((left.angle + 45.0).abs() < 1e-4);
        assert!((right.angle - 45.0).abs() < 1e-4);
    }

    /// 测试 X、Y 均为 0 时清空目标（其余字段内容无关）
    #[test]
    fn test_empty_slot_clears_target() {
        let mut target = Target::from_raw(RawTarget::encode(100, 200, 5, 9));
        assert!(target.valid);

        target.update_from_raw(RawTarget {
            x: 0,
            y: 0,
            speed: 0x8055,
            distance_raw: 0xFFFF,
        });

        assert_eq!(target, Target::default());
        assert!(!target.valid);
        assert_eq!(target.speed, 0);
        assert_eq!(target.distance_raw, 0);
        assert_eq!(target.distance, 0.0);
        assert_eq!(target.angle, 0.0);
    }

    /// 仅 Y 非零（X 为 0）仍是有效目标
    #[test]
    fn test_only_y_nonzero_is_valid() {
        let target = Target::from_raw(RawTarget {
            x: 0,
            y: 0x8064,
            speed: 0,
            distance_raw: 0,
        });
        assert!(target.valid);
        assert_eq!(target.x, 0);
        assert_eq!(target.y, 100);
        assert!((target.distance - 10.0).abs() < 1e-5);
        assert_eq!(target.angle, 0.0);
    }

    #[test]
    fn test_decoder_overwrites_in_place() {
        let mut targets = [Target::default(); MAX_TARGETS];

        let frame = RadarFrame::from_raw_targets([
            RawTarget::encode(30, 40, -3, 1),
            RawTarget::encode(-10, 1000, 7, 2),
            RawTarget::default(),
        ]);
        assert_eq!(TargetDecoder::decode_into(&frame, &mut targets), 2);
        assert_eq!(targets[1].x, -10);
        assert!(!targets[2].valid);

        // 第二帧中第一个目标消失
        let frame = RadarFrame::from_raw_targets([
            RawTarget::default(),
            RawTarget::encode(-12, 990, 7, 2),
            RawTarget::encode(0, 300, 0, 3),
        ]);
        assert_eq!(TargetDecoder::decode_into(&frame, &mut targets), 2);
        assert_eq!(targets[0], Target::default());
        assert_eq!(targets[1].x, -12);
        assert_eq!(targets[2].y, 300);
        assert_eq!(count_valid(&targets), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_target_serde() {
        let target = Target::from_raw(RawTarget::encode(30, 40, 1, 2));
        let json = serde_json::to_string(&target).unwrap();
        let back: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }

    proptest! {
        /// 符号位-幅值：所有幅值、两种极性
        #[test]
        fn sign_magnitude_law(magnitude in 0u16..=0x7FFF, positive in any::<bool>()) {
            let raw = if positive { magnitude | 0x8000 } else { magnitude };
            let expected = if positive { magnitude as i16 } else { -(magnitude as i16) };
            prop_assert_eq!(decode_sign_magnitude(raw), expected);
        }

        /// 偏移编码：decoded = raw - 0x8000（16 位回绕）
        #[test]
        fn offset_law(raw in any::<u16>()) {
            let expected = (i32::from(raw) - 0x8000) as i16;
            prop_assert_eq!(decode_offset(raw), expected);
            prop_assert_eq!(encode_offset(decode_offset(raw)), raw);
        }

        /// 有效性仅由原始 X、Y 决定
        #[test]
        fn validity_depends_only_on_xy(x in any::<u16>(), y in any::<u16>(), speed in any::<u16>(), dist in any::<u16>()) {
            let target = Target::from_raw(RawTarget { x, y, speed, distance_raw: dist });
            prop_assert_eq!(target.valid, x != 0 || y != 0);
            if !target.valid {
                prop_assert_eq!(target, Target::default());
            }
        }
    }
}
