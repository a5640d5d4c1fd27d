//! 驱动配置
//!
//! `RadarConfig` 是纯数据（POD），可以直接从 TOML 反序列化：
//!
//! ```toml
//! frame_timeout_ms = 100
//! connection_window_ms = 1000
//! ```
//!
//! 缺省字段取雷达数据手册的默认值。

use crate::error::DriverError;
use rd03d_protocol::{DEFAULT_CONNECTION_WINDOW_MS, DEFAULT_FRAME_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 雷达驱动配置
///
/// # Example
///
/// ```
/// use rd03d_driver::RadarConfig;
///
/// // 使用默认配置（100ms 帧超时，1000ms 连接窗口）
/// let config = RadarConfig::default();
///
/// // 从 TOML 加载（缺省字段使用默认值）
/// let config = RadarConfig::from_toml_str("frame_timeout_ms = 50").unwrap();
/// assert_eq!(config.frame_timeout_ms, 50);
/// assert_eq!(config.connection_window_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadarConfig {
    /// 帧接收超时（毫秒）
    /// 收到帧头后，超过此时间未收到下一个字节，则丢弃半帧并计一次错误
    pub frame_timeout_ms: u64,
    /// 连接判定窗口（毫秒）
    /// 最近一次有效帧距今小于此值，认为雷达在线
    pub connection_window_ms: u64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
            connection_window_ms: DEFAULT_CONNECTION_WINDOW_MS,
        }
    }
}

impl RadarConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, DriverError> {
        let config: Self =
            toml::from_str(content).map_err(|e| DriverError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载并校验
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, DriverError> {
        toml::to_string(self).map_err(|e| DriverError::Config(e.to_string()))
    }

    /// 校验取值
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.frame_timeout_ms == 0 {
            return Err(DriverError::Config(
                "frame_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.connection_window_ms == 0 {
            return Err(DriverError::Config(
                "connection_window_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RadarConfig::default();
        assert_eq!(config.frame_timeout_ms, 100);
        assert_eq!(config.connection_window_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = RadarConfig::from_toml_str(
            r#"
frame_timeout_ms = 250
connection_window_ms = 2000
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            RadarConfig {
                frame_timeout_ms: 250,
                connection_window_ms: 2000,
            }
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RadarConfig::from_toml_str("").unwrap();
        assert_eq!(config, RadarConfig::default());
    }

    #[test]
    fn test_reject_zero_timeout() {
        let err = RadarConfig::from_toml_str("frame_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
        assert!(format!("{}", err).contains("frame_timeout_ms"));
    }

    #[test]
    fn test_reject_unknown_field() {
        let err = RadarConfig::from_toml_str("baud = 115200").unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RadarConfig {
            frame_timeout_ms: 42,
            connection_window_ms: 500,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(RadarConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection_window_ms = 3000").unwrap();

        let config = RadarConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.connection_window_ms, 3000);
        assert_eq!(config.frame_timeout_ms, 100);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RadarConfig::from_toml_file("/nonexistent/rd03d/config.toml").unwrap_err();
        assert!(matches!(err, DriverError::Io(_)));
    }
}
