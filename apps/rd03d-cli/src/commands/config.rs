//! 配置管理命令
//!
//! 默认配置文件：`<config_dir>/rd03d/config.toml`

use anyhow::{Context, Result};
use clap::Subcommand;
use rd03d_driver::RadarConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("rd03d");
    path.push("config.toml");
    Ok(path)
}

/// 加载配置
///
/// 显式指定的路径必须存在；默认路径不存在时使用默认配置。
pub fn load_config(explicit: Option<&Path>) -> Result<RadarConfig> {
    if let Some(path) = explicit {
        return RadarConfig::from_toml_file(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()));
    }

    let path = default_config_file()?;
    if !path.exists() {
        return Ok(RadarConfig::default());
    }

    RadarConfig::from_toml_file(&path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))
}

/// 写入默认配置，已存在且未指定 `force` 时报错
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("创建配置目录失败")?;
    }

    let content = format!(
        "# RD-03D Radar Configuration\n\n{}",
        RadarConfig::default().to_toml_string()?
    );
    fs::write(path, content).context("写入配置文件失败")?;
    Ok(())
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置（TOML）
    Show {
        /// 配置文件路径（默认使用用户配置目录）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 写入默认配置文件
    Init {
        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },

    /// 显示默认配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { config } => {
                let config = load_config(config.as_deref())?;
                print!("{}", config.to_toml_string()?);
                Ok(())
            },

            ConfigCommand::Init { force } => {
                let path = default_config_file()?;
                write_default_config(&path, force)?;
                println!("✅ 已写入配置文件: {}", path.display());
                Ok(())
            },

            ConfigCommand::Path => {
                println!("{}", default_config_file()?.display());
                Ok(())
            },
        }
    }
}
