//! 用户配置：`<配置目录>/cycle-timer/config.json`，不存在时使用默认值

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ValidationError};
use crate::form::{MAX_MINUTES, MIN_MINUTES};

/// 配置文件名
pub const CONFIG_FILENAME: &str = "config.json";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "CYCLE_TIMER_CONFIG";

/// 应用配置目录
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cycle-timer")
}

pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join(CONFIG_FILENAME))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 460.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 表单里预填的时长（分钟）
    pub default_minutes_amount: u32,
    /// 任务名候选
    pub task_suggestions: Vec<String>,
    /// 无活动周期时的窗口标题
    pub idle_title: String,
    /// tracing 过滤表达式，`RUST_LOG` 优先
    pub log_filter: String,
    pub window: WindowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_minutes_amount: 25,
            task_suggestions: vec!["Projeto 1".into(), "Projeto 2".into(), "Banana".into()],
            idle_title: "timer".into(),
            log_filter: "info".into(),
            window: WindowConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从默认路径加载并校验
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// 文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str::<Self>(&text).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&self.default_minutes_amount) {
            return Err(ValidationError::DefaultDurationOutOfRange {
                value: self.default_minutes_amount,
                min: MIN_MINUTES,
                max: MAX_MINUTES,
            });
        }
        if self.idle_title.trim().is_empty() {
            return Err(ValidationError::EmptyIdleTitle);
        }
        if self.log_filter.trim().is_empty() {
            return Err(ValidationError::EmptyLogFilter);
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ValidationError::InvalidWindowSize);
        }
        Ok(())
    }
}
