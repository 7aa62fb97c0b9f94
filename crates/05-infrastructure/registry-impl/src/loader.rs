//! 注册配置加载器

use crate::config::{RegistrationConfig, RegistrationProperties};
use infrastructure_common::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// 默认配置节名称
pub const DEFAULT_SECTION: &str = "registry";

/// 注册配置加载器
///
/// 依次合并配置文件与环境变量（环境变量优先），从指定配置节绑定注册属性并验证。
/// 环境变量格式为 `{PREFIX}_{SECTION}__{KEY}`，例如 `ADSP_REGISTRY__PORT`。
#[derive(Debug, Clone)]
pub struct RegistrationConfigLoader {
    file: Option<PathBuf>,
    env_prefix: Option<String>,
    section: String,
}

impl RegistrationConfigLoader {
    /// 创建新的配置加载器
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: None,
            section: DEFAULT_SECTION.to_string(),
        }
    }

    /// 设置配置文件
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 设置配置节名称
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// 加载并验证注册配置
    pub fn load(&self) -> ConfigResult<RegistrationConfig> {
        let mut builder = config::Config::builder();

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("添加注册配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        if let Some(prefix) = &self.env_prefix {
            debug!("添加环境变量配置源，前缀: {}", prefix);
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let settings = builder.build().map_err(|e| {
            error!("注册配置构建失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        let properties = match settings.get::<RegistrationProperties>(&self.section) {
            Ok(properties) => properties,
            Err(config::ConfigError::NotFound(key)) => {
                warn!("注册配置节不存在: {}", key);
                RegistrationProperties::default()
            }
            Err(e) => {
                error!("注册配置绑定失败: section={}, error={}", self.section, e);
                return Err(ConfigError::ParseError {
                    source: Box::new(e),
                });
            }
        };

        RegistrationConfig::try_from(properties)
    }
}

impl Default for RegistrationConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
