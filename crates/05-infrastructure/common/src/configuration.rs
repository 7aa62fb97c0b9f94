//! 配置相关的基础接口定义

use crate::errors::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 配置验证器 trait
pub trait ConfigValidator<T>: Send + Sync {
    /// 验证配置
    fn validate(&self, config: &T) -> Result<(), ValidationError>;

    /// 获取验证器名称
    fn name(&self) -> &'static str;
}

/// 配置节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: HashMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        serde_json::from_value(value).map_err(|e| ConfigError::SerializationError { source: e })
    }
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&HashMap<String, String>> for ConfigSection {
    fn from(properties: &HashMap<String, String>) -> Self {
        let mut section = Self::new();
        for (key, value) in properties {
            section.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        section
    }
}
