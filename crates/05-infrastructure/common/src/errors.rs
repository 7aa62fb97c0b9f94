//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置验证失败: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("必需字段缺失: {field_name}")]
    RequiredFieldMissing { field_name: String },

    #[error("字段值无效: {field_name}, 值: {value}, 原因: {reason}")]
    InvalidFieldValue {
        field_name: String,
        value: String,
        reason: String,
    },

    #[error("验证失败: {errors:?}")]
    Multiple { errors: Vec<ValidationError> },
}

impl ValidationError {
    /// 创建必需字段缺失错误
    pub fn required_field_missing(field_name: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field_name: field_name.into(),
        }
    }

    /// 创建字段值无效错误
    pub fn invalid_field_value(
        field_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            field_name: field_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 展开为单条错误列表
    pub fn into_errors(self) -> Vec<ValidationError> {
        match self {
            Self::Multiple { errors } => errors.into_iter().flat_map(Self::into_errors).collect(),
            other => vec![other],
        }
    }
}

impl From<ValidationError> for ConfigError {
    fn from(error: ValidationError) -> Self {
        ConfigError::ValidationFailed {
            errors: error.into_errors().iter().map(ToString::to_string).collect(),
        }
    }
}

/// 主机地址解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostResolutionError {
    #[error("网络接口查询失败: {message}")]
    InterfaceLookupFailed { message: String },

    #[error("无法确定可对外发布的主机地址, 配置值: {configured_host:?}")]
    NoUsableAddress { configured_host: String },
}

/// 服务注册错误类型
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("主机地址解析失败: {source}")]
    HostResolution {
        #[from]
        source: HostResolutionError,
    },
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("启动监听器执行失败: {failures:?}")]
    StartupListenerFailed { failures: Vec<String> },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type HostResolutionResult<T> = Result<T, HostResolutionError>;
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
