//! 注册配置

use infrastructure_common::{
    ConfigError, ConfigResult, ConfigSection, ConfigValidator, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::error;

/// 注册路径配置键
pub const CONTEXT_PATH_KEY: &str = "contextPath";
/// 服务标识配置键
pub const ADVERTISED_ENDPOINT_KEY: &str = "ipAndPort";
/// 主机配置键
pub const HOST_KEY: &str = "host";
/// 端口配置键
pub const PORT_KEY: &str = "port";

/// 端口配置值，可以是数字也可以是数字字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSetting {
    Number(i64),
    Text(String),
}

impl PortSetting {
    /// 解析为有效端口
    pub fn to_port(&self) -> Result<u16, ValidationError> {
        let (raw, number) = match self {
            Self::Number(n) => (n.to_string(), *n),
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ValidationError::required_field_missing(PORT_KEY));
                }
                let number = text.parse::<i64>().map_err(|_| {
                    ValidationError::invalid_field_value(PORT_KEY, text, "不是有效的整数")
                })?;
                (text.to_string(), number)
            }
        };

        match u16::try_from(number) {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ValidationError::invalid_field_value(
                PORT_KEY,
                raw,
                "端口必须在 1-65535 之间",
            )),
        }
    }
}

/// 原始注册属性
///
/// 字段名沿用注册中心客户端的属性命名，小写别名用于绑定环境变量来源的键。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProperties {
    #[serde(rename = "contextPath", alias = "contextpath", alias = "context_path", default)]
    pub context_path: Option<String>,

    #[serde(rename = "ipAndPort", alias = "ipandport", alias = "ip_and_port", default)]
    pub advertised_endpoint: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<PortSetting>,
}

/// 注册属性验证器
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistrationPropertiesValidator;

impl RegistrationPropertiesValidator {
    fn required(value: Option<&str>, field: &str) -> Result<String, ValidationError> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
            _ => Err(ValidationError::required_field_missing(field)),
        }
    }

    /// 验证并提取必需字段：注册路径、服务标识、端口
    fn required_parts(
        properties: &RegistrationProperties,
    ) -> Result<(String, String, u16), ValidationError> {
        let context_path = Self::required(properties.context_path.as_deref(), CONTEXT_PATH_KEY);
        let endpoint =
            Self::required(properties.advertised_endpoint.as_deref(), ADVERTISED_ENDPOINT_KEY);
        let port = properties.port.as_ref().map_or_else(
            || Err(ValidationError::required_field_missing(PORT_KEY)),
            PortSetting::to_port,
        );

        match (context_path, endpoint, port) {
            (Ok(context_path), Ok(endpoint), Ok(port)) => Ok((context_path, endpoint, port)),
            (context_path, endpoint, port) => Err(ValidationError::Multiple {
                errors: [context_path.err(), endpoint.err(), port.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            }),
        }
    }
}

impl ConfigValidator<RegistrationProperties> for RegistrationPropertiesValidator {
    fn validate(&self, config: &RegistrationProperties) -> Result<(), ValidationError> {
        Self::required_parts(config).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "RegistrationPropertiesValidator"
    }
}

/// 注册配置
///
/// 只能通过验证后构造，构造完成后不可修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConfig {
    context_path: String,
    advertised_endpoint: String,
    configured_host: Option<String>,
    port: u16,
}

impl RegistrationConfig {
    /// 创建注册配置
    pub fn new(
        context_path: impl Into<String>,
        advertised_endpoint: impl Into<String>,
        configured_host: Option<String>,
        port: u16,
    ) -> ConfigResult<Self> {
        Self::try_from(RegistrationProperties {
            context_path: Some(context_path.into()),
            advertised_endpoint: Some(advertised_endpoint.into()),
            host: configured_host,
            port: Some(PortSetting::Number(i64::from(port))),
        })
    }

    /// 从属性表创建注册配置
    pub fn from_properties(properties: &HashMap<String, String>) -> ConfigResult<Self> {
        Self::from_section(&ConfigSection::from(properties))
    }

    /// 从配置节创建注册配置
    pub fn from_section(section: &ConfigSection) -> ConfigResult<Self> {
        let properties: RegistrationProperties = section.bind()?;
        Self::try_from(properties)
    }

    /// 注册路径
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// 服务标识，作为注册中心中的服务名称
    pub fn advertised_endpoint(&self) -> &str {
        &self.advertised_endpoint
    }

    /// 配置的主机，可能为空、通配地址或不完整的地址
    pub fn configured_host(&self) -> Option<&str> {
        self.configured_host.as_deref()
    }

    /// 监听端口
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl TryFrom<RegistrationProperties> for RegistrationConfig {
    type Error = ConfigError;

    fn try_from(properties: RegistrationProperties) -> Result<Self, Self::Error> {
        let (context_path, advertised_endpoint, port) =
            RegistrationPropertiesValidator::required_parts(&properties).map_err(|e| {
                error!("grpc 客户端必须配置 contextPath、ipAndPort、port: {}", e);
                ConfigError::from(e)
            })?;

        let configured_host = properties
            .host
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty());

        Ok(Self {
            context_path,
            advertised_endpoint,
            configured_host,
            port,
        })
    }
}
