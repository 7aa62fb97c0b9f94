//! 注册描述符定义

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 网关支持的 RPC 协议类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "springCloud")]
    SpringCloud,
    #[serde(rename = "dubbo")]
    Dubbo,
    #[serde(rename = "sofa")]
    Sofa,
    #[serde(rename = "tars")]
    Tars,
    #[serde(rename = "motan")]
    Motan,
    #[serde(rename = "grpc")]
    Grpc,
    #[serde(rename = "websocket")]
    Websocket,
    #[serde(rename = "brpc")]
    Brpc,
}

impl ProtocolKind {
    /// 注册中心使用的协议名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::SpringCloud => "springCloud",
            Self::Dubbo => "dubbo",
            Self::Sofa => "sofa",
            Self::Tars => "tars",
            Self::Motan => "motan",
            Self::Grpc => "grpc",
            Self::Websocket => "websocket",
            Self::Brpc => "brpc",
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知协议类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的协议类型: {0}")]
pub struct UnknownProtocolKind(pub String);

impl std::str::FromStr for ProtocolKind {
    type Err = UnknownProtocolKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "springcloud" => Ok(Self::SpringCloud),
            "dubbo" => Ok(Self::Dubbo),
            "sofa" => Ok(Self::Sofa),
            "tars" => Ok(Self::Tars),
            "motan" => Ok(Self::Motan),
            "grpc" => Ok(Self::Grpc),
            "websocket" => Ok(Self::Websocket),
            "brpc" => Ok(Self::Brpc),
            _ => Err(UnknownProtocolKind(s.to_string())),
        }
    }
}

/// 注册描述符
///
/// 描述一个服务实例在注册中心中的身份与地址，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationDescriptor {
    /// 注册路径
    #[serde(rename = "contextPath")]
    pub context_path: String,
    /// 服务名称
    #[serde(rename = "appName")]
    pub service_name: String,
    /// 协议类型
    #[serde(rename = "rpcType")]
    pub protocol_kind: ProtocolKind,
    /// 对外发布的主机地址
    pub host: String,
    /// 端口
    pub port: u16,
}

impl RegistrationDescriptor {
    /// 创建 gRPC 注册描述符
    pub fn grpc(
        context_path: impl Into<String>,
        service_name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            context_path: context_path.into(),
            service_name: service_name.into(),
            protocol_kind: ProtocolKind::Grpc,
            host: host.into(),
            port,
        }
    }

    /// 对外发布的地址，IPv6 主机以方括号包裹
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
