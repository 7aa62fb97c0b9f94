//! 本机网络地址查询接口

use infrastructure_common::HostResolutionError;
use std::net::IpAddr;

/// 网络接口地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetInterface {
    /// 接口名称
    pub name: String,
    /// 接口地址
    pub address: IpAddr,
}

impl NetInterface {
    /// 创建网络接口地址
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// 本机网络地址查询
pub trait HostLookup: Send + Sync {
    /// 枚举本机所有网络接口地址
    fn interfaces(&self) -> Result<Vec<NetInterface>, HostResolutionError>;

    /// 默认路由所在接口的地址
    fn primary_address(&self) -> Option<IpAddr> {
        None
    }
}
