//! 基于本机网络接口的地址查询

use infrastructure_common::HostResolutionError;
use registry_abstractions::{HostLookup, NetInterface};
use std::net::IpAddr;
use tracing::debug;

/// 本机网络地址查询
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostLookup;

impl SystemHostLookup {
    /// 创建本机网络地址查询
    pub fn new() -> Self {
        Self
    }
}

impl HostLookup for SystemHostLookup {
    fn interfaces(&self) -> Result<Vec<NetInterface>, HostResolutionError> {
        let interfaces = local_ip_address::list_afinet_netifas()
            .map_err(|e| HostResolutionError::InterfaceLookupFailed {
                message: e.to_string(),
            })?
            .into_iter()
            .map(|(name, address)| NetInterface::new(name, address))
            .collect::<Vec<_>>();

        debug!("枚举到 {} 个网络接口地址", interfaces.len());
        Ok(interfaces)
    }

    fn primary_address(&self) -> Option<IpAddr> {
        local_ip_address::local_ip().ok()
    }
}
