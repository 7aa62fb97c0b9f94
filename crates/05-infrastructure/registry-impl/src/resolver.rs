//! 对外主机地址解析
//!
//! 配置的主机可能为空、通配地址、回环地址或不完整的地址模式。完整的主机原样返回，
//! 其余情况从本机网络接口中选取一个可对外访问的地址，配置值仅作为筛选提示。
//!
//! 支持的提示格式：
//!
//! - `192.168` / `192.168.*` - IPv4 前缀
//! - `10.0.0.0/8` - CIDR 网段
//! - `%eth0` - 网络接口名称

use crate::lookup::SystemHostLookup;
use infrastructure_common::{HostResolutionError, HostResolutionResult};
use registry_abstractions::{HostLookup, NetInterface};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// 判断主机是否完整
///
/// 完整的主机非空、不是通配地址、不是回环地址，并且是合法的 IP 地址或域名。
pub fn is_complete_host(host: &str) -> bool {
    if host.is_empty() || is_localhost(host) {
        return false;
    }

    if let Some(ip) = parse_ip(host) {
        // IPv4 映射地址按 IPv4 判断
        let ip = ip.to_canonical();
        return !ip.is_unspecified() && !ip.is_loopback();
    }

    // 只含数字和点却无法解析为地址的，是不完整的 IPv4 前缀
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }

    is_valid_hostname(host)
}

fn is_localhost(host: &str) -> bool {
    host.trim_end_matches('.').eq_ignore_ascii_case("localhost")
}

fn parse_ip(host: &str) -> Option<IpAddr> {
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse().ok()
}

fn is_valid_hostname(host: &str) -> bool {
    host.len() <= 253
        && host.trim_end_matches('.').split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// 地址是否可以对外发布
fn is_advertisable(ip: &IpAddr) -> bool {
    let ip = &ip.to_canonical();
    if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !v4.is_link_local() && !v4.is_broadcast(),
        // fe80::/10
        IpAddr::V6(v6) => v6.segments()[0] & 0xffc0 != 0xfe80,
    }
}

/// 主机筛选提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostHint {
    /// 不限制
    Any,
    /// IPv4 前缀
    Prefix(Vec<u8>),
    /// CIDR 网段
    Cidr { network: IpAddr, prefix_len: u8 },
    /// 网络接口名称
    Interface(String),
}

impl HostHint {
    /// 从不完整的主机配置解析筛选提示
    pub fn parse(host: &str) -> Self {
        let host = host.trim();

        if host.is_empty() || host == "*" || is_localhost(host) {
            return Self::Any;
        }

        if let Some(ip) = parse_ip(host) {
            // 通配与回环地址不携带任何筛选信息
            debug!("主机配置为不可对外发布的地址: {}", ip);
            return Self::Any;
        }

        if let Some(name) = host.strip_prefix('%') {
            return if name.is_empty() {
                Self::Any
            } else {
                Self::Interface(name.to_string())
            };
        }

        if let Some((network, prefix_len)) = host.split_once('/') {
            return match (network.parse::<IpAddr>(), prefix_len.parse::<u8>()) {
                (Ok(network), Ok(prefix_len)) if prefix_len <= max_prefix_len(&network) => {
                    Self::Cidr {
                        network,
                        prefix_len,
                    }
                }
                _ => {
                    warn!("无法识别的网段配置, 忽略: {}", host);
                    Self::Any
                }
            };
        }

        let prefix = host.trim_end_matches(|c: char| c == '*' || c == '.');
        let octets = prefix
            .split('.')
            .map(str::parse::<u8>)
            .collect::<Result<Vec<_>, _>>();
        match octets {
            Ok(octets) if !prefix.is_empty() && octets.len() <= 4 => Self::Prefix(octets),
            _ => {
                warn!("无法识别的主机配置, 忽略: {}", host);
                Self::Any
            }
        }
    }

    /// 网络接口地址是否满足提示
    pub fn matches(&self, interface: &NetInterface) -> bool {
        match (self, interface.address) {
            (Self::Any, _) => true,
            (Self::Prefix(octets), IpAddr::V4(v4)) => v4.octets().starts_with(octets),
            (Self::Prefix(_), IpAddr::V6(_)) => false,
            (Self::Cidr { network, prefix_len }, address) => {
                in_network(*network, *prefix_len, address)
            }
            (Self::Interface(name), _) => interface.name == *name,
        }
    }
}

fn max_prefix_len(network: &IpAddr) -> u8 {
    match network {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn in_network(network: IpAddr, prefix_len: u8, address: IpAddr) -> bool {
    match (network, address) {
        (IpAddr::V4(network), IpAddr::V4(address)) => {
            let mask = u32::MAX
                .checked_shl(32 - u32::from(prefix_len))
                .unwrap_or(0);
            u32::from(network) & mask == u32::from(address) & mask
        }
        (IpAddr::V6(network), IpAddr::V6(address)) => {
            let mask = u128::MAX
                .checked_shl(128 - u32::from(prefix_len))
                .unwrap_or(0);
            u128::from(network) & mask == u128::from(address) & mask
        }
        _ => false,
    }
}

/// 对外主机地址解析器
///
/// 除读取本机网络接口外没有副作用，调用之间不保留任何状态。
#[derive(Clone)]
pub struct AddressResolver {
    lookup: Arc<dyn HostLookup>,
}

impl AddressResolver {
    /// 使用指定的地址查询创建解析器
    pub fn new(lookup: Arc<dyn HostLookup>) -> Self {
        Self { lookup }
    }

    /// 使用本机网络接口创建解析器
    pub fn system() -> Self {
        Self::new(Arc::new(SystemHostLookup::new()))
    }

    /// 解析对外发布的主机
    pub fn resolve(&self, configured_host: &str) -> HostResolutionResult<String> {
        let configured_host = configured_host.trim();
        if is_complete_host(configured_host) {
            return Ok(configured_host.to_string());
        }

        let hint = HostHint::parse(configured_host);
        let candidates: Vec<NetInterface> = self
            .lookup
            .interfaces()?
            .into_iter()
            .filter(|interface| is_advertisable(&interface.address))
            .collect();

        let narrowed: Vec<&NetInterface> = candidates.iter().filter(|i| hint.matches(i)).collect();
        let selected = if narrowed.is_empty() && !candidates.is_empty() {
            warn!(
                "主机配置 {:?} 没有匹配的网络接口, 忽略该提示 ({} 个候选地址)",
                configured_host,
                candidates.len()
            );
            candidates.iter().collect()
        } else {
            narrowed
        };

        // 优先默认路由所在接口，其次 IPv4，最后按枚举顺序
        let primary = self.lookup.primary_address();
        let chosen = selected
            .into_iter()
            .min_by_key(|i| (Some(i.address) != primary, i.address.is_ipv6()))
            .ok_or_else(|| HostResolutionError::NoUsableAddress {
                configured_host: configured_host.to_string(),
            })?;

        debug!(
            "主机配置 {:?} 解析为 {} (接口 {})",
            configured_host, chosen.address, chosen.name
        );
        Ok(chosen.address.to_string())
    }
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver").finish_non_exhaustive()
    }
}
