//! # Registry Abstractions
//!
//! 网关服务注册抽象层，定义注册描述符以及注册流程依赖的外部能力。
//!
//! ## 核心接口
//!
//! - [`RegistrationDescriptor`] - 注册描述符
//! - [`Publisher`] - 注册事件发布接口
//! - [`RegistrySink`] - 注册事件消费接口
//! - [`HostLookup`] - 本机网络地址查询接口

pub mod descriptor;
pub mod lookup;
pub mod publisher;

pub use descriptor::*;
pub use lookup::*;
pub use publisher::*;
