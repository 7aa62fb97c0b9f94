//! # Registry Implementation
//!
//! 网关服务注册的具体实现：进程启动完成后计算服务的对外地址，并且在整个进程生命周期内
//! 只发布一次注册事件，无论启动信号触发多少次。
//!
//! ## 主要组件
//!
//! - [`RegistrationConfig`] - 注册配置（构造时验证）
//! - [`RegistrationConfigLoader`] - 基于文件与环境变量的配置加载器
//! - [`AddressResolver`] - 对外主机地址解析
//! - [`SystemHostLookup`] - 基于本机网络接口的地址查询
//! - [`RegistrationTrigger`] - 一次性注册触发器
//! - [`ChannelPublisher`] / [`RegistrationForwarder`] - 解耦的发布管道

pub mod config;
pub mod loader;
pub mod lookup;
pub mod pipeline;
pub mod resolver;
pub mod trigger;

pub use config::*;
pub use loader::*;
pub use lookup::*;
pub use pipeline::*;
pub use resolver::*;
pub use trigger::*;

#[cfg(test)]
mod tests;
