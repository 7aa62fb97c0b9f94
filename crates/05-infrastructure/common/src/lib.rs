//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台基础设施层的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`ConfigSection`] - 配置节
//! - [`ConfigValidator`] - 配置验证器 trait
//! - [`StartupListener`] - 启动信号监听器
//! - [`StartupSignalSource`] - 启动信号源
//! - [`Scope`] - 初始化作用域
//!
//! ## 设计原则
//!
//! - 配置在构造时一次性验证，失败即终止启动
//! - 依赖通过构造函数显式注入，不使用全局单例
//! - 启动信号可能重复、可能并发，监听器自行保证幂等

pub mod configuration;
pub mod errors;
pub mod lifecycle;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
