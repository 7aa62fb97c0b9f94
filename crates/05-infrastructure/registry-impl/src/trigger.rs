//! 一次性注册触发器

use crate::config::RegistrationConfig;
use crate::resolver::AddressResolver;
use infrastructure_common::{ConfigResult, RegistrationResult, Scope, StartupListener};
use registry_abstractions::{Publisher, RegistrationDescriptor};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 启动信号处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// 本次信号赢得状态切换并发布了注册描述符
    Published,
    /// 已经注册过，本次信号没有任何动作
    AlreadyRegistered,
}

/// gRPC 服务注册触发器
///
/// 保证整个进程生命周期内最多发布一次注册描述符，无论启动信号触发多少次、是否并发。
/// 状态切换先于地址解析：解析失败后注册永久关闭，不会自动重试，需要重启进程。
pub struct RegistrationTrigger {
    config: RegistrationConfig,
    resolver: AddressResolver,
    publisher: Arc<dyn Publisher>,
    registered: AtomicBool,
}

impl RegistrationTrigger {
    /// 使用本机网络接口解析地址创建触发器
    pub fn new(config: RegistrationConfig, publisher: Arc<dyn Publisher>) -> Self {
        Self::with_resolver(config, AddressResolver::system(), publisher)
    }

    /// 使用指定的地址解析器创建触发器
    pub fn with_resolver(
        config: RegistrationConfig,
        resolver: AddressResolver,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config,
            resolver,
            publisher,
            registered: AtomicBool::new(false),
        }
    }

    /// 从属性表创建触发器，必需属性缺失或无效时构造失败
    pub fn from_properties(
        properties: &HashMap<String, String>,
        publisher: Arc<dyn Publisher>,
    ) -> ConfigResult<Self> {
        let config = RegistrationConfig::from_properties(properties)?;
        Ok(Self::new(config, publisher))
    }

    /// 注册配置
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// 是否已经完成状态切换
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// 处理启动信号
    ///
    /// 只有把状态从未注册切换为已注册的那一次调用会解析地址并发布描述符，
    /// 其余调用立即返回 [`SignalOutcome::AlreadyRegistered`]。
    pub fn on_startup_signal(&self) -> RegistrationResult<SignalOutcome> {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("服务已注册, 忽略重复的启动信号: {}", self.config.advertised_endpoint());
            return Ok(SignalOutcome::AlreadyRegistered);
        }

        let descriptor = self.build_descriptor().map_err(|e| {
            error!(
                "服务注册失败, 本进程内不再重试: {}, 原因: {}",
                self.config.advertised_endpoint(),
                e
            );
            e
        })?;

        info!(
            "发布服务注册事件: {} {} -> {}",
            descriptor.protocol_kind,
            descriptor.service_name,
            descriptor.address()
        );
        self.publisher.publish(descriptor);
        Ok(SignalOutcome::Published)
    }

    fn build_descriptor(&self) -> RegistrationResult<RegistrationDescriptor> {
        let host = self
            .resolver
            .resolve(self.config.configured_host().unwrap_or_default())?;

        Ok(RegistrationDescriptor::grpc(
            self.config.context_path(),
            self.config.advertised_endpoint(),
            host,
            self.config.port(),
        ))
    }
}

impl StartupListener for RegistrationTrigger {
    fn name(&self) -> &str {
        "RegistrationTrigger"
    }

    fn on_startup(&self, scope: &Scope) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.on_startup_signal()? == SignalOutcome::Published {
            debug!("服务注册由作用域触发: {}", scope.name);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RegistrationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationTrigger")
            .field("config", &self.config)
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}
