//! 注册事件发布与消费接口

use crate::descriptor::RegistrationDescriptor;
use async_trait::async_trait;

/// 注册事件发布者
///
/// 发布是同步的移交动作，不等待注册中心确认；缓冲与重试由实现方负责。
pub trait Publisher: Send + Sync {
    /// 发布注册描述符
    fn publish(&self, descriptor: RegistrationDescriptor);
}

/// 注册事件消费端
///
/// 从发布管道中取出描述符并投递到注册中心。
#[async_trait]
pub trait RegistrySink: Send + Sync {
    /// 注册服务实例
    async fn register(
        &self,
        descriptor: &RegistrationDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// 获取消费端名称
    fn name(&self) -> &str;
}
