//! 注册事件发布管道
//!
//! 生产端 [`ChannelPublisher`] 同步地把描述符放入无界队列，消费端
//! [`RegistrationForwarder`] 在异步任务中取出描述符交给 [`RegistrySink`]。

use async_trait::async_trait;
use registry_abstractions::{Publisher, RegistrationDescriptor, RegistrySink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 创建注册事件管道
pub fn registration_channel() -> (ChannelPublisher, RegistrationReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        ChannelPublisher { sender },
        RegistrationReceiver { receiver },
    )
}

/// 基于通道的注册事件发布者
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<RegistrationDescriptor>,
}

impl Publisher for ChannelPublisher {
    fn publish(&self, descriptor: RegistrationDescriptor) {
        if let Err(e) = self.sender.send(descriptor) {
            warn!("注册事件消费端已关闭, 丢弃注册事件: {}", e.0.service_name);
        }
    }
}

/// 注册事件接收端
#[derive(Debug)]
pub struct RegistrationReceiver {
    receiver: mpsc::UnboundedReceiver<RegistrationDescriptor>,
}

impl RegistrationReceiver {
    /// 接收下一个注册描述符，所有发布者关闭后返回 `None`
    pub async fn recv(&mut self) -> Option<RegistrationDescriptor> {
        self.receiver.recv().await
    }
}

/// 注册事件转发器
pub struct RegistrationForwarder;

impl RegistrationForwarder {
    /// 持续转发注册事件直到管道关闭，返回成功投递的数量
    ///
    /// 投递失败只记录日志，不做重试。
    pub async fn run(mut receiver: RegistrationReceiver, sink: Arc<dyn RegistrySink>) -> usize {
        info!("注册事件转发器启动, 消费端: {}", sink.name());

        let mut delivered = 0;
        while let Some(descriptor) = receiver.recv().await {
            match sink.register(&descriptor).await {
                Ok(()) => {
                    delivered += 1;
                    debug!("注册事件投递成功: {}", descriptor.service_name);
                }
                Err(e) => {
                    error!("注册事件投递失败: {}, 原因: {}", descriptor.service_name, e);
                }
            }
        }

        info!("注册事件转发器退出, 共投递 {} 个注册事件", delivered);
        delivered
    }
}

/// 仅记录日志的注册事件消费端
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRegistrySink;

#[async_trait]
impl RegistrySink for LoggingRegistrySink {
    async fn register(
        &self,
        descriptor: &RegistrationDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "服务注册: contextPath={}, appName={}, rpcType={}, address={}",
            descriptor.context_path,
            descriptor.service_name,
            descriptor.protocol_kind,
            descriptor.address()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "LoggingRegistrySink"
    }
}
