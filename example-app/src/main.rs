//! # 示例应用程序
//!
//! 演示 gRPC 服务的一次性注册：加载注册配置，把注册触发器挂到启动信号源上，
//! 模拟根作用域与多个嵌套作用域先后（以及并发）完成初始化，最终只发布一次注册事件。

use anyhow::Context;
use clap::Parser;
use infrastructure_common::{Scope, StartupSignalSource};
use registry_impl::{
    registration_channel, LoggingRegistrySink, RegistrationConfigLoader, RegistrationForwarder,
    RegistrationTrigger,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP gRPC 服务注册示例")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/app.toml")]
    config: String,

    /// 环境变量前缀
    #[arg(long, default_value = "ADSP")]
    env_prefix: String,

    /// 注册配置节名称
    #[arg(long, default_value = registry_impl::DEFAULT_SECTION)]
    section: String,

    /// 模拟的嵌套作用域数量
    #[arg(long, default_value_t = 4)]
    scopes: usize,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志，RUST_LOG 优先
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动 Lorn ADSP 服务注册示例");

    let mut loader = RegistrationConfigLoader::new()
        .with_env_prefix(&args.env_prefix)
        .with_section(&args.section);
    if Path::new(&args.config).exists() {
        loader = loader.with_file(&args.config);
    } else {
        info!("配置文件不存在，仅使用环境变量: {}", args.config);
    }
    let config = loader.load().context("加载注册配置失败")?;
    info!("注册配置: {:?}", config);

    // 发布管道
    let (publisher, receiver) = registration_channel();
    let forwarder = tokio::spawn(RegistrationForwarder::run(
        receiver,
        Arc::new(LoggingRegistrySink),
    ));

    let trigger = Arc::new(RegistrationTrigger::new(config, Arc::new(publisher)));
    let signals = Arc::new(StartupSignalSource::new());
    signals.add_listener(trigger.clone());

    simulate_startup(&signals, args.scopes).await?;

    info!(
        "启动完成: 共 {} 次启动信号, 已注册: {}",
        signals.signals_delivered(),
        trigger.is_registered()
    );

    // 释放所有发布者后转发器才会退出
    drop(signals);
    drop(trigger);
    let delivered = forwarder.await.context("注册事件转发器异常退出")?;
    info!("应用已关闭, 共投递 {} 个注册事件", delivered);

    Ok(())
}

/// 模拟根作用域及其嵌套作用域完成初始化
async fn simulate_startup(signals: &Arc<StartupSignalSource>, scopes: usize) -> anyhow::Result<()> {
    let root = Scope::root();
    info!("根作用域初始化完成: {}", root.id);
    signals.signal(&root)?;

    // 子作用域并发完成
    let mut handles = Vec::with_capacity(scopes);
    for index in 0..scopes {
        let signals = signals.clone();
        let scope = root.child(format!("module-{index}"));
        handles.push(tokio::task::spawn_blocking(move || signals.signal(&scope)));
    }

    for handle in handles {
        if let Err(e) = handle.await? {
            warn!("子作用域启动信号处理失败: {}", e);
        }
    }

    Ok(())
}
