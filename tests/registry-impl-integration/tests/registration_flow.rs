//! 注册流程端到端测试：配置 -> 启动信号 -> 触发器 -> 发布管道 -> 注册中心
use async_trait::async_trait;
use infrastructure_common::{HostResolutionError, Scope, StartupSignalSource};
use parking_lot::Mutex;
use registry_abstractions::{
    HostLookup, NetInterface, ProtocolKind, RegistrationDescriptor, RegistrySink,
};
use registry_impl::{
    registration_channel, AddressResolver, RegistrationConfig, RegistrationForwarder,
    RegistrationTrigger, SignalOutcome,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 记录收到的注册请求
#[derive(Default)]
struct InMemoryRegistry {
    registrations: Mutex<Vec<RegistrationDescriptor>>,
}

#[async_trait]
impl RegistrySink for InMemoryRegistry {
    async fn register(
        &self,
        descriptor: &RegistrationDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.registrations.lock().push(descriptor.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "InMemoryRegistry"
    }
}

/// 模拟一台双网卡主机
struct TwoNicHost;

impl HostLookup for TwoNicHost {
    fn interfaces(&self) -> Result<Vec<NetInterface>, HostResolutionError> {
        Ok(vec![
            NetInterface::new("lo", "127.0.0.1".parse().unwrap()),
            NetInterface::new("eth0", "10.0.0.9".parse().unwrap()),
            NetInterface::new("eth1", "192.168.7.15".parse().unwrap()),
        ])
    }

    fn primary_address(&self) -> Option<std::net::IpAddr> {
        Some("10.0.0.9".parse().unwrap())
    }
}

fn order_properties(host: Option<&str>) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    properties.insert("contextPath".to_string(), "/order".to_string());
    properties.insert("ipAndPort".to_string(), "svc-order-1".to_string());
    properties.insert("port".to_string(), "9090".to_string());
    if let Some(host) = host {
        properties.insert("host".to_string(), host.to_string());
    }
    properties
}

#[tokio::test]
async fn test_nested_scopes_register_exactly_once() {
    let (publisher, receiver) = registration_channel();
    let registry = Arc::new(InMemoryRegistry::default());
    let forwarder = tokio::spawn(RegistrationForwarder::run(receiver, registry.clone()));

    let config = RegistrationConfig::from_properties(&order_properties(Some("10.0.0.9"))).unwrap();
    let trigger = Arc::new(RegistrationTrigger::new(config, Arc::new(publisher)));

    let signals = Arc::new(StartupSignalSource::new());
    signals.add_listener(trigger.clone());

    let root = Scope::root();
    signals.signal(&root).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let signals = signals.clone();
            let scope = root.child(format!("module-{i}"));
            tokio::task::spawn_blocking(move || signals.signal(&scope))
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(signals.signals_delivered(), 17);
    assert!(trigger.is_registered());

    drop(signals);
    drop(trigger);
    assert_eq!(forwarder.await.unwrap(), 1);

    assert_eq!(
        *registry.registrations.lock(),
        vec![RegistrationDescriptor {
            context_path: "/order".to_string(),
            service_name: "svc-order-1".to_string(),
            protocol_kind: ProtocolKind::Grpc,
            host: "10.0.0.9".to_string(),
            port: 9090,
        }]
    );
}

#[tokio::test]
async fn test_incomplete_host_is_resolved_before_publish() {
    let (publisher, receiver) = registration_channel();
    let registry = Arc::new(InMemoryRegistry::default());

    let config = RegistrationConfig::from_properties(&order_properties(Some("192.168.*"))).unwrap();
    let trigger = RegistrationTrigger::with_resolver(
        config,
        AddressResolver::new(Arc::new(TwoNicHost)),
        Arc::new(publisher),
    );

    assert_eq!(trigger.on_startup_signal().unwrap(), SignalOutcome::Published);
    drop(trigger);

    RegistrationForwarder::run(receiver, registry.clone()).await;

    let registrations = registry.registrations.lock();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].host, "192.168.7.15");
    assert_eq!(registrations[0].address(), "192.168.7.15:9090");
}

#[tokio::test]
async fn test_missing_host_uses_primary_address() {
    let (publisher, receiver) = registration_channel();
    let registry = Arc::new(InMemoryRegistry::default());

    let config = RegistrationConfig::from_properties(&order_properties(None)).unwrap();
    let trigger = RegistrationTrigger::with_resolver(
        config,
        AddressResolver::new(Arc::new(TwoNicHost)),
        Arc::new(publisher),
    );

    trigger.on_startup_signal().unwrap();
    trigger.on_startup_signal().unwrap();
    drop(trigger);

    assert_eq!(RegistrationForwarder::run(receiver, registry.clone()).await, 1);
    assert_eq!(registry.registrations.lock()[0].host, "10.0.0.9");
}

#[test]
fn test_concurrent_signals_from_many_threads() {
    let (publisher, mut receiver) = registration_channel();
    let config = RegistrationConfig::from_properties(&order_properties(None)).unwrap();
    let trigger = Arc::new(RegistrationTrigger::with_resolver(
        config,
        AddressResolver::new(Arc::new(TwoNicHost)),
        Arc::new(publisher),
    ));

    let barrier = Arc::new(std::sync::Barrier::new(100));
    let handles: Vec<_> = (0..100)
        .map(|_| {
            let trigger = trigger.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                trigger.on_startup_signal().unwrap()
            })
        })
        .collect();

    let published = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|outcome| *outcome == SignalOutcome::Published)
        .count();
    assert_eq!(published, 1);

    drop(trigger);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut received = Vec::new();
    runtime.block_on(async {
        while let Some(descriptor) = receiver.recv().await {
            received.push(descriptor);
        }
    });
    assert_eq!(received.len(), 1);
}
