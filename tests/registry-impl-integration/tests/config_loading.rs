//! 注册配置加载集成测试
use infrastructure_common::ConfigError;
use registry_impl::RegistrationConfigLoader;
use std::io::Write;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_registry_section() {
    let file = config_file(
        r#"
[registry]
contextPath = "/order"
ipAndPort = "svc-order-1"
host = "10.0.0.9"
port = 9090
"#,
    );

    let config = RegistrationConfigLoader::new()
        .with_file(file.path())
        .load()
        .unwrap();

    assert_eq!(config.context_path(), "/order");
    assert_eq!(config.advertised_endpoint(), "svc-order-1");
    assert_eq!(config.configured_host(), Some("10.0.0.9"));
    assert_eq!(config.port(), 9090);
}

#[test]
fn test_missing_endpoint_fails_fast() {
    let file = config_file(
        r#"
[registry]
contextPath = "/order"
port = 9090
"#,
    );

    let error = RegistrationConfigLoader::new()
        .with_file(file.path())
        .load()
        .unwrap_err();

    match error {
        ConfigError::ValidationFailed { errors } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("ipAndPort"));
        }
        other => panic!("期望验证失败，实际: {other}"),
    }
}

#[test]
fn test_out_of_range_port_fails_fast() {
    let file = config_file(
        r#"
[registry]
contextPath = "/order"
ipAndPort = "svc-order-1"
port = 70000
"#,
    );

    let result = RegistrationConfigLoader::new().with_file(file.path()).load();
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_environment_overrides_file() {
    let file = config_file(
        r#"
[registry]
contextPath = "/order"
ipAndPort = "svc-order-1"
port = 9090
"#,
    );
    std::env::set_var("REGFLOWTEST_REGISTRY__PORT", "9191");
    std::env::set_var("REGFLOWTEST_REGISTRY__HOST", "order.internal");

    let config = RegistrationConfigLoader::new()
        .with_file(file.path())
        .with_env_prefix("REGFLOWTEST")
        .load()
        .unwrap();

    std::env::remove_var("REGFLOWTEST_REGISTRY__PORT");
    std::env::remove_var("REGFLOWTEST_REGISTRY__HOST");

    assert_eq!(config.port(), 9191);
    assert_eq!(config.configured_host(), Some("order.internal"));
    assert_eq!(config.context_path(), "/order");
}

#[test]
fn test_missing_file_is_reported() {
    let result = RegistrationConfigLoader::new()
        .with_file("/nonexistent/registry.toml")
        .load();

    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}
