use std::fs;

use graphite_core::{
    init_tracing, ConfigError, ConfigProperties, ConfigValue, GraphiteConfig, LogConfig, LogFormat,
};
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = GraphiteConfig::empty();
    assert!(matches!(
        config.get::<String>("nonexistent"),
        Err(ConfigError::NotFound(_))
    ));
    assert_eq!(config.profile(), "test");
}

#[test]
fn test_set_and_get() {
    let mut config = GraphiteConfig::empty();
    config.set("graphite.datasource.url", "mysql://localhost/app");
    config.set("graphite.datasource.connections", 8i64);
    assert_eq!(
        config.get::<String>("graphite.datasource.url").unwrap(),
        "mysql://localhost/app"
    );
    assert_eq!(config.get::<u32>("graphite.datasource.connections").unwrap(), 8);
    assert!(config.contains_key("graphite.datasource.url"));
}

#[test]
fn test_get_or_default() {
    let config = GraphiteConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
}

#[test]
fn test_type_conversions() {
    let mut config = GraphiteConfig::empty();
    config.set("int_val", ConfigValue::Integer(42));
    config.set("float_val", ConfigValue::Float(2.5));
    config.set("bool_val", "yes");
    config.set("null_val", ConfigValue::Null);

    assert_eq!(config.get::<i64>("int_val").unwrap(), 42);
    assert_eq!(config.get::<f64>("float_val").unwrap(), 2.5);
    assert!(config.get::<bool>("bool_val").unwrap());
    assert_eq!(config.get::<String>("int_val").unwrap(), "42");
    assert!(config.get::<Option<String>>("null_val").unwrap().is_none());
    assert!(matches!(
        config.get::<i64>("bool_val"),
        Err(ConfigError::TypeMismatch { expected: "i64", .. })
    ));
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
graphite:
  datasource:
    url: "mysql://root@localhost/app"
    connections: 10
    sources:
      replica: "mysql://root@replica/app"
      reporting: "mysql://root@reports/app"
"#;
    let config = GraphiteConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(
        config.get::<String>("graphite.datasource.url").unwrap(),
        "mysql://root@localhost/app"
    );
    assert_eq!(config.get::<i64>("graphite.datasource.connections").unwrap(), 10);

    let sources = config.children("graphite.datasource.sources");
    assert_eq!(sources.len(), 2);
    assert_eq!(
        sources.get("replica"),
        Some(&ConfigValue::String("mysql://root@replica/app".into()))
    );
    assert!(config.children("graphite").is_empty());
}

#[test]
fn test_list_config() {
    let yaml = r#"
graphite:
  hosts:
    - "db1"
    - "db2"
"#;
    let config = GraphiteConfig::from_yaml_str(yaml, "test").unwrap();
    let hosts: Vec<String> = config.get("graphite.hosts").unwrap();
    assert_eq!(hosts, vec!["db1", "db2"]);
    assert_eq!(config.get::<String>("graphite.hosts.1").unwrap(), "db2");
}

struct PoolConfig {
    size: u32,
    name: Option<String>,
}

impl ConfigProperties for PoolConfig {
    fn prefix() -> &'static str {
        "app.pool"
    }

    fn from_config(config: &GraphiteConfig) -> Result<Self, ConfigError> {
        Ok(PoolConfig {
            size: config.get_or(&Self::key("size"), 10),
            name: config.get_or(&Self::key("name"), None),
        })
    }
}

#[test]
fn test_typed_section() {
    let config = GraphiteConfig::from_yaml_str("app:\n  pool:\n    size: 3\n", "test")
        .unwrap()
        .with_typed::<PoolConfig>()
        .unwrap();
    assert_eq!(config.size, 3);
    assert!(config.name.is_none());
    assert_eq!(config.raw().get::<u32>("app.pool.size").unwrap(), 3);
}

#[test]
fn test_log_config() {
    let config = GraphiteConfig::from_yaml_str(
        "graphite:\n  log:\n    format: JSON\n    filter: warn\n",
        "test",
    )
    .unwrap();
    let log = LogConfig::from_config(&config).unwrap();
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.filter.as_deref(), Some("warn"));

    assert_eq!(LogConfig::from_config(&GraphiteConfig::empty()).unwrap(), LogConfig::default());

    let bad = GraphiteConfig::from_yaml_str("graphite:\n  log:\n    format: xml\n", "test").unwrap();
    assert!(matches!(
        LogConfig::from_config(&bad),
        Err(ConfigError::TypeMismatch { .. })
    ));
}

#[test]
fn test_init_tracing_twice_is_harmless() {
    init_tracing();
    init_tracing();
}

#[test]
#[serial]
fn test_load_layers_files_and_env() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "graphite:\n  datasource:\n    url: base\n    connections: 4\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application-staging.yaml"),
        "graphite:\n  datasource:\n    url: staging\n",
    )
    .unwrap();

    std::env::remove_var("GRAPHITE_PROFILE");
    std::env::set_var("GRAPHITE_DATASOURCE_CONNECTIONS", "9");
    let config = GraphiteConfig::load_from_dir(dir.path(), "staging").unwrap();
    std::env::remove_var("GRAPHITE_DATASOURCE_CONNECTIONS");

    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("graphite.datasource.url").unwrap(), "staging");
    assert_eq!(config.get::<u32>("graphite.datasource.connections").unwrap(), 9);
}

#[test]
#[serial]
fn test_profile_env_var_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application-prod.yaml"), "app:\n  mode: prod\n").unwrap();

    std::env::set_var("GRAPHITE_PROFILE", "prod");
    let config = GraphiteConfig::load_from_dir(dir.path(), "dev").unwrap();
    std::env::remove_var("GRAPHITE_PROFILE");

    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("app.mode").unwrap(), "prod");
}

#[test]
#[serial]
fn test_dotenv_does_not_override_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".env"),
        "GRAPHITE_TEST_DOTENV_ONLY=from-file\nGRAPHITE_TEST_DOTENV_BOTH=from-file\n",
    )
    .unwrap();

    std::env::remove_var("GRAPHITE_PROFILE");
    std::env::set_var("GRAPHITE_TEST_DOTENV_BOTH", "from-env");
    let config = GraphiteConfig::load_from_dir(dir.path(), "dev").unwrap();
    std::env::remove_var("GRAPHITE_TEST_DOTENV_BOTH");
    std::env::remove_var("GRAPHITE_TEST_DOTENV_ONLY");

    assert_eq!(
        config.get::<String>("graphite.test.dotenv.only").unwrap(),
        "from-file"
    );
    assert_eq!(
        config.get::<String>("graphite.test.dotenv.both").unwrap(),
        "from-env"
    );
}

#[test]
#[serial]
fn test_invalid_yaml_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.yaml"), "graphite: [unclosed").unwrap();
    assert!(matches!(
        GraphiteConfig::load_from_dir(dir.path(), "none"),
        Err(ConfigError::Load(_))
    ));
}
