use std::collections::HashMap;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

/// Parse the YAML file at `path`, if it exists, into `values`.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    load_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
}

pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten("", &yaml, values);
    Ok(())
}

/// Overlay environment variables: `GRAPHITE_DATASOURCE_URL` is stored as
/// `graphite.datasource.url`.
pub(crate) fn overlay_env(
    vars: impl IntoIterator<Item = (String, String)>,
    values: &mut HashMap<String, ConfigValue>,
) {
    for (name, value) in vars {
        let key = name.to_lowercase().replace('_', ".");
        values.insert(key, ConfigValue::String(value));
    }
}

/// Store every leaf of `node` under its dot-joined path.
///
/// Sequences are stored whole and also per element (`key.0`, `key.1`) so
/// that single elements can be overridden from the environment.
fn flatten(prefix: &str, node: &serde_yaml::Value, out: &mut HashMap<String, ConfigValue>) {
    match node {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let name = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => ConfigValue::from_yaml(other).to_string(),
                };
                if prefix.is_empty() {
                    flatten(&name, v, out);
                } else {
                    flatten(&format!("{prefix}.{name}"), v, out);
                }
            }
        }
        serde_yaml::Value::Sequence(items) if !prefix.is_empty() => {
            out.insert(
                prefix.to_string(),
                ConfigValue::List(items.iter().map(ConfigValue::from_yaml).collect()),
            );
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{prefix}.{i}"), item, out);
            }
        }
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_names_become_dot_keys() {
        let mut values = HashMap::new();
        overlay_env(
            vec![("GRAPHITE_DATASOURCE_URL".to_string(), "mysql://x".to_string())],
            &mut values,
        );
        assert!(matches!(
            values.get("graphite.datasource.url"),
            Some(ConfigValue::String(url)) if url == "mysql://x"
        ));
    }

    #[test]
    fn test_numeric_mapping_keys() {
        let mut values = HashMap::new();
        load_yaml_str("ports:\n  8080: web\n", &mut values).unwrap();
        assert!(values.contains_key("ports.8080"));
    }

    #[test]
    fn test_sequence_stored_whole_and_by_index() {
        let mut values = HashMap::new();
        load_yaml_str("hosts:\n  - a\n  - b\n", &mut values).unwrap();
        assert!(matches!(values.get("hosts"), Some(ConfigValue::List(items)) if items.len() == 2));
        assert!(values.contains_key("hosts.1"));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut values = HashMap::new();
        assert!(matches!(
            load_yaml_str("a: [unclosed", &mut values),
            Err(ConfigError::Load(_))
        ));
    }
}
