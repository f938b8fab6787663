use super::*;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_load_empty_config() {
    let config = ConfigLoader::load_str("").unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.mentor.recommendation_threshold, 3);
}

#[test]
fn test_load_full_config() {
    let content = r#"
        [server]
        host = "0.0.0.0"
        port = 8787
        cors_origins = ["chrome-extension://abc"]

        [upstream]
        api_key = "hf_test"
        model = "meta-llama/Llama-3.1-8B-Instruct"
        max_tokens = 512

        [client]
        endpoint = "http://localhost:8787/api/generate"
        store_path = "/tmp/codementor.db"

        [mentor]
        recommendation_threshold = 4
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8787);
    assert_eq!(config.server.cors_origins, vec!["chrome-extension://abc".to_string()]);
    assert_eq!(config.upstream.api_key.as_deref(), Some("hf_test"));
    assert_eq!(config.upstream.max_tokens, 512);
    assert_eq!(config.client.store_path.to_string_lossy(), "/tmp/codementor.db");
    assert_eq!(config.mentor.recommendation_threshold, 4);
}

#[test]
fn test_store_path_tilde_is_expanded() {
    let config = ConfigLoader::load_str("[client]\nstore_path = \"~/mentor.db\"\n").unwrap();
    assert!(!config.client.store_path.to_string_lossy().starts_with('~'));
    assert!(config.client.store_path.ends_with("mentor.db"));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[server]").unwrap();
    writeln!(file, "port = 5000").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    assert_eq!(config.server.port, 5000);
}

#[test]
fn test_load_nonexistent_file() {
    let result = ConfigLoader::load(Path::new("/nonexistent/path/codementor.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_or_default_without_file() {
    let config = ConfigLoader::load_or_default(Path::new("/nonexistent/path/codementor.toml")).unwrap();
    assert_eq!(config.upstream.max_tokens, 300);
}

#[test]
fn test_load_invalid_toml() {
    let result = ConfigLoader::load_str("invalid = [unclosed");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_expand_env_vars() {
    // SAFETY: This test runs in isolation and sets a unique test-only env var
    unsafe {
        std::env::set_var("CODEMENTOR_TEST_CONFIG_VAR", "test_value");
    }
    let content = "value = \"${CODEMENTOR_TEST_CONFIG_VAR}\"";
    let expanded = ConfigLoader::expand_env_vars(content).unwrap();
    assert!(expanded.contains("test_value"));
    unsafe {
        std::env::remove_var("CODEMENTOR_TEST_CONFIG_VAR");
    }
}

#[test]
fn test_expand_env_vars_not_set() {
    let content = "value = \"${CODEMENTOR_NONEXISTENT_VAR_12345}\"";
    let result = ConfigLoader::expand_env_vars(content);
    assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
}

#[test]
fn test_env_overrides_applied() {
    let mut config = Config::default();
    let lookup = lookup_from(&[
        ("HF_API_KEY", "hf_secret"),
        ("HF_MODEL", "mistralai/Mistral-7B-Instruct"),
        ("PORT", "4000"),
        ("CORS_ORIGINS", "https://a.example, https://b.example"),
    ]);
    ConfigLoader::apply_env_overrides(&mut config, lookup).unwrap();

    assert_eq!(config.upstream.api_key.as_deref(), Some("hf_secret"));
    assert_eq!(config.upstream.model, "mistralai/Mistral-7B-Instruct");
    assert_eq!(config.server.port, 4000);
    assert_eq!(
        config.server.cors_origins,
        vec!["https://a.example".to_string(), "https://b.example".to_string()]
    );
}

#[test]
fn test_env_overrides_ignore_blank_key() {
    let mut config = Config::default();
    ConfigLoader::apply_env_overrides(&mut config, lookup_from(&[("HF_API_KEY", "  ")])).unwrap();
    assert!(config.upstream.api_key.is_none());
}

#[test]
fn test_env_override_invalid_port() {
    let mut config = Config::default();
    let result = ConfigLoader::apply_env_overrides(&mut config, lookup_from(&[("PORT", "abc")]));
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_expand_path_no_tilde() {
    let path = "/usr/local/share";
    assert_eq!(ConfigLoader::expand_path(path), path);
}
