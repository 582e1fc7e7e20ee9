use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHOPNORM_ENV"));
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.rules_path.is_none());
    assert_eq!(cfg.max_concurrency, 4);
    assert!(!cfg.pretty_json);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SHOPNORM_ENV", "production");
    map.insert("SHOPNORM_LOG_LEVEL", "shopnorm_normalizer=debug");
    map.insert("SHOPNORM_RULES_PATH", "./config/rules.yaml");
    map.insert("SHOPNORM_MAX_CONCURRENCY", "16");
    map.insert("SHOPNORM_PRETTY_JSON", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "shopnorm_normalizer=debug");
    assert_eq!(
        cfg.rules_path.as_deref(),
        Some(std::path::Path::new("./config/rules.yaml"))
    );
    assert_eq!(cfg.max_concurrency, 16);
    assert!(cfg.pretty_json);
}

#[test]
fn build_app_config_ignores_blank_rules_path() {
    let mut map = HashMap::new();
    map.insert("SHOPNORM_RULES_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.rules_path.is_none());
}

#[test]
fn build_app_config_rejects_non_numeric_concurrency() {
    let mut map = HashMap::new();
    map.insert("SHOPNORM_MAX_CONCURRENCY", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPNORM_MAX_CONCURRENCY"),
        "expected InvalidEnvVar(SHOPNORM_MAX_CONCURRENCY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_concurrency() {
    let mut map = HashMap::new();
    map.insert("SHOPNORM_MAX_CONCURRENCY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "SHOPNORM_MAX_CONCURRENCY" && reason.contains("at least 1")),
        "expected InvalidEnvVar(SHOPNORM_MAX_CONCURRENCY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_pretty_flag() {
    let mut map = HashMap::new();
    map.insert("SHOPNORM_PRETTY_JSON", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPNORM_PRETTY_JSON"),
        "expected InvalidEnvVar(SHOPNORM_PRETTY_JSON), got: {result:?}"
    );
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("YES"), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("sure"), None);
}
