use actor_console::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

const ARGS: [&str; 1] = ["actor-console"];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CONSOLE_SERVER__PORT");
        env::remove_var("CONSOLE_POLLING__MAX_POLLS");
        env::remove_var("CONSOLE_REMOTE__API_TOKEN");
        env::remove_var("APIFY_API_KEY");
        env::remove_var("CATALOG_PATH");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(ARGS).expect("defaults should load");

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.remote.base_url, "https://api.apify.com");
    assert_eq!(config.catalog.path, "apify_actors.json");
    assert_eq!(config.catalog.max_listed, 500);
    assert_eq!(config.polling.interval_ms, 3000);
    assert!(!config.remote.has_credential());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CONSOLE_SERVER__PORT", "9090");
        env::set_var("CONSOLE_POLLING__MAX_POLLS", "7");
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.polling.max_polls, 7);

    clear_env_vars();
}

#[test]
#[serial]
fn test_credential_from_environment() {
    clear_env_vars();
    unsafe {
        env::set_var("APIFY_API_KEY", "apify_api_abc");
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
    assert!(config.remote.has_credential());
    assert_eq!(config.remote.api_token.as_deref(), Some("apify_api_abc"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CONSOLE_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["actor-console", "--port", "6001", "serve"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 6001);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("console.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
catalog:
  path: "/srv/actors.json"
"#,
    )
    .expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        "actor-console",
        "--config",
        file_path.to_str().unwrap(),
    ])
    .expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.catalog.path, "/srv/actors.json");
    // untouched keys keep their defaults
    assert_eq!(config.polling.deadline_secs, 900);
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let res = AppConfig::load_from_args(["actor-console", "--config", "/nope/console.yaml"]);
    assert!(res.is_err());
}
