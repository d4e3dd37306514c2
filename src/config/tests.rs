use super::load_config;
use super::settings::{PartialServerSettings, PartialSettings, Settings};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

/// Runs `f` with an empty temp dir as the current directory.
fn in_temp_dir<F: FnOnce(&TempDir)>(f: F) {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");
    f(&tmp);
    env::set_current_dir(orig).expect("restore cwd");
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.broker.max_sessions, 1000);
    assert_eq!(settings.log.level, "info");
}

#[test]
fn test_partial_merge_keeps_unset_defaults() {
    let partial = PartialSettings {
        server: Some(PartialServerSettings {
            host: None,
            port: Some(9001),
        }),
        ..PartialSettings::default()
    };
    let settings = partial.merge(Settings::default());
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 9001);
    assert_eq!(settings.broker.max_sessions, 1000);
}

#[test]
#[serial]
fn test_load_config_without_sources_is_default() {
    in_temp_dir(|_| {
        let settings = load_config().expect("load_config failed");
        assert_eq!(settings, Settings::default());
    });
}

#[test]
#[serial]
fn test_load_config_from_file_overrides_defaults() {
    in_temp_dir(|_| {
        fs::create_dir_all("config").expect("create config dir");
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [broker]
            max_sessions = 10
        "#;
        fs::write("config/default.toml", toml).expect("write config file");

        let cfg = load_config().expect("load_config failed");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.broker.max_sessions, 10);
        assert_eq!(cfg.log.level, "info");
    });
}

#[test]
#[serial]
fn test_load_config_env_overrides_file() {
    in_temp_dir(|_| {
        fs::create_dir_all("config").expect("create config dir");
        fs::write("config/default.toml", "[server]\nport = 9000\n").expect("write config file");

        temp_env::with_vars(
            [
                ("WAMPSUB_SERVER__PORT", Some("9100")),
                ("WAMPSUB_LOG__LEVEL", Some("debug")),
            ],
            || {
                let cfg = load_config().expect("load_config failed");
                assert_eq!(cfg.server.port, 9100);
                assert_eq!(cfg.log.level, "debug");
            },
        );
    });
}
