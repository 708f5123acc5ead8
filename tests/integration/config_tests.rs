use dupfind::config::{Config, ConfigError};
use dupfind::duplicates::BufferSchedule;
use figment::providers::Serialized;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.buffer_schedule, BufferSchedule::default());
    assert_eq!(config.min_size, None);
    assert!(!config.skip_hidden);
}

#[test]
fn test_config_load_from_env() {
    use figment::{providers::Env, Figment};

    std::env::set_var("DUPFINDTEST_SKIP_HIDDEN", "true");
    std::env::set_var("DUPFINDTEST_BUFFER_SCHEDULE", "[16, 1024]");

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("DUPFINDTEST_"));
    let config: Config = figment.extract().unwrap();

    assert!(config.skip_hidden);
    assert_eq!(config.buffer_schedule.sizes(), &[16, 1024]);

    std::env::remove_var("DUPFINDTEST_SKIP_HIDDEN");
    std::env::remove_var("DUPFINDTEST_BUFFER_SCHEDULE");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
buffer_schedule = [32, 512]
min_size = 10
max_size = 4096
skip_hidden = true
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.buffer_schedule.sizes(), &[32, 512]);
    assert_eq!(config.min_size, Some(10));
    assert_eq!(config.max_size, Some(4096));
    assert!(config.skip_hidden);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_size = 1\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.min_size, Some(1));
    assert_eq!(config.buffer_schedule, BufferSchedule::default());
}

#[test]
fn test_config_rejects_zero_in_schedule() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "buffer_schedule = [64, 0]\n").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_config_rejects_empty_schedule() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "buffer_schedule = []\n").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "skip_hidden = = yes").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_config_save_and_reload() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config = Config {
        buffer_schedule: BufferSchedule::new(vec![8, 64]).unwrap(),
        max_size: Some(100),
        ..Config::default()
    };
    fs::write(&config_path, config.to_toml_string().unwrap()).unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("max_size = 100"));

    let reloaded = Config::load(Some(&config_path)).unwrap();
    assert_eq!(reloaded.buffer_schedule, config.buffer_schedule);
    assert_eq!(reloaded.max_size, Some(100));
}
