//! Integration tests for Settings layered loading.
//!
//! These tests always pass an explicit config file so the machine's global
//! config never leaks in. Every test that loads settings or touches the
//! process environment holds `ENV_LOCK`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rstest::rstest;
use tempfile::TempDir;

use oopatterns::application::ApplicationError;
use oopatterns::config::{LoggerSettings, Settings, TimerSettings};
use oopatterns::domain::DecoratorKind;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Load settings from `path` with one `OOPATTERNS__*` variable set for the call.
fn load_with_env(path: &Path, key: &str, value: &str) -> Result<Settings, ApplicationError> {
    let _guard = env_lock();
    std::env::set_var(key, value);
    let result = Settings::load(Some(path));
    std::env::remove_var(key);
    result
}

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("oopatterns.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn given_defaults_when_inspecting_then_match_documented_values() {
    let settings = Settings::default();
    assert_eq!(settings.timer.interval_ms, 1000);
    assert_eq!(settings.timer.ticks, 5);
    assert_eq!(
        settings.logger.decorators,
        vec![DecoratorKind::Emphasis, DecoratorKind::Timestamp]
    );
    assert_eq!(settings.shapes.scene, None);
}

#[test]
fn given_partial_config_file_when_load_then_overrides_only_given_fields() {
    let _guard = env_lock();
    let (_dir, path) = write_config(
        r#"
[timer]
ticks = 2

[logger]
decorators = ["timestamp"]
"#,
    );

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(
        settings.timer,
        TimerSettings {
            interval_ms: 1000,
            ticks: 2
        }
    );
    assert_eq!(
        settings.logger,
        LoggerSettings {
            decorators: vec![DecoratorKind::Timestamp]
        }
    );
}

#[test]
fn given_empty_decorator_list_when_load_then_logger_is_plain() {
    let _guard = env_lock();
    let (_dir, path) = write_config("[logger]\ndecorators = []\n");
    let settings = Settings::load(Some(&path)).unwrap();
    assert!(settings.logger.decorators.is_empty());
}

#[test]
fn given_unknown_decorator_when_load_then_config_error() {
    let _guard = env_lock();
    let (_dir, path) = write_config("[logger]\ndecorators = [\"sparkle\"]\n");
    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_explicit_file_when_load_then_config_error() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

// ============================================================
// Environment overrides
// ============================================================

#[test]
fn given_scene_env_override_when_load_then_replaces_file_value() {
    let (_dir, path) = write_config("[shapes]\nscene = \"from-file.toml\"\n");

    let result = load_with_env(&path, "OOPATTERNS__SHAPES__SCENE", "/tmp/from-env.toml");

    assert_eq!(
        result.unwrap().shapes.scene,
        Some(PathBuf::from("/tmp/from-env.toml"))
    );
}

#[rstest]
#[case("OOPATTERNS__TIMER__TICKS", "3", TimerSettings { interval_ms: 50, ticks: 3 })]
#[case("OOPATTERNS__TIMER__INTERVAL_MS", "10", TimerSettings { interval_ms: 10, ticks: 7 })]
fn given_timer_env_override_when_load_then_replaces_file_value(
    #[case] key: &str,
    #[case] value: &str,
    #[case] expected: TimerSettings,
) {
    let (_dir, path) = write_config("[timer]\ninterval_ms = 50\nticks = 7\n");

    let settings = load_with_env(&path, key, value).unwrap();

    assert_eq!(settings.timer, expected);
}

#[rstest]
#[case("timestamp", vec![DecoratorKind::Timestamp])]
#[case("timestamp,emphasis", vec![DecoratorKind::Timestamp, DecoratorKind::Emphasis])]
#[case("emphasis,timestamp", vec![DecoratorKind::Emphasis, DecoratorKind::Timestamp])]
fn given_decorator_list_env_override_when_load_then_parses_in_order(
    #[case] value: &str,
    #[case] expected: Vec<DecoratorKind>,
) {
    let (_dir, path) = write_config("[logger]\ndecorators = []\n");

    let settings = load_with_env(&path, "OOPATTERNS__LOGGER__DECORATORS", value).unwrap();

    assert_eq!(settings.logger.decorators, expected);
}

#[rstest]
#[case("OOPATTERNS__TIMER__TICKS", "abc")]
#[case("OOPATTERNS__TIMER__INTERVAL_MS", "10ms")]
#[case("OOPATTERNS__LOGGER__DECORATORS", "timestamp,sparkle")]
fn given_malformed_env_value_when_load_then_config_error(
    #[case] key: &str,
    #[case] value: &str,
) {
    let (_dir, path) = write_config("");

    let err = load_with_env(&path, key, value).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Config { .. }),
        "{}={} gave {:?}",
        key,
        value,
        err
    );
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    let settings = Settings::default();
    let text = settings.to_toml().unwrap();
    assert!(text.contains("interval_ms = 1000"));
    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back, settings);
}
