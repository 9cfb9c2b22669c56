//! No-mock configuration loading, validation and resolution tests.
//!
//! Covers:
//! - JSON and TOML fixtures through `CountConfig::from_file`
//! - Validation error codes on invalid fixtures
//! - Resolution order (CLI > env path > env dir)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tempfile::TempDir;
use wc_config::resolve::{ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use wc_config::{
    resolve_config, validate_config, ConfigSource, CountConfig, NegativeMassMode, ValidationError,
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.keys.iter().zip(&self.saved) {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
fn json_fixture_loads_and_validates() {
    let config = CountConfig::from_file(&fixture("poisson.json")).expect("load poisson.json");
    assert_eq!(config.distribution.rate, 3.0);
    assert_eq!(config.distribution.shape, 1.0);
    assert_eq!(config.distribution.precision, 20);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn toml_fixture_loads_and_validates() {
    let config =
        CountConfig::from_file(&fixture("overdispersed.toml")).expect("load overdispersed.toml");
    assert_eq!(config.distribution.shape, 0.7);
    assert_eq!(config.distribution.outcomes, 15);
    assert_eq!(config.negative_mass, NegativeMassMode::ClampToZero);
    assert!(config.lookup.accelerated);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_fixtures_report_codes() {
    let negative = CountConfig::from_file(&fixture("negative_rate.json")).unwrap();
    let err = negative.validate().unwrap_err();
    assert_eq!(err.code(), 65);
    assert!(err.to_string().contains("distribution.rate"));

    let old = CountConfig::from_file(&fixture("old_schema.json")).unwrap();
    assert!(matches!(
        old.validate(),
        Err(ValidationError::VersionMismatch { .. })
    ));

    let malformed = CountConfig::from_file(&fixture("malformed.json")).unwrap_err();
    assert_eq!(malformed.code(), 61);

    let oversized = CountConfig::from_file(&fixture("oversized.toml")).unwrap();
    let err = oversized.validate().unwrap_err();
    assert_eq!(err.code(), 65);
    assert!(err.to_string().contains("distribution.precision"));
}

#[test]
fn missing_file_is_io_error() {
    let err = CountConfig::from_file(&fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, ValidationError::IoError(_)));
    assert_eq!(err.code(), 60);
}

#[test]
fn resolution_prefers_cli_then_env_path_then_env_dir() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);

    let tmp = TempDir::new().unwrap();
    let env_file = tmp.path().join("from-env.json");
    fs::copy(fixture("poisson.json"), &env_file).unwrap();
    let dir = tmp.path().join("confdir");
    fs::create_dir_all(&dir).unwrap();
    fs::copy(fixture("overdispersed.toml"), dir.join("weibull-count.toml")).unwrap();

    env::set_var(ENV_CONFIG_PATH, &env_file);
    env::set_var(ENV_CONFIG_DIR, &dir);

    let cli = fixture("poisson.json");
    let resolved = resolve_config(Some(cli.as_path()));
    assert_eq!(resolved.source, ConfigSource::CliArgument);
    assert_eq!(resolved.path.as_deref(), Some(cli.as_path()));

    let resolved = resolve_config(None);
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.path.as_deref(), Some(env_file.as_path()));

    env::remove_var(ENV_CONFIG_PATH);
    let resolved = resolve_config(None);
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.path, Some(dir.join("weibull-count.toml")));

    let loaded = CountConfig::from_file(resolved.path.as_deref().unwrap()).unwrap();
    assert_eq!(loaded.distribution.shape, 0.7);
}

#[test]
fn missing_cli_path_falls_through() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);

    let tmp = TempDir::new().unwrap();
    let env_file = tmp.path().join("model.json");
    fs::copy(fixture("poisson.json"), &env_file).unwrap();
    env::set_var(ENV_CONFIG_PATH, &env_file);
    env::remove_var(ENV_CONFIG_DIR);

    let resolved = resolve_config(Some(tmp.path().join("nope.json").as_path()));
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.path, Some(env_file));
}
