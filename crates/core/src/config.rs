use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gate::GatePolicy;
use crate::suggestions::{
    Locale, SuggestionThresholds, DIRECTOR_THRESHOLD, FINANCE_THRESHOLD, FULL_REVIEW_THRESHOLD,
    LEGAL_THRESHOLD, MANAGER_THRESHOLD,
};

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["pactum.toml", "config/pactum.toml"];

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub rules: RuleConfig,
    pub gate: GateConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Approval thresholds in whole đồng.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleConfig {
    pub director_threshold: u64,
    pub manager_threshold: u64,
    pub finance_threshold: u64,
    pub legal_threshold: u64,
    pub full_review_threshold: u64,
}

#[derive(Clone, Debug, Default)]
pub struct GateConfig {
    pub policy: GatePolicy,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayConfig {
    pub locale: Locale,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub gate_policy: Option<GatePolicy>,
    pub locale: Option<Locale>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            director_threshold: DIRECTOR_THRESHOLD,
            manager_threshold: MANAGER_THRESHOLD,
            finance_threshold: FINANCE_THRESHOLD,
            legal_threshold: LEGAL_THRESHOLD,
            full_review_threshold: FULL_REVIEW_THRESHOLD,
        }
    }
}

impl RuleConfig {
    pub fn to_thresholds(&self) -> SuggestionThresholds {
        SuggestionThresholds {
            director: Decimal::from(self.director_threshold),
            manager: Decimal::from(self.manager_threshold),
            finance: Decimal::from(self.finance_threshold),
            legal: Decimal::from(self.legal_threshold),
            full_review: Decimal::from(self.full_review_threshold),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options
                .config_path
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(rules) = patch.rules {
            rules.merge_into(&mut self.rules);
        }
        if let Some(policy) = patch.gate.and_then(|gate| gate.policy) {
            self.gate.policy = policy;
        }
        if let Some(locale) = patch.display.and_then(|display| display.locale) {
            self.display.locale = locale;
        }
        if let Some(logging) = patch.logging {
            logging.merge_into(&mut self.logging);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let rules = &mut self.rules;
        let thresholds = [
            ("PACTUM_RULES_DIRECTOR_THRESHOLD", &mut rules.director_threshold),
            ("PACTUM_RULES_MANAGER_THRESHOLD", &mut rules.manager_threshold),
            ("PACTUM_RULES_FINANCE_THRESHOLD", &mut rules.finance_threshold),
            ("PACTUM_RULES_LEGAL_THRESHOLD", &mut rules.legal_threshold),
            ("PACTUM_RULES_FULL_REVIEW_THRESHOLD", &mut rules.full_review_threshold),
        ];
        for (key, slot) in thresholds {
            if let Some(value) = env_value(&[key])? {
                *slot = value;
            }
        }

        if let Some(policy) = env_value(&["PACTUM_GATE_POLICY"])? {
            self.gate.policy = policy;
        }
        if let Some(locale) = env_value(&["PACTUM_DISPLAY_LOCALE"])? {
            self.display.locale = locale;
        }
        if let Some(level) = env_value(&["PACTUM_LOGGING_LEVEL", "PACTUM_LOG_LEVEL"])? {
            self.logging.level = level;
        }
        if let Some(format) = env_value(&["PACTUM_LOGGING_FORMAT", "PACTUM_LOG_FORMAT"])? {
            self.logging.format = format;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(gate_policy) = overrides.gate_policy {
            self.gate.policy = gate_policy;
        }
        if let Some(locale) = overrides.locale {
            self.display.locale = locale;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if rules.manager_threshold >= rules.director_threshold {
            return Err(ConfigError::Validation(format!(
                "rules.manager_threshold ({}) must be below rules.director_threshold ({})",
                rules.manager_threshold, rules.director_threshold
            )));
        }

        match self.logging.level.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replaces every `${VAR}` with the value of `VAR`.
pub fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }
    output.push_str(rest);

    Ok(output)
}

/// Parses the first non-blank variable among `keys` (aliases in priority order).
fn env_value<T: FromStr>(keys: &[&str]) -> Result<Option<T>, ConfigError> {
    let found = keys.iter().find_map(|key| {
        let value = env::var(key).ok().filter(|value| !value.trim().is_empty())?;
        Some((key, value))
    });
    let Some((key, raw)) = found else {
        return Ok(None);
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: raw.clone() })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    rules: Option<RulesPatch>,
    gate: Option<GatePatch>,
    display: Option<DisplayPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesPatch {
    director_threshold: Option<u64>,
    manager_threshold: Option<u64>,
    finance_threshold: Option<u64>,
    legal_threshold: Option<u64>,
    full_review_threshold: Option<u64>,
}

impl RulesPatch {
    fn merge_into(self, rules: &mut RuleConfig) {
        let fields = [
            (self.director_threshold, &mut rules.director_threshold),
            (self.manager_threshold, &mut rules.manager_threshold),
            (self.finance_threshold, &mut rules.finance_threshold),
            (self.legal_threshold, &mut rules.legal_threshold),
            (self.full_review_threshold, &mut rules.full_review_threshold),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GatePatch {
    policy: Option<GatePolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct DisplayPatch {
    locale: Option<Locale>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl LoggingPatch {
    fn merge_into(self, logging: &mut LoggingConfig) {
        if let Some(level) = self.level {
            logging.level = level;
        }
        if let Some(format) = self.format {
            logging.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{
        interpolate_env_vars, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat,
    };
    use crate::gate::GatePolicy;
    use crate::suggestions::Locale;

    const PACTUM_KEYS: [&str; 11] = [
        "PACTUM_RULES_DIRECTOR_THRESHOLD",
        "PACTUM_RULES_MANAGER_THRESHOLD",
        "PACTUM_RULES_FINANCE_THRESHOLD",
        "PACTUM_RULES_LEGAL_THRESHOLD",
        "PACTUM_RULES_FULL_REVIEW_THRESHOLD",
        "PACTUM_GATE_POLICY",
        "PACTUM_DISPLAY_LOCALE",
        "PACTUM_LOGGING_LEVEL",
        "PACTUM_LOGGING_FORMAT",
        "PACTUM_LOG_LEVEL",
        "PACTUM_LOG_FORMAT",
    ];

    /// Restores the saved variables when dropped, so a failing assertion
    /// does not leak env state into later tests.
    struct EnvRestore {
        saved: Vec<(String, Option<String>)>,
    }

    impl Drop for EnvRestore {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }

    /// Runs `test` with every `PACTUM_*` key cleared and `vars` set, holding a
    /// process-wide lock so env-mutating tests never interleave.
    fn with_vars<R>(vars: &[(&str, &str)], test: impl FnOnce() -> R) -> R {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        let _lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let keys = PACTUM_KEYS.iter().copied().chain(vars.iter().map(|(key, _)| *key));
        let _restore =
            EnvRestore { saved: keys.map(|key| (key.to_string(), env::var(key).ok())).collect() };

        for key in PACTUM_KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        test()
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("pactum.toml");
        fs::write(&path, contents).expect("config fixture should be written");
        path
    }

    fn load_from(path: PathBuf) -> Result<AppConfig, ConfigError> {
        AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
    }

    #[test]
    fn env_is_restored_when_a_test_body_panics() {
        let outcome = std::panic::catch_unwind(|| {
            with_vars(&[("PACTUM_TEST_RESTORED_ON_PANIC", "set")], || {
                assert_eq!(env::var("PACTUM_TEST_RESTORED_ON_PANIC").as_deref(), Ok("set"));
                panic!("test body failed")
            })
        });

        assert!(outcome.is_err());
        assert!(env::var("PACTUM_TEST_RESTORED_ON_PANIC").is_err());
    }

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = with_vars(&[], || AppConfig::load(LoadOptions::default()))
            .expect("defaults should load");
        let thresholds = config.rules.to_thresholds();

        assert_eq!(thresholds.director, Decimal::from(10_000_000_000_u64));
        assert_eq!(thresholds.finance, Decimal::from(500_000_000_u64));
        assert_eq!(config.gate.policy, GatePolicy::Canonical);
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_values_support_env_interpolation() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(
            &dir,
            r#"
[rules]
finance_threshold = ${TEST_PACTUM_FINANCE_LIMIT}

[display]
locale = "vi"
"#,
        );

        let config = with_vars(&[("TEST_PACTUM_FINANCE_LIMIT", "750000000")], || load_from(path))
            .expect("config should load");

        assert_eq!(config.rules.finance_threshold, 750_000_000);
        assert_eq!(config.rules.legal_threshold, 1_000_000_000);
        assert_eq!(config.display.locale, Locale::Vi);
    }

    #[test]
    fn interpolation_reports_missing_and_unterminated_variables() {
        with_vars(&[], || {
            assert!(matches!(
                interpolate_env_vars("level = \"${PACTUM_TEST_UNSET_VAR}\""),
                Err(ConfigError::MissingEnvInterpolation { ref var })
                    if var == "PACTUM_TEST_UNSET_VAR"
            ));
            assert!(matches!(
                interpolate_env_vars("level = \"${OPEN"),
                Err(ConfigError::UnterminatedInterpolation)
            ));
            assert_eq!(interpolate_env_vars("cost = $5").ok().as_deref(), Some("cost = $5"));
        });
    }

    #[test]
    fn logging_env_aliases_are_supported() {
        let env = [("PACTUM_LOG_LEVEL", "warn"), ("PACTUM_LOG_FORMAT", "pretty")];
        let config = with_vars(&env, || AppConfig::load(LoadOptions::default()))
            .expect("config should load");

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn precedence_defaults_file_env_overrides() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(
            &dir,
            r#"
[rules]
legal_threshold = 3000000000
manager_threshold = 2000000000

[gate]
policy = "canonical"

[logging]
level = "warn"
"#,
        );

        let env =
            [("PACTUM_RULES_LEGAL_THRESHOLD", "2000000000"), ("PACTUM_GATE_POLICY", "legacy")];
        let config = with_vars(&env, || {
            AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    locale: Some(Locale::Vi),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
        })
        .expect("config should load");

        assert_eq!(config.rules.legal_threshold, 2_000_000_000, "env wins over file");
        assert_eq!(config.rules.manager_threshold, 2_000_000_000, "file wins over default");
        assert_eq!(config.gate.policy, GatePolicy::Legacy, "env wins over file");
        assert_eq!(config.logging.level, "debug", "override wins over file");
        assert_eq!(config.display.locale, Locale::Vi);
    }

    #[test]
    fn invalid_env_threshold_is_reported_with_key() {
        let result = with_vars(&[("PACTUM_RULES_DIRECTOR_THRESHOLD", "ten billion")], || {
            AppConfig::load(LoadOptions::default())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvOverride { ref key, .. })
                if key == "PACTUM_RULES_DIRECTOR_THRESHOLD"
        ));
    }

    #[test]
    fn manager_threshold_must_stay_below_director() {
        let result = with_vars(&[("PACTUM_RULES_MANAGER_THRESHOLD", "20000000000")], || {
            AppConfig::load(LoadOptions::default())
        });

        let message = match result {
            Err(ConfigError::Validation(message)) => message,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert!(message.contains("rules.manager_threshold"));
    }

    #[test]
    fn required_file_must_exist() {
        let dir = TempDir::new().expect("temp dir");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }
}
