use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pactum_core::config::{interpolate_env_vars, AppConfig, CONFIG_FILE_CANDIDATES};
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(config: &AppConfig) -> CommandResult {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let entry = |key: &'static str, value: String, env_keys: &[&str]| ConfigEntry {
        key,
        value,
        source: field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
    };

    let rules = &config.rules;
    let entries = vec![
        entry(
            "rules.director_threshold",
            rules.director_threshold.to_string(),
            &["PACTUM_RULES_DIRECTOR_THRESHOLD"],
        ),
        entry(
            "rules.manager_threshold",
            rules.manager_threshold.to_string(),
            &["PACTUM_RULES_MANAGER_THRESHOLD"],
        ),
        entry(
            "rules.finance_threshold",
            rules.finance_threshold.to_string(),
            &["PACTUM_RULES_FINANCE_THRESHOLD"],
        ),
        entry(
            "rules.legal_threshold",
            rules.legal_threshold.to_string(),
            &["PACTUM_RULES_LEGAL_THRESHOLD"],
        ),
        entry(
            "rules.full_review_threshold",
            rules.full_review_threshold.to_string(),
            &["PACTUM_RULES_FULL_REVIEW_THRESHOLD"],
        ),
        entry("gate.policy", format!("{:?}", config.gate.policy), &["PACTUM_GATE_POLICY"]),
        entry("display.locale", format!("{:?}", config.display.locale), &["PACTUM_DISPLAY_LOCALE"]),
        entry(
            "logging.level",
            config.logging.level.clone(),
            &["PACTUM_LOGGING_LEVEL", "PACTUM_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["PACTUM_LOGGING_FORMAT", "PACTUM_LOG_FORMAT"],
        ),
    ];

    CommandResult::success_with_data(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        &entries,
    )
}

fn detect_config_path() -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    parse_config_doc(&raw)
}

fn parse_config_doc(raw: &str) -> Option<Value> {
    interpolate_env_vars(raw).ok()?.parse::<Value>().ok()
}

fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
