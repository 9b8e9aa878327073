pub mod actions;
pub mod apply;
pub mod config;
pub mod list;
pub mod selection;
pub mod stats;
pub mod suggest;

use std::fs;
use std::path::Path;

use anyhow::Context;
use pactum_core::config::{AppConfig, LoadOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;
pub const EXIT_RULE_REJECTION: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn success_with_data<T: Serialize>(
        command: &str,
        message: impl Into<String>,
        data: &T,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(
                    command,
                    "serialization",
                    format!("could not encode command output: {error}"),
                    1,
                );
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn input_failure(command: &str, error: &anyhow::Error) -> Self {
        Self::failure(command, "input", format!("{error:#}"), EXIT_INPUT)
    }
}

/// Loads the effective configuration or the failure payload for `command`.
pub fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("could not parse `{}`", path.display()))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::{read_json, CommandResult};

    #[test]
    fn failure_payload_omits_data() {
        let result = CommandResult::failure("suggest", "input", "bad file", 3);
        let payload: Value = serde_json::from_str(&result.output).expect("valid json");

        assert_eq!(result.exit_code, 3);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
        assert!(payload.get("data").is_none());
    }

    #[test]
    fn read_json_reports_path_on_parse_failure() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("roster.json");
        fs::write(&path, "{ not json").expect("write fixture");

        let error = read_json::<Value>(&path).expect_err("invalid json");
        assert!(format!("{error:#}").contains("roster.json"));
    }
}
