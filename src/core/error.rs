use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    TargetNotFound,

    JobStepFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::TargetNotFound => "target.not_found",

            ErrorCode::JobStepFailed => "job.step_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Process exit code for this class of error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ConfigInvalidJson
            | ErrorCode::ConfigInvalidValue
            | ErrorCode::ValidationInvalidArgument => 2,

            ErrorCode::TargetNotFound => 4,

            ErrorCode::JobStepFailed => 20,

            ErrorCode::InternalIoError
            | ErrorCode::InternalJsonError
            | ErrorCode::InternalUnexpected => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}

/// Details for a release step that exited non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailedDetails {
    pub job: String,
    /// 1-based position of the failing command in the job.
    pub step: usize,
    pub command: String,
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// Steps that finished successfully before the failure.
    pub completed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn target_not_found(id: impl Into<String>, available: Vec<String>) -> Self {
        let id = id.into();
        let details = to_details(NotFoundDetails {
            id: id.clone(),
            available,
        });

        Self::new(
            ErrorCode::TargetNotFound,
            format!("Release target '{}' not found", id),
            details,
        )
        .with_hint("Run 'releaser list' to see available targets")
    }

    pub fn step_failed(details: StepFailedDetails) -> Self {
        let message = format!(
            "Job '{}' failed at step {} (exit code {}): {}",
            details.job,
            details.step,
            details.exit_code,
            first_line(&details.command)
        );

        Self::new(ErrorCode::JobStepFailed, message, to_details(details))
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

// Multi-line commands usually open with a `cd`; the message shows only that line.
fn first_line(command: &str) -> String {
    let mut lines = command.lines();
    match (lines.next(), lines.next()) {
        (Some(first), Some(_)) => format!("{} ...", first),
        (Some(first), None) => first.to_string(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(command: &str, exit_code: i32) -> Error {
        Error::step_failed(StepFailedDetails {
            job: "api-build".to_string(),
            step: 2,
            command: command.to_string(),
            exit_code,
            stdout: String::new(),
            stderr: "boom".to_string(),
            completed: 1,
        })
    }

    #[test]
    fn step_failed_message_names_job_and_command() {
        let err = failed("exit 3", 3);
        assert_eq!(err.code, ErrorCode::JobStepFailed);
        assert_eq!(
            err.message,
            "Job 'api-build' failed at step 2 (exit code 3): exit 3"
        );
    }

    #[test]
    fn step_failed_message_truncates_multiline_command() {
        let err = failed("cd ../mirror\ngit push origin master", 1);
        assert!(err.message.ends_with("cd ../mirror ..."));
        assert_eq!(
            err.details["command"],
            "cd ../mirror\ngit push origin master"
        );
    }

    #[test]
    fn step_failed_details_are_camel_case() {
        let err = failed("false", 1);
        assert_eq!(err.details["exitCode"], 1);
        assert_eq!(err.details["completed"], 1);
        assert_eq!(err.details["stderr"], "boom");
        assert!(err.details.get("stdout").is_none());
    }

    #[test]
    fn exit_codes_are_non_zero() {
        assert_eq!(ErrorCode::JobStepFailed.exit_code(), 20);
        assert_eq!(ErrorCode::ConfigInvalidJson.exit_code(), 2);
        assert_eq!(ErrorCode::TargetNotFound.exit_code(), 4);
        assert_eq!(ErrorCode::InternalIoError.exit_code(), 1);
    }

    #[test]
    fn target_not_found_carries_hint() {
        let err = Error::target_not_found("api-docs", vec!["api-build".to_string()]);
        assert_eq!(err.code.as_str(), "target.not_found");
        assert_eq!(err.hints.len(), 1);
        assert_eq!(err.details["available"][0], "api-build");
    }
}
