//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use releaser::error::Hint;
use releaser::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn print_success<T: Serialize>(data: T) -> Result<()> {
    print_response(&CliResponse::success(data))
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = err.code.exit_code();
            (Err(err), exit_code)
        }
    }
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_success(data),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use releaser::error::StepFailedDetails;

    fn step_failed() -> Error {
        Error::step_failed(StepFailedDetails {
            job: "api-lint".to_string(),
            step: 9,
            command: "cd ../aws-s3-public\ngit commit -m 'Add new version of api-lint' util/api-lint"
                .to_string(),
            exit_code: 1,
            stdout: "nothing to commit".to_string(),
            stderr: String::new(),
            completed: 8,
        })
    }

    #[test]
    fn step_failed_serializes_command_and_exit_code() {
        let json = CliResponse::<()>::from_error(&step_failed()).to_json().unwrap();

        assert!(json.contains("\"code\": \"job.step_failed\""));
        assert!(json.contains("\"exitCode\": 1"));
        assert!(json.contains("nothing to commit"));
        assert!(json.contains("\"success\": false"));
    }

    #[test]
    fn step_failed_maps_to_exit_code_20() {
        let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(step_failed()));
        assert_eq!(exit_code, 20);
    }

    #[test]
    fn success_keeps_command_exit_code() {
        let (value, exit_code) = map_cmd_result_to_json(Ok((vec!["api-build"], 0)));
        assert_eq!(exit_code, 0);
        assert_eq!(value.unwrap()[0], "api-build");
    }
}
