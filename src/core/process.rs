//! Local shell invocation for release steps.
//!
//! Every call spawns a fresh shell, so working-directory changes made by one
//! command never carry over into the next.

use std::process::{Command, Stdio};

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

impl CommandOutput {
    fn spawn_error(e: std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
            success: false,
            exit_code: -1,
        }
    }
}

fn shell_command(command: &str, current_dir: Option<&str>) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };

    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }

    cmd
}

/// Execute a command and capture its stdout/stderr.
pub fn execute_local_command(command: &str, current_dir: Option<&str>) -> CommandOutput {
    let mut cmd = shell_command(command, current_dir);
    cmd.stdin(Stdio::null());

    match cmd.output() {
        Ok(out) => CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            // Killed by a signal
            exit_code: out.status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput::spawn_error(e),
    }
}

/// Execute a command with its output streamed to the terminal.
///
/// The child's stdout is sent to our stderr so that stdout stays reserved for
/// the JSON response. Returns only the exit status, not captured output.
pub fn execute_local_command_passthrough(
    command: &str,
    current_dir: Option<&str>,
) -> CommandOutput {
    let mut cmd = shell_command(command, current_dir);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::from(std::io::stderr()));
    cmd.stderr(Stdio::inherit());

    match cmd.status() {
        Ok(status) => CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            exit_code: status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput::spawn_error(e),
    }
}
