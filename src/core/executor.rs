//! Sequential, fail-fast execution of shell commands under a named job.
//!
//! A [`Job`] collects opaque command strings in order and runs each one in
//! its own shell invocation. The first non-zero exit stops the job; nothing
//! after it runs, and the already-run commands are not undone.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result, StepFailedDetails};
use crate::process::{self, CommandOutput};

/// How step output reaches the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Stream to the terminal as the command runs.
    #[default]
    Passthrough,
    /// Record stdout/stderr on each step.
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Runs a single command string to completion.
pub trait StepRunner {
    fn run_step(&self, command: &str) -> CommandOutput;
}

/// Production runner: one `sh -c` per step.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    pub output: OutputMode,
    pub current_dir: Option<String>,
}

impl StepRunner for ShellRunner {
    fn run_step(&self, command: &str) -> CommandOutput {
        let dir = self.current_dir.as_deref();
        match self.output {
            OutputMode::Passthrough => process::execute_local_command_passthrough(command, dir),
            OutputMode::Capture => process::execute_local_command(command, dir),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub command: String,
    pub exit_code: i32,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRun {
    pub run_id: Uuid,
    pub job: String,
    pub status: JobStatus,
    pub started_at: String,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: usize,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPlan {
    pub job: String,
    pub status: JobStatus,
    pub steps: Vec<PlannedStep>,
}

#[derive(Debug, Clone, Default)]
pub struct Job {
    name: String,
    commands: Vec<String>,
    output: OutputMode,
    current_dir: Option<String>,
}

impl Job {
    /// New job with no commands. The name is a label only.
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a command. Empty and multi-line strings are accepted as-is;
    /// a multi-line string runs as one shell invocation.
    pub fn add(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Directory every step's shell starts in. Defaults to the process cwd.
    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn plan(&self) -> JobPlan {
        JobPlan {
            job: self.name.clone(),
            status: JobStatus::Pending,
            steps: self
                .commands
                .iter()
                .enumerate()
                .map(|(index, command)| PlannedStep {
                    step: index + 1,
                    command: command.clone(),
                })
                .collect(),
        }
    }

    /// Run every command through the shell, stopping at the first failure.
    pub fn run(self) -> Result<JobRun> {
        let runner = ShellRunner {
            output: self.output,
            current_dir: self.current_dir.clone(),
        };
        self.run_with(&runner)
    }

    pub fn run_with(self, runner: &dyn StepRunner) -> Result<JobRun> {
        let Job { name, commands, .. } = self;
        let total = commands.len();
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now().to_rfc3339();
        let started = Instant::now();

        log_status!(name, "{:?}: {} step(s)", JobStatus::Running, total);

        let mut steps = Vec::with_capacity(total);
        for (index, command) in commands.into_iter().enumerate() {
            let step = index + 1;
            log_status!(name, "step {}/{}: {}", step, total, display_command(&command));

            let step_started = Instant::now();
            let output = runner.run_step(&command);
            let duration_ms = elapsed_ms(step_started);

            if !output.success {
                log_status!(
                    name,
                    "{:?} at step {}/{} (exit code {})",
                    JobStatus::Failed,
                    step,
                    total,
                    output.exit_code
                );
                return Err(Error::step_failed(StepFailedDetails {
                    job: name,
                    step,
                    command,
                    exit_code: output.exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                    completed: steps.len(),
                }));
            }

            steps.push(StepRecord {
                step,
                command,
                exit_code: output.exit_code,
                duration_ms,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        log_status!(name, "{:?}: {} step(s)", JobStatus::Succeeded, total);

        Ok(JobRun {
            run_id,
            job: name,
            status: JobStatus::Succeeded,
            started_at,
            duration_ms: elapsed_ms(started),
            steps,
        })
    }
}

fn display_command(command: &str) -> String {
    command.lines().collect::<Vec<_>>().join(" ; ")
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::cell::RefCell;

    /// Records every command it is handed; exits with the code scripted for
    /// that command (default 0).
    struct RecordingRunner {
        seen: RefCell<Vec<String>>,
        failures: Vec<(&'static str, i32)>,
    }

    impl RecordingRunner {
        fn new(failures: Vec<(&'static str, i32)>) -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                failures,
            }
        }
    }

    impl StepRunner for RecordingRunner {
        fn run_step(&self, command: &str) -> CommandOutput {
            self.seen.borrow_mut().push(command.to_string());
            let exit_code = self
                .failures
                .iter()
                .find(|(c, _)| *c == command)
                .map(|(_, code)| *code)
                .unwrap_or(0);
            CommandOutput {
                success: exit_code == 0,
                exit_code,
                ..CommandOutput::default()
            }
        }
    }

    #[test]
    fn add_preserves_call_order() {
        let job = Job::create("order").add("a").add("b").add("").add("c\nd");
        assert_eq!(job.commands(), ["a", "b", "", "c\nd"]);
        assert_eq!(job.name(), "order");
        assert_eq!(job.len(), 4);
    }

    #[test]
    fn runner_sees_commands_in_insertion_order() {
        let runner = RecordingRunner::new(vec![]);
        let run = Job::create("order")
            .add("first")
            .add("second")
            .add("third")
            .run_with(&runner)
            .unwrap();

        assert_eq!(*runner.seen.borrow(), ["first", "second", "third"]);
        assert_eq!(run.status, JobStatus::Succeeded);
        let indexes: Vec<usize> = run.steps.iter().map(|s| s.step).collect();
        assert_eq!(indexes, [1, 2, 3]);
    }

    #[test]
    fn stops_after_first_failure() {
        let runner = RecordingRunner::new(vec![("b", 5), ("c", 6)]);
        let err = Job::create("halt")
            .add("a")
            .add("b")
            .add("c")
            .run_with(&runner)
            .unwrap_err();

        assert_eq!(*runner.seen.borrow(), ["a", "b"]);
        assert_eq!(err.code, ErrorCode::JobStepFailed);
        assert_eq!(err.details["job"], "halt");
        assert_eq!(err.details["step"], 2);
        assert_eq!(err.details["command"], "b");
        assert_eq!(err.details["exitCode"], 5);
        assert_eq!(err.details["completed"], 1);
    }

    #[test]
    fn empty_job_succeeds_without_running_anything() {
        let runner = RecordingRunner::new(vec![]);
        let run = Job::create("empty").run_with(&runner).unwrap();
        assert!(runner.seen.borrow().is_empty());
        assert!(run.steps.is_empty());
        assert_eq!(run.status, JobStatus::Succeeded);
    }

    #[test]
    fn plan_lists_pending_steps() {
        let plan = Job::create("plan").add("true").add("false").plan();
        assert_eq!(plan.status, JobStatus::Pending);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].step, 2);
        assert_eq!(plan.steps[1].command, "false");
    }

    #[cfg(unix)]
    #[test]
    fn shell_true_true_true_runs_all() {
        let run = Job::create("trues")
            .add("true")
            .add("true")
            .add("true")
            .with_output(OutputMode::Capture)
            .run()
            .unwrap();
        assert_eq!(run.steps.len(), 3);
        assert!(run.steps.iter().all(|s| s.exit_code == 0));
    }

    #[cfg(unix)]
    #[test]
    fn shell_exit_code_is_reported() {
        let err = Job::create("exit")
            .add("exit 3")
            .with_output(OutputMode::Capture)
            .run()
            .unwrap_err();
        assert_eq!(err.details["exitCode"], 3);
        assert_eq!(err.details["command"], "exit 3");
        assert!(err.message.contains("exit 3"));
    }

    #[cfg(unix)]
    #[test]
    fn cd_does_not_leak_between_steps() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("sub")).unwrap();

        let run = Job::create("cwd")
            .add("cd sub\ntouch inside.txt")
            .add("touch outside.txt")
            .in_dir(base.path().display().to_string())
            .with_output(OutputMode::Capture)
            .run()
            .unwrap();

        assert_eq!(run.steps.len(), 2);
        assert!(base.path().join("sub/inside.txt").exists());
        assert!(base.path().join("outside.txt").exists());
        assert!(!base.path().join("sub/outside.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn multiline_command_status_is_the_last_line() {
        let run = Job::create("last-line")
            .add("false\ntrue")
            .with_output(OutputMode::Capture)
            .run()
            .unwrap();
        assert_eq!(run.steps[0].exit_code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn captured_stderr_lands_in_error_details() {
        let err = Job::create("stderr")
            .add("echo nope >&2; exit 1")
            .with_output(OutputMode::Capture)
            .run()
            .unwrap_err();
        assert_eq!(err.details["stderr"], "nope\n");
    }
}
