//! The one-time notice sent when a committee closes.
//!
//! Delivery is fire-and-forget: the committee logs a failed delivery and
//! carries on closing. Whether notices are sent at all is decided by
//! configuration, which picks the notifier injected at startup.

use std::process::{Command, Stdio};

use log::{debug, info};

use crate::metrics::format_duration;

/// Errors that can occur delivering a notice.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

/// What the committee reports when it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub church_name: String,
    pub elapsed_seconds: u64,
}

impl CompletionNotice {
    /// Human-readable one-liner, e.g. `Central - Duration: 1h 2min 3s (3723s)`.
    pub fn message(&self) -> String {
        format!(
            "{} - Duration: {} ({}s)",
            self.church_name,
            format_duration(self.elapsed_seconds),
            self.elapsed_seconds
        )
    }
}

/// Delivers completion notices somewhere outside the process.
pub trait Notifier {
    fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError>;
}

/// Drops every notice. Used when notices are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
        debug!("notices disabled, dropping: {}", notice.message());
        Ok(())
    }
}

/// Posts the notice message as a single form field to an HTTP endpoint,
/// by running `curl`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    endpoint: String,
    field: String,
}

impl CommandNotifier {
    pub fn new(endpoint: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            program: "curl".to_string(),
            endpoint: endpoint.into(),
            field: field.into(),
        }
    }

    /// Uses a different program with curl-compatible arguments.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self, notice: &CompletionNotice) -> Vec<String> {
        vec![
            "--silent".to_string(),
            "--show-error".to_string(),
            "--fail".to_string(),
            "--max-time".to_string(),
            "10".to_string(),
            "--data-urlencode".to_string(),
            format!("{}={}", self.field, notice.message()),
            self.endpoint.clone(),
        ]
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
        if notice.church_name.trim().is_empty() {
            debug!("no church name, skipping completion notice");
            return Ok(());
        }

        let status = Command::new(&self.program)
            .args(self.args(notice))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| NotifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(NotifyError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        info!("completion notice sent: {}", notice.message());
        Ok(())
    }
}
