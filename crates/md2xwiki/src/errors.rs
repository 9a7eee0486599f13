//! Error types and actionable error formatting.
//!
//! `ConvertError` is the typed error returned by the library. For display,
//! it converts into an `ActionableError` (message, possible causes, remedies)
//! or a `JsonError` envelope under `--json`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::output::{ErrorCode, ExitCode, JsonError};

/// Errors raised while converting a directory of documents
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input location is missing or not a directory
    #[error("Input directory '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },

    /// Reading, writing or listing a file failed
    #[error("Failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file could not be read or parsed
    #[error("Invalid config file '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// No XWiki space was supplied on the command line or in the config
    #[error("No XWiki space given")]
    MissingSpace,

    /// Per-file progress could not be written
    #[error("Failed to print progress: {source}")]
    Progress {
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// JSON error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ConvertError::InputNotFound { .. } => ErrorCode::INPUT_NOT_FOUND,
            ConvertError::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
                ErrorCode::PERMISSION_DENIED
            }
            ConvertError::Io { .. } | ConvertError::Progress { .. } => ErrorCode::IO_ERROR,
            ConvertError::Config { .. } => ErrorCode::CONFIG_ERROR,
            ConvertError::MissingSpace => ErrorCode::INVALID_ARGUMENT,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ErrorCode::to_exit_code(self.error_code())
    }

    /// Human-facing form with causes and remediation steps
    pub fn to_actionable(&self) -> ActionableError {
        let error = ActionableError::new(self.to_string());
        match self {
            ConvertError::InputNotFound { path } => error
                .with_cause("The path may be misspelled or relative to another directory")
                .with_remedy(format!(
                    "Check the directory exists: ls {}",
                    path.display()
                ))
                .with_remedy("Pass the Markdown folder explicitly: md2xwiki --input <dir>"),
            ConvertError::Io { path, .. } => error
                .with_cause("The file may be unreadable, not UTF-8, or on a read-only location")
                .with_remedy(format!("Check permissions on {}", path.display())),
            ConvertError::Config { path, .. } => error
                .with_cause("The file may not be valid TOML")
                .with_cause("A key may have the wrong type (e.g. extensions must be a list)")
                .with_remedy(format!("Fix or remove {}", path.display())),
            ConvertError::MissingSpace => error
                .with_remedy("Pass the target space: md2xwiki --space <SPACE>")
                .with_remedy("Or set `space` under [conversion] in md2xwiki.toml"),
            ConvertError::Progress { .. } => error
                .with_cause("Standard output may be closed or on a full device")
                .with_remedy("Rerun with --quiet to skip per-file progress"),
        }
    }

    /// JSON envelope for this error
    pub fn to_json_error(&self, command: &str) -> JsonError {
        let actionable = self.to_actionable();
        let json_error = JsonError::new(self.error_code(), self.to_string(), command)
            .with_suggestions(actionable.remediation.clone());

        match self {
            ConvertError::InputNotFound { path }
            | ConvertError::Io { path, .. }
            | ConvertError::Config { path, .. } => json_error
                .with_details(serde_json::json!({"path": path.display().to_string()})),
            ConvertError::MissingSpace | ConvertError::Progress { .. } => json_error,
        }
    }
}

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use md2xwiki::errors::ActionableError;
///
/// let error = ActionableError::new("Input directory 'docs' does not exist")
///     .with_cause("The path may be misspelled")
///     .with_remedy("Pass the folder explicitly: md2xwiki --input <dir>");
///
/// assert!(error.to_error_message().contains("To fix:"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    /// The main error message
    error: String,
    /// Possible causes (diagnostic hints)
    causes: Vec<String>,
    /// Remediation steps (how to fix)
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}
