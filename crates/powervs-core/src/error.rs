//! Error types for the PowerVS client.
//!
//! Every failure a tool call can hit is one variant here, so the MCP layer can
//! turn it into a readable tool error without inspecting strings.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the PowerVS client.
#[derive(Debug, Error)]
pub enum PowerVsError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Http {
        url: String,
        status: u16,
        /// Upstream error body, truncated
        body: Option<String>,
    },

    #[error("IAM authentication failed: {message}")]
    Auth { message: String },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configure CRN in config.yaml or the CRN environment variable to {operation}.")]
    WorkspaceNotConfigured { operation: String },

    // Inventory errors
    #[error("VM not found: {vm_id}")]
    VmNotFound { vm_id: String },

    #[error("No workspaces found")]
    NoWorkspaces,

    // Validation errors
    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for PowerVS operations.
pub type Result<T> = std::result::Result<T, PowerVsError>;

impl From<std::io::Error> for PowerVsError {
    fn from(err: std::io::Error) -> Self {
        PowerVsError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PowerVsError {
    fn from(err: serde_json::Error) -> Self {
        PowerVsError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for PowerVsError {
    fn from(err: serde_yaml::Error) -> Self {
        PowerVsError::Config {
            message: format!("invalid YAML: {}", err),
        }
    }
}

impl From<reqwest::Error> for PowerVsError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        if err.is_timeout() {
            PowerVsError::Timeout { url }
        } else if err.is_decode() {
            PowerVsError::Json {
                message: format!("Failed to decode response from {}: {}", url, err),
                source: None,
            }
        } else {
            PowerVsError::Network {
                message: format!("Request to {} failed", url),
                cause: Some(err.to_string()),
            }
        }
    }
}

impl PowerVsError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        PowerVsError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Shorthand for a missing workspace on `operation`.
    pub fn workspace_required(operation: impl Into<String>) -> Self {
        PowerVsError::WorkspaceNotConfigured {
            operation: operation.into(),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network, upstream HTTP or IAM failure
    /// - -32001: VM not found
    /// - -32002: Workspace not configured / no workspaces
    /// - -32005: Validation error
    ///
    /// Everything else maps to -32603 (internal error).
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            PowerVsError::Network { .. }
            | PowerVsError::Timeout { .. }
            | PowerVsError::Http { .. }
            | PowerVsError::Auth { .. } => -32000,

            PowerVsError::VmNotFound { .. } => -32001,

            PowerVsError::WorkspaceNotConfigured { .. } | PowerVsError::NoWorkspaces => -32002,

            PowerVsError::InvalidParams { .. } => -32005,

            _ => -32603,
        }
    }

    /// Whether the failure came from talking to IBM Cloud rather than from local state.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PowerVsError::Network { .. }
                | PowerVsError::Timeout { .. }
                | PowerVsError::Http { .. }
                | PowerVsError::Auth { .. }
        )
    }
}
