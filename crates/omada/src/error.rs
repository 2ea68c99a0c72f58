//! CLI error types with miette diagnostics.
//!
//! Maps `omada_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use omada_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(omada::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Self-signed certificates need: omada target <name> --no-verify-ssl"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid controller URL '{url}': {reason}")]
    #[diagnostic(code(omada::bad_url))]
    BadUrl { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(omada::auth_failed),
        help("Update the stored credentials with: omada target <name> --username <user> --password <pass>")
    )]
    AuthFailed { message: String },

    #[error("Controller version {version} is not supported")]
    #[diagnostic(
        code(omada::unsupported_version),
        help("Omada controller 5.1.0 or later is required.")
    )]
    UnsupportedVersion { version: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(omada::not_found),
        help("Run: omada {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Site '{name}' not found on the controller")]
    #[diagnostic(
        code(omada::site_not_found),
        help("Site names are case-sensitive. Change it with: omada target <name> --site <site>")
    )]
    SiteNotFound { name: String },

    #[error("{message}")]
    #[diagnostic(code(omada::invalid_device))]
    InvalidDevice { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller error ({code}): {message}")]
    #[diagnostic(code(omada::api_error))]
    Api { code: i64, message: String },

    #[error(transparent)]
    #[diagnostic(code(omada::client))]
    Client(omada_api::Error),

    // ── Configuration ────────────────────────────────────────────────
    #[error("No target specified, and no default target has been configured")]
    #[diagnostic(
        code(omada::no_target),
        help(
            "Add one with: omada target <name> --url <url> --username <user> --set-default\n\
             Or pick one with --target."
        )
    )]
    NoTarget,

    #[error("Target '{name}' not found in configuration")]
    #[diagnostic(code(omada::target_not_found), help("Run: omada targets"))]
    TargetNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(omada::config))]
    Config(ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(omada::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(omada::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::SiteNotFound { .. } | Self::TargetNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::UnsupportedVersion { .. } => exit_code::UNSUPPORTED,
            Self::BadUrl { .. }
            | Self::Validation { .. }
            | Self::NoTarget
            | Self::InvalidDevice { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

// ── omada_api::Error → CliError mapping ──────────────────────────────

impl From<omada_api::Error> for CliError {
    fn from(err: omada_api::Error) -> Self {
        use omada_api::Error as E;

        match err {
            E::ConnectionFailed { url, source } => Self::ConnectionFailed {
                url,
                source: source.into(),
            },
            E::BadControllerUrl { url, reason } => Self::BadUrl { url, reason },
            E::LoginFailed { message, .. } => Self::AuthFailed { message },
            E::LoginSessionClosed => Self::AuthFailed {
                message: "the controller closed the login session".into(),
            },
            E::UnsupportedControllerVersion { version } => Self::UnsupportedVersion { version },
            E::SiteNotFound { name } => Self::SiteNotFound { name },
            E::InvalidDevice { message } => Self::InvalidDevice { message },
            E::RequestFailed { code, message } => Self::Api { code, message },
            other => Self::Client(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoDefaultTarget => Self::NoTarget,
            ConfigError::UnknownTarget { name } => Self::TargetNotFound { name },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Api(api) => api.into(),
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failures_are_auth_errors() {
        let err = CliError::from(omada_api::Error::LoginFailed {
            code: -30109,
            message: "Invalid username or password.".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn missing_default_target_is_usage_error() {
        let err = CliError::from(ConfigError::NoDefaultTarget);
        assert!(matches!(err, CliError::NoTarget));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn request_failures_keep_controller_code() {
        let err = CliError::from(omada_api::Error::RequestFailed {
            code: -1001,
            message: "Invalid request parameters.".into(),
        });
        assert!(matches!(err, CliError::Api { code: -1001, .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn site_lookup_failure_is_not_found() {
        let err = CliError::from(omada_api::Error::SiteNotFound {
            name: "Office".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().contains("Office"));
    }
}
