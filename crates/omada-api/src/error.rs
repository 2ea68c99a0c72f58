use thiserror::Error;

/// Application error code the controller uses for "not logged in" and
/// for malformed responses.
pub const LOGIN_ERROR_CODE: i64 = -30109;

/// Top-level error type for the `omada-api` crate.
///
/// `LoginFailed` is a specialisation of `RequestFailed`: both carry the
/// controller's `errorCode` and message, and [`Error::is_request_failure`]
/// treats them alike.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection ──────────────────────────────────────────────────
    /// The controller URL could not be parsed or used.
    #[error("Bad controller URL '{url}': {reason}")]
    BadControllerUrl { url: String, reason: String },

    /// The controller could not be reached (refused, DNS, timeout).
    #[error("Unable to connect to Omada controller at {url}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A controller-scoped URL was requested before the first login.
    #[error("Not logged in to the Omada controller")]
    NotLoggedIn,

    /// The connection was closed; no further calls are permitted.
    #[error("Connection to the Omada controller has been closed")]
    Closed,

    // ── Controller responses ────────────────────────────────────────
    /// The controller answered with a non-zero `errorCode` or an HTTP error.
    #[error("Omada controller responded '{message}' ({code})")]
    RequestFailed { code: i64, message: String },

    /// The controller rejected the credentials or the session token.
    #[error("Omada controller responded '{message}' ({code})")]
    LoginFailed { code: i64, message: String },

    /// A 200 response without a JSON body: the session was closed server-side.
    #[error("Omada controller closed the login session")]
    LoginSessionClosed,

    /// The controller reports a version below the supported baseline.
    #[error("Unsupported Omada controller version {version} found.")]
    UnsupportedControllerVersion { version: String },

    // ── Lookups ─────────────────────────────────────────────────────
    /// No site with the given display name is visible to this account.
    #[error("Site '{name}' not found")]
    SiteNotFound { name: String },

    /// Wrong device type for the operation, or a missing device/port/profile.
    #[error("{message}")]
    InvalidDevice { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error while reading a response body.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS configuration error (bad CA file, client build failure).
    #[error("TLS error: {0}")]
    Tls(String),

    /// Local I/O error (reading a certificate file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    pub(crate) fn invalid_device(message: impl Into<String>) -> Self {
        Self::InvalidDevice {
            message: message.into(),
        }
    }

    /// Build the error for a non-zero application `errorCode`.
    pub(crate) fn from_error_code(code: i64, message: String) -> Self {
        if code == LOGIN_ERROR_CODE {
            Self::LoginFailed { code, message }
        } else {
            Self::RequestFailed { code, message }
        }
    }

    /// Map a reqwest send failure onto the connection taxonomy.
    pub(crate) fn from_send(url: &url::Url, err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::BadControllerUrl {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: url.to_string(),
                source: err,
            }
        } else {
            Self::RequestFailed {
                code: 0,
                message: format!("Unexpected error: {err}"),
            }
        }
    }

    /// Returns `true` for `RequestFailed` and its `LoginFailed` specialisation.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::LoginFailed { .. })
    }

    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::LoginFailed { .. } | Self::LoginSessionClosed | Self::NotLoggedIn
        )
    }

    /// The controller's application error code, if this error carries one.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::RequestFailed { code, .. } | Self::LoginFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_code_maps_to_login_failed() {
        let err = Error::from_error_code(LOGIN_ERROR_CODE, "Not logged in".into());
        assert!(matches!(err, Error::LoginFailed { .. }));
        assert!(err.is_request_failure());
        assert!(err.is_auth_expired());
        assert_eq!(err.error_code(), Some(LOGIN_ERROR_CODE));
    }

    #[test]
    fn other_codes_map_to_request_failed() {
        let err = Error::from_error_code(-1001, "Invalid request parameters".into());
        assert!(matches!(err, Error::RequestFailed { code: -1001, .. }));
        assert!(!err.is_auth_expired());
        assert_eq!(
            err.to_string(),
            "Omada controller responded 'Invalid request parameters' (-1001)"
        );
    }

    #[test]
    fn lookup_errors_have_no_code() {
        let err = Error::SiteNotFound {
            name: "Branch".into(),
        };
        assert_eq!(err.error_code(), None);
        assert_eq!(err.to_string(), "Site 'Branch' not found");
    }
}
