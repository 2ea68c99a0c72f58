use std::fmt;

use chrono::TimeDelta;
use secrecy::SecretString;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// How long a confirmed login is trusted before `loginStatus` is asked again.
pub const DEFAULT_LOGIN_FRESHNESS: TimeDelta = TimeDelta::hours(1);

/// Username/password pair for the controller's local login.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything needed to open a connection to one controller.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Controller URL as typed by the user; `https://` is assumed when no
    /// scheme is given.
    pub url: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
    pub login_freshness: TimeDelta,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
            transport: TransportConfig::default(),
            login_freshness: DEFAULT_LOGIN_FRESHNESS,
        }
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_login_freshness(mut self, window: TimeDelta) -> Self {
        self.login_freshness = window;
        self
    }
}

/// Normalise a controller URL: default the scheme to `https://` and drop
/// any trailing slash so endpoint paths can be appended directly.
pub fn normalize_controller_url(raw: &str) -> Result<Url, Error> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(with_scheme.trim_end_matches('/')).map_err(|e| {
        Error::BadControllerUrl {
            url: raw.to_owned(),
            reason: e.to_string(),
        }
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(Error::BadControllerUrl {
            url: raw.to_owned(),
            reason: "expected an http(s) URL with a host".into(),
        });
    }
    Ok(url)
}

/// Whether the controller is addressed by a bare IP literal.
pub(crate) fn host_is_ip(url: &Url) -> bool {
    matches!(url.host(), Some(url::Host::Ipv4(_) | url::Host::Ipv6(_)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scheme_defaults_to_https() {
        let url = normalize_controller_url("omada.local:8043").unwrap();
        assert_eq!(url.as_str(), "https://omada.local:8043/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = normalize_controller_url("http://10.0.0.2:8088/").unwrap();
        assert_eq!(url.scheme(), "http");
        assert!(host_is_ip(&url));
    }

    #[test]
    fn hostnames_are_not_ip() {
        let url = normalize_controller_url("https://controller.example").unwrap();
        assert!(!host_is_ip(&url));
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            normalize_controller_url("ftp://host"),
            Err(Error::BadControllerUrl { .. })
        ));
        assert!(matches!(
            normalize_controller_url("https://"),
            Err(Error::BadControllerUrl { .. })
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("admin", "hunter2".to_owned());
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
