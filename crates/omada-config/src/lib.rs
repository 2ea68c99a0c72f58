//! Named Omada controller targets.
//!
//! A target bundles a controller URL, login and site name under a short
//! name so the CLI can be pointed at it with `--target`. Targets live in a
//! TOML file in the platform config directory; one of them may be marked
//! as the default.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use omada_api::{ConnectionConfig, Credentials, OmadaClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Site selected when a target doesn't name one.
pub const DEFAULT_SITE: &str = "Default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No target specified, and no default target has been configured.")]
    NoDefaultTarget,

    #[error("Could not find target named '{name}'")]
    UnknownTarget { name: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] omada_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Target used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,

    /// Named controller targets.
    #[serde(default)]
    pub targets: BTreeMap<String, Target>,
}

/// One controller + site the CLI can talk to.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Target {
    pub url: String,
    pub username: String,
    /// Stored in plaintext.
    pub password: String,
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_site() -> String {
    DEFAULT_SITE.into()
}

fn default_verify_ssl() -> bool {
    true
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("site", &self.site)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

impl Target {
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            site: default_site(),
            verify_ssl: true,
        }
    }

    /// Connection settings for this target.
    pub fn connection_config(&self) -> ConnectionConfig {
        let transport = TransportConfig {
            tls: TlsMode::from_verify(self.verify_ssl),
            ..TransportConfig::default()
        };
        ConnectionConfig::new(
            self.url.clone(),
            Credentials::new(self.username.clone(), SecretString::from(self.password.clone())),
        )
        .with_transport(transport)
    }

    /// Build a client for this target. No request is made.
    pub fn to_client(&self) -> Result<OmadaClient, ConfigError> {
        Ok(OmadaClient::new(self.connection_config())?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "username".into(),
                reason: "must not be empty".into(),
            });
        }
        omada_api::auth::normalize_controller_url(&self.url).map_err(|e| {
            ConfigError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            }
        })?;
        Ok(())
    }
}

impl Config {
    /// Look up a target. An empty name selects the default target.
    pub fn target(&self, name: &str) -> Result<&Target, ConfigError> {
        let name = self.resolve_name(name)?;
        self.targets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTarget { name: name.into() })
    }

    /// The name `target` would look up.
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> Result<&'a str, ConfigError> {
        if !name.is_empty() {
            return Ok(name);
        }
        self.default_target
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(ConfigError::NoDefaultTarget)
    }

    /// Add or replace a target, optionally making it the default.
    pub fn set_target(
        &mut self,
        name: &str,
        target: Target,
        set_default: bool,
    ) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "name".into(),
                reason: "must not be empty".into(),
            });
        }
        target.validate()?;
        self.targets.insert(name.to_owned(), target);
        if set_default {
            self.default_target = Some(name.to_owned());
        }
        Ok(())
    }

    /// Remove a target. Deleting the default target clears the default.
    pub fn delete_target(&mut self, name: &str) -> Result<Target, ConfigError> {
        let removed = self
            .targets
            .remove(name)
            .ok_or_else(|| ConfigError::UnknownTarget { name: name.into() })?;
        if self.default_target.as_deref() == Some(name) {
            self.default_target = None;
        }
        Ok(removed)
    }

    pub fn set_default(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.targets.contains_key(name) {
            return Err(ConfigError::UnknownTarget { name: name.into() });
        }
        self.default_target = Some(name.to_owned());
        Ok(())
    }

    /// All targets in name order, flagged when they are the default.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &Target, bool)> {
        self.targets.iter().map(|(name, target)| {
            let is_default = self.default_target.as_deref() == Some(name.as_str());
            (name.as_str(), target, is_default)
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "omada-rs", "omada").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("omada");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from the canonical path plus `OMADA_*` environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields an empty config.
///
/// Environment overrides use `__` as the key separator, e.g.
/// `OMADA_DEFAULT_TARGET=lab` or `OMADA_TARGETS__LAB__SITE=Office`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OMADA_").split("__"))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), targets = cfg.targets.len(), "saved config");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lab() -> Target {
        Target::new("https://10.0.0.2:8043", "admin", "secret")
    }

    #[test]
    fn empty_name_selects_default() {
        let mut cfg = Config::default();
        cfg.set_target("lab", lab(), true).unwrap();
        cfg.set_target("home", Target::new("omada.home", "me", "pw"), false)
            .unwrap();

        assert_eq!(cfg.target("").unwrap().url, "https://10.0.0.2:8043");
        assert_eq!(cfg.target("home").unwrap().url, "omada.home");
    }

    #[test]
    fn missing_default_is_an_error() {
        let mut cfg = Config::default();
        cfg.set_target("lab", lab(), false).unwrap();
        assert!(matches!(cfg.target(""), Err(ConfigError::NoDefaultTarget)));
        assert!(matches!(
            cfg.target("office"),
            Err(ConfigError::UnknownTarget { name }) if name == "office"
        ));
    }

    #[test]
    fn deleting_default_clears_it() {
        let mut cfg = Config::default();
        cfg.set_target("lab", lab(), true).unwrap();
        let removed = cfg.delete_target("lab").unwrap();
        assert_eq!(removed.username, "admin");
        assert!(cfg.default_target.is_none());
        assert!(cfg.delete_target("lab").is_err());
    }

    #[test]
    fn set_default_requires_known_target() {
        let mut cfg = Config::default();
        assert!(cfg.set_default("lab").is_err());
        cfg.set_target("lab", lab(), false).unwrap();
        cfg.set_default("lab").unwrap();
        assert_eq!(cfg.default_target.as_deref(), Some("lab"));
    }

    #[test]
    fn listing_flags_default() {
        let mut cfg = Config::default();
        cfg.set_target("b", lab(), false).unwrap();
        cfg.set_target("a", lab(), true).unwrap();
        let listed: Vec<_> = cfg.targets().map(|(n, _, d)| (n, d)).collect();
        assert_eq!(listed, vec![("a", true), ("b", false)]);
    }

    #[test]
    fn rejects_bad_targets() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_target("lab", Target::new("ftp://x", "admin", "pw"), false),
            Err(ConfigError::Validation { field, .. }) if field == "url"
        ));
        assert!(cfg.set_target("lab", Target::new("host", "", "pw"), false).is_err());
        assert!(cfg.set_target("", lab(), false).is_err());
        assert!(cfg.targets.is_empty());
    }

    #[test]
    fn debug_redacts_password() {
        assert!(!format!("{:?}", lab()).contains("secret"));
    }

    #[test]
    fn client_follows_verify_flag() {
        let mut target = lab();
        target.verify_ssl = false;
        let client = target.to_client().unwrap();
        assert!(!client.verify_ssl());
    }
}
