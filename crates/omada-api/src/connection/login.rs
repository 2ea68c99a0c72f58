// Controller login and session validation
//
// Login is two steps: an unauthenticated `GET /api/info` to learn the
// controller id and version, then `POST /{id}/api/v2/login` for the CSRF
// token. A confirmed login is trusted for the freshness window; after that
// `loginStatus` is asked before the next authenticated request.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{ApiConnection, ControllerIdentity, Payload, controller_path, decode, write};
use crate::error::Error;
use crate::model::ControllerInfo;
use crate::version::ControllerVersion;

#[derive(Deserialize)]
struct LoginResult {
    token: String,
}

impl ApiConnection {
    /// Log in and return the controller id.
    ///
    /// Serialised with every implicit re-login, so concurrent callers never
    /// run two logins at once.
    pub async fn login(&self) -> Result<String, Error> {
        let _guard = self.login_lock.lock().await;
        self.login_locked().await
    }

    /// Unauthenticated controller identity lookup: `GET {base}/api/info`.
    pub async fn controller_info(&self) -> Result<ControllerInfo, Error> {
        let url = self.join("/api/info")?;
        let value = self.send(Method::GET, url, &[], Payload::Empty).await?;
        decode(&value)
    }

    async fn login_locked(&self) -> Result<String, Error> {
        let info = self.controller_info().await?;
        let version: ControllerVersion = info.controller_version.parse()?;
        if !version.is_supported() {
            return Err(Error::UnsupportedControllerVersion {
                version: info.controller_version,
            });
        }
        debug!(%version, controller_id = %info.controller_id, "controller identified");

        let url = self.join(&controller_path(&info.controller_id, "login", None))?;
        let body = json!({
            "username": self.credentials.username,
            "password": self.credentials.password.expose_secret(),
        });
        debug!("logging in at {}", url);

        let value = self
            .send(Method::POST, url, &[], Payload::Json(&body))
            .await?;
        let result: LoginResult = decode(&value)?;

        // Identity and token are committed together, only after a successful login.
        *write(&self.controller) = Some(ControllerIdentity {
            id: info.controller_id.clone(),
            version,
        });
        self.store_session(result.token);

        debug!("login successful");
        Ok(info.controller_id)
    }

    /// Whether the current login can be used.
    ///
    /// No token means no. A token confirmed inside the freshness window is
    /// trusted without a network call. Older tokens are checked with
    /// `loginStatus`; a positive answer restarts the window, anything else
    /// (including a failed check) drops the token.
    pub async fn check_login(&self) -> bool {
        let Some(confirmed_at) = self.session_confirmed_at() else {
            return false;
        };
        if self.clock.now() - confirmed_at < self.login_freshness {
            return true;
        }

        debug!("login confirmation expired, asking controller");
        match self.login_status().await {
            Ok(true) => {
                self.touch_session();
                true
            }
            Ok(false) => {
                debug!("controller reports the session is logged out");
                self.clear_session();
                false
            }
            Err(e) => {
                debug!("login status check failed: {e}");
                self.clear_session();
                false
            }
        }
    }

    async fn login_status(&self) -> Result<bool, Error> {
        let url = self.format_url("loginStatus", None)?;
        let value = self.send(Method::GET, url, &[], Payload::Empty).await?;
        Ok(value.get("login").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Make sure a usable login exists before an authenticated request.
    pub(crate) async fn ensure_login(&self) -> Result<(), Error> {
        if self.check_login().await {
            return Ok(());
        }

        let _guard = self.login_lock.lock().await;
        // Another task may have logged in while this one waited.
        if self.has_fresh_session() {
            return Ok(());
        }
        debug!("not logged in, logging in");
        self.login_locked().await.map(drop)
    }
}
