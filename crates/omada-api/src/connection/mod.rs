// Omada controller HTTP connection
//
// Owns the HTTP session, the controller identity learned at login and the
// CSRF token. Endpoint methods live on `OmadaClient` and `OmadaSiteClient`;
// this module handles URL construction, envelope unwrapping and error
// translation. Login and pagination are in the sibling files.

mod login;
mod pages;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

pub use pages::PAGE_SIZE;

use crate::auth::{ConnectionConfig, Credentials, host_is_ip, normalize_controller_url};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, LOGIN_ERROR_CODE};
use crate::model::raw::{KeepRaw, with_raw};
use crate::transport::{TlsMode, TransportConfig};
use crate::version::ControllerVersion;

/// Header carrying the token returned by `login`.
const CSRF_HEADER: &str = "Csrf-Token";

/// Who owns the underlying `reqwest::Client`.
enum HttpSession {
    /// Built by this connection; torn down by `close()` and scoped exit.
    Owned(reqwest::Client),
    /// Supplied by the caller; `close()` only detaches from it.
    External(reqwest::Client),
    Closed,
}

/// Token from the last successful login and when it was last confirmed.
///
/// Kept as one value so the token and its timestamp are always set and
/// cleared together.
#[derive(Debug, Clone)]
struct LoginSession {
    token: String,
    confirmed_at: DateTime<Utc>,
}

/// Controller identity discovered during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerIdentity {
    pub id: String,
    pub version: ControllerVersion,
}

/// Body of an outgoing request.
pub(crate) enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Multipart(reqwest::multipart::Form),
}

/// Authenticated connection to one Omada controller.
///
/// Every authenticated request first checks the login (trusting a
/// confirmation younger than the freshness window, otherwise asking
/// `loginStatus`) and logs in again when needed. Concurrent callers share a
/// single in-flight login.
pub struct ApiConnection {
    base_url: Url,
    credentials: Credentials,
    transport: RwLock<TransportConfig>,
    http: RwLock<HttpSession>,
    session: RwLock<Option<LoginSession>>,
    controller: RwLock<Option<ControllerIdentity>>,
    login_lock: tokio::sync::Mutex<()>,
    clock: Arc<dyn Clock>,
    login_freshness: TimeDelta,
}

impl ApiConnection {
    /// Create a connection that owns its HTTP client.
    ///
    /// A cookie jar is added to the transport if it has none; the
    /// controller issues a session cookie alongside the CSRF token.
    pub fn new(config: ConnectionConfig) -> Result<Self, Error> {
        let transport = if config.transport.cookie_jar.is_some() {
            config.transport.clone()
        } else {
            config.transport.clone().with_cookie_jar()
        };
        let http = transport.build_client()?;
        Self::assemble(config, transport, HttpSession::Owned(http))
    }

    /// Create a connection over a caller-supplied HTTP client.
    ///
    /// The client must carry its own cookie store. It is never torn down by
    /// this connection.
    pub fn with_client(config: ConnectionConfig, http: reqwest::Client) -> Result<Self, Error> {
        let transport = config.transport.clone();
        Self::assemble(config, transport, HttpSession::External(http))
    }

    fn assemble(
        config: ConnectionConfig,
        transport: TransportConfig,
        http: HttpSession,
    ) -> Result<Self, Error> {
        let base_url = normalize_controller_url(&config.url)?;
        debug!(
            host_is_ip = host_is_ip(&base_url),
            "opening connection to {base_url}"
        );
        Ok(Self {
            base_url,
            credentials: config.credentials,
            transport: RwLock::new(transport),
            http: RwLock::new(http),
            session: RwLock::new(None),
            controller: RwLock::new(None),
            login_lock: tokio::sync::Mutex::new(()),
            clock: Arc::new(SystemClock),
            login_freshness: config.login_freshness,
        })
    }

    /// Replace the time source used for the freshness window.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The normalised controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Username this connection logs in with.
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Controller id and version, known after the first login.
    pub fn controller_identity(&self) -> Option<ControllerIdentity> {
        read(&self.controller).clone()
    }

    /// Controller id (`omadacId`), known after the first login.
    pub fn controller_id(&self) -> Option<String> {
        read(&self.controller).as_ref().map(|c| c.id.clone())
    }

    /// Controller version, logging in first if it is not known yet.
    pub async fn controller_version(&self) -> Result<ControllerVersion, Error> {
        if let Some(identity) = self.controller_identity() {
            return Ok(identity.version);
        }
        self.ensure_login().await?;
        self.controller_identity()
            .map(|identity| identity.version)
            .ok_or(Error::NotLoggedIn)
    }

    // ── Session lifecycle ────────────────────────────────────────────

    fn http(&self) -> Result<reqwest::Client, Error> {
        match &*read(&self.http) {
            HttpSession::Owned(client) | HttpSession::External(client) => Ok(client.clone()),
            HttpSession::Closed => Err(Error::Closed),
        }
    }

    /// Whether the HTTP client was created by this connection.
    pub fn owns_session(&self) -> bool {
        matches!(*read(&self.http), HttpSession::Owned(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*read(&self.http), HttpSession::Closed)
    }

    /// Close the connection. Every later call fails with [`Error::Closed`].
    ///
    /// An owned HTTP client is dropped; a caller-supplied one is only
    /// detached and stays usable by its owner.
    pub fn close(&self) {
        let mut http = write(&self.http);
        match *http {
            HttpSession::Owned(_) => debug!("closing owned HTTP session"),
            HttpSession::External(_) => debug!("detaching from caller-supplied HTTP session"),
            HttpSession::Closed => return,
        }
        *http = HttpSession::Closed;
        *write(&self.session) = None;
    }

    /// Close only if this connection owns its HTTP client.
    pub(crate) fn release(&self) {
        if self.owns_session() {
            self.close();
        }
    }

    /// Whether TLS certificates are verified.
    pub fn verify_ssl(&self) -> bool {
        read(&self.transport).tls.verifies()
    }

    /// Switch TLS verification on or off.
    ///
    /// An owned client is rebuilt (sharing the cookie jar, so the session
    /// survives). A caller-supplied client cannot be reconfigured.
    pub fn set_verify_ssl(&self, verify: bool) -> Result<(), Error> {
        let mut http = write(&self.http);
        let transport = {
            let mut transport = write(&self.transport);
            if transport.tls.verifies() == verify {
                return Ok(());
            }
            *transport = transport.clone().with_tls(TlsMode::from_verify(verify));
            transport.clone()
        };

        match *http {
            HttpSession::Owned(_) => {
                debug!(verify, "rebuilding HTTP client for new TLS mode");
                *http = HttpSession::Owned(transport.build_client()?);
                Ok(())
            }
            HttpSession::External(_) => {
                warn!("TLS verification change has no effect on a caller-supplied HTTP client");
                Ok(())
            }
            HttpSession::Closed => Err(Error::Closed),
        }
    }

    // ── Login session state ──────────────────────────────────────────

    fn store_session(&self, token: String) {
        trace!("storing CSRF token");
        *write(&self.session) = Some(LoginSession {
            token,
            confirmed_at: self.clock.now(),
        });
    }

    fn touch_session(&self) {
        if let Some(session) = write(&self.session).as_mut() {
            session.confirmed_at = self.clock.now();
        }
    }

    fn clear_session(&self) {
        *write(&self.session) = None;
    }

    fn session_confirmed_at(&self) -> Option<DateTime<Utc>> {
        read(&self.session).as_ref().map(|s| s.confirmed_at)
    }

    /// A token exists and was confirmed inside the freshness window.
    fn has_fresh_session(&self) -> bool {
        self.session_confirmed_at()
            .is_some_and(|at| self.clock.now() - at < self.login_freshness)
    }

    fn apply_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match read(&self.session).as_ref() {
            Some(session) => builder.header(CSRF_HEADER, session.token.as_str()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn join(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|e| Error::BadControllerUrl {
            url: base.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Build a controller-scoped URL without touching the network.
    ///
    /// `/{controllerId}/api/v2/{endpoint}`, or
    /// `/{controllerId}/api/v2/sites/{site}/{endpoint}` when a site is given.
    /// Fails with [`Error::NotLoggedIn`] before the first login.
    pub fn format_url(&self, endpoint: &str, site: Option<&str>) -> Result<Url, Error> {
        let id = self.controller_id().ok_or(Error::NotLoggedIn)?;
        self.join(&controller_path(&id, endpoint, site))
    }

    /// Build a controller-scoped URL, logging in first if necessary.
    pub async fn url(&self, endpoint: &str, site: Option<&str>) -> Result<Url, Error> {
        self.ensure_login().await?;
        self.format_url(endpoint, site)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated request returning the unwrapped `result` value.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        json: Option<&Value>,
    ) -> Result<Value, Error> {
        self.ensure_login().await?;
        let payload = json.map_or(Payload::Empty, Payload::Json);
        self.send(method, url, query, payload).await
    }

    /// Authenticated GET decoded into `T`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let value = self.request(Method::GET, url, query, None).await?;
        decode(&value)
    }

    /// Authenticated GET of a view that keeps its payload.
    pub(crate) async fn get_view<T: DeserializeOwned + KeepRaw>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let value = self.request(Method::GET, url, query, None).await?;
        decode_view(&value)
    }

    /// Authenticated GET of a list whose entries each keep their own payload.
    pub(crate) async fn get_views<T: DeserializeOwned + KeepRaw>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let items: Vec<Value> = self.get(url, query).await?;
        items.iter().map(decode_view).collect()
    }

    /// Authenticated POST decoded into `T`.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T, Error> {
        let value = self.request(Method::POST, url, &[], body).await?;
        decode(&value)
    }

    /// Authenticated PATCH decoded into `T`.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &Value,
    ) -> Result<T, Error> {
        let value = self.request(Method::PATCH, url, &[], Some(body)).await?;
        decode(&value)
    }

    /// Authenticated multipart upload decoded into `T`.
    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        self.ensure_login().await?;
        let value = self
            .send(Method::POST, url, &[], Payload::Multipart(form))
            .await?;
        decode(&value)
    }

    /// Send one request with no login checks and translate the response.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        payload: Payload<'_>,
    ) -> Result<Value, Error> {
        let http = self.http()?;
        debug!("{} {}", method, url);

        let mut builder = http.request(method, url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        builder = self.apply_csrf(builder);
        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart(form) => builder.multipart(form),
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_send(&url, e))?;
        parse_response(resp).await
    }
}

impl std::fmt::Debug for ApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConnection")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username)
            .field("controller", &self.controller_identity())
            .finish_non_exhaustive()
    }
}

pub(crate) fn controller_path(id: &str, endpoint: &str, site: Option<&str>) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    match site {
        Some(site) => format!("/{id}/api/v2/sites/{site}/{endpoint}"),
        None => format!("/{id}/api/v2/{endpoint}"),
    }
}

/// Media types compare case-insensitively; parameters such as `charset` are ignored.
fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Translate an HTTP response into the unwrapped `result` value.
///
/// - non-200 with a JSON body: application error first, then a generic
///   `RequestFailed(status, "HTTP Request Error")`;
/// - 200 without a JSON body: the session was closed server-side;
/// - 200 with JSON: application error check, then `result` unwrapping.
async fn parse_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_media_type);

    if status != StatusCode::OK {
        if is_json {
            let body = resp.text().await?;
            if let Ok(content) = serde_json::from_str::<Value>(&body) {
                check_application_errors(&content)?;
            }
        }
        return Err(Error::RequestFailed {
            code: i64::from(status.as_u16()),
            message: "HTTP Request Error".into(),
        });
    }

    if !is_json {
        return Err(Error::LoginSessionClosed);
    }

    let body = resp.text().await?;
    let content: Value =
        serde_json::from_str(&body).map_err(|e| deserialization_error(&e, body.clone()))?;
    check_application_errors(&content)?;
    Ok(unwrap_result(content))
}

/// Inspect the `{errorCode, msg, result}` envelope.
pub(crate) fn check_application_errors(content: &Value) -> Result<(), Error> {
    let Some(envelope) = content.as_object() else {
        return Ok(());
    };

    let code = envelope.get("errorCode").and_then(|code| {
        code.as_i64()
            .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
    });
    let Some(code) = code else {
        return Err(Error::RequestFailed {
            code: LOGIN_ERROR_CODE,
            message: format!("Unexpected response: {content}"),
        });
    };

    if code == 0 {
        return Ok(());
    }

    let message = envelope
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    Err(Error::from_error_code(code, message))
}

/// Return `result` when the envelope carries one, else the whole body.
fn unwrap_result(content: Value) -> Value {
    match content {
        Value::Object(mut envelope) if envelope.contains_key("result") => {
            envelope.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode an unwrapped result into a typed view, keeping the body on failure.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| deserialization_error(&e, value.to_string()))
}

/// [`decode`] for views that keep the payload they were decoded from.
pub(crate) fn decode_view<T: DeserializeOwned + KeepRaw>(value: &Value) -> Result<T, Error> {
    with_raw(value).map_err(|e| deserialization_error(&e, value.to_string()))
}

pub(crate) fn deserialization_error(err: &serde_json::Error, body: String) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body,
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
