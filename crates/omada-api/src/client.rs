// Controller-wide operations and site client construction

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::auth::ConnectionConfig;
use crate::connection::ApiConnection;
use crate::error::Error;
use crate::model::controller::CurrentUser;
use crate::model::{InterfaceDetails, RebootResult, Site};
use crate::site::OmadaSiteClient;

const CERTIFICATE_CONTENT_TYPE: &str = "application/x-pkcs12";

/// A site given by display name or as already listed by [`OmadaClient::get_sites`].
#[derive(Debug, Clone, Copy)]
pub enum SiteRef<'a> {
    Name(&'a str),
    Site(&'a Site),
}

impl<'a> From<&'a str> for SiteRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for SiteRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a Site> for SiteRef<'a> {
    fn from(site: &'a Site) -> Self {
        Self::Site(site)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedCertificate {
    cert_id: String,
}

/// Client for an Omada SDN controller.
///
/// Logging in is optional: every call logs in on demand. Site-scoped
/// operations are reached through [`OmadaClient::get_site_client`].
#[derive(Debug, Clone)]
pub struct OmadaClient {
    api: Arc<ApiConnection>,
}

impl OmadaClient {
    /// Create a client that owns its HTTP session.
    pub fn new(config: ConnectionConfig) -> Result<Self, Error> {
        Ok(Self::from_connection(ApiConnection::new(config)?))
    }

    /// Create a client over a caller-supplied HTTP client, which must have a
    /// cookie store. The caller keeps ownership of it.
    pub fn with_http_client(config: ConnectionConfig, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::from_connection(ApiConnection::with_client(config, http)?))
    }

    pub fn from_connection(api: ApiConnection) -> Self {
        Self { api: Arc::new(api) }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &ApiConnection {
        &self.api
    }

    /// Log in and return the controller id.
    ///
    /// Useful to check connectivity and credentials up front.
    pub async fn login(&self) -> Result<String, Error> {
        self.api.login().await
    }

    /// Run `f` inside a session: log in first, then release the session
    /// afterwards whether `f` succeeds or not.
    ///
    /// A session this client created is closed on exit; a caller-supplied
    /// HTTP client is left alone.
    pub async fn with_session<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: AsyncFnOnce(&Self) -> Result<T, E>,
        E: From<Error>,
    {
        if let Err(e) = self.api.login().await {
            self.api.release();
            return Err(e.into());
        }
        let result = f(self).await;
        self.api.release();
        result
    }

    /// Close the session. Every later call fails with [`Error::Closed`].
    pub fn close(&self) {
        self.api.close();
    }

    /// Display name of the controller.
    ///
    /// `GET maintenance/uiInterface`
    pub async fn get_controller_name(&self) -> Result<String, Error> {
        let url = self.api.url("maintenance/uiInterface", None).await?;
        let details: InterfaceDetails = self.api.get(url, &[]).await?;
        Ok(details.controller_name)
    }

    /// Sites the logged-in user can manage.
    ///
    /// `GET users/current`
    pub async fn get_sites(&self) -> Result<Vec<Site>, Error> {
        let url = self.api.url("users/current", None).await?;
        let user: CurrentUser = self.api.get(url, &[]).await?;
        Ok(user.privilege.sites)
    }

    /// Client for one site. A name is resolved through [`Self::get_sites`].
    pub async fn get_site_client<'a>(
        &self,
        site: impl Into<SiteRef<'a>>,
    ) -> Result<OmadaSiteClient, Error> {
        let site_id = match site.into() {
            SiteRef::Site(site) => site.id.clone(),
            SiteRef::Name(name) => self
                .get_sites()
                .await?
                .into_iter()
                .find(|s| s.name == name)
                .map(|s| s.id)
                .ok_or_else(|| Error::SiteNotFound {
                    name: name.to_owned(),
                })?,
        };
        Ok(OmadaSiteClient::new(Arc::clone(&self.api), site_id))
    }

    /// Reboot the controller and return the expected downtime in seconds.
    ///
    /// `POST cmd/reboot`
    pub async fn reboot(&self) -> Result<u64, Error> {
        let url = self.api.url("cmd/reboot", None).await?;
        let result: RebootResult = self.api.post(url, None).await?;
        Ok(result.reboot_time)
    }

    /// Upload a PKCS#12 certificate and enable it for the controller's web
    /// interface. Returns the certificate id. Takes effect after a reboot.
    pub async fn set_certificate(
        &self,
        path: &Path,
        password: &SecretString,
    ) -> Result<String, Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "certificate.pfx".to_owned(), |n| n.to_string_lossy().into_owned());
        debug!(%file_name, size = bytes.len(), "uploading controller certificate");

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(CERTIFICATE_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let url = self.api.url("files/controller/certificate", None).await?;
        let uploaded: UploadedCertificate = self.api.upload(url, form).await?;

        let url = self.api.url("controller/setting", None).await?;
        let payload = json!({
            "certificate": {
                "certId": uploaded.cert_id,
                "certName": file_name,
                "enable": true,
                "keyPassword": password.expose_secret(),
            }
        });
        let _: Value = self.api.patch(url, &payload).await?;
        Ok(uploaded.cert_id)
    }

    /// Whether TLS certificates are verified.
    pub fn verify_ssl(&self) -> bool {
        self.api.verify_ssl()
    }

    pub fn set_verify_ssl(&self, verify: bool) -> Result<(), Error> {
        self.api.set_verify_ssl(verify)
    }
}
