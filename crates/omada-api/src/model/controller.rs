use serde::{Deserialize, Serialize};

/// Unauthenticated controller identity (`GET /api/info`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInfo {
    #[serde(rename = "controllerVer")]
    pub controller_version: String,
    #[serde(rename = "omadacId")]
    pub controller_id: String,
    #[serde(default)]
    pub api_ver: Option<String>,
    #[serde(default)]
    pub configured: bool,
}

/// A site visible to the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Display name.
    pub name: String,
    /// Site key used in URLs.
    #[serde(rename = "key")]
    pub id: String,
}

/// `maintenance/uiInterface` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDetails {
    pub controller_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentUser {
    pub privilege: Privilege,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Privilege {
    #[serde(default)]
    pub sites: Vec<Site>,
}

/// `cmd/reboot` result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebootResult {
    /// Seconds the controller expects the reboot to take.
    pub reboot_time: u64,
}
