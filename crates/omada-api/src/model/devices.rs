// Device list view and the fields shared by every detailed device
//
// The controller reports a device's kind as a string tag ("ap", "switch",
// "gateway"). Detailed views (`Switch`, `AccessPoint`, `Gateway`) flatten
// `DeviceInfo` and add their own fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definitions::{DeviceStatus, DeviceStatusCategory, LinkSpeed, LinkStatus};
use super::raw::keeps_raw;

/// Device kind tag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Ap,
    Switch,
    Gateway,
    /// Any tag this client does not manage (olt, bridge, ...).
    #[serde(other)]
    Other,
}

impl DeviceType {
    /// Path segment of the device's detail resource, if it has one.
    pub fn resource_segment(self) -> Option<&'static str> {
        match self {
            Self::Ap => Some("eaps"),
            Self::Switch => Some("switches"),
            Self::Gateway => Some("gateways"),
            Self::Other => None,
        }
    }
}

/// Fields present on every device view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    /// Marketing model name including hardware revision.
    #[serde(default, rename = "showModel")]
    pub model_display_name: String,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub status_category: DeviceStatusCategory,
    #[serde(default, rename = "ip")]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub firmware_version: String,

    #[serde(default, rename = "uptime")]
    display_uptime: Option<String>,
    #[serde(default, rename = "uptimeLong")]
    uptime_secs: Option<u64>,
    #[serde(default, rename = "cpuUtil")]
    cpu_util: Option<u32>,
    #[serde(default, rename = "memUtil")]
    mem_util: Option<u32>,
}

impl DeviceInfo {
    pub fn is_connected(&self) -> bool {
        self.status_category == DeviceStatusCategory::Connected
    }

    fn when_connected<T>(&self, value: Option<T>) -> Option<T> {
        if self.is_connected() { value } else { None }
    }

    /// Human readable uptime, only while connected.
    pub fn display_uptime(&self) -> Option<&str> {
        self.when_connected(self.display_uptime.as_deref())
    }

    /// Uptime in seconds, only while connected.
    pub fn uptime(&self) -> Option<u64> {
        self.when_connected(self.uptime_secs)
    }

    /// CPU utilisation percentage, only while connected.
    pub fn cpu_usage(&self) -> Option<u32> {
        self.when_connected(self.cpu_util)
    }

    /// Memory utilisation percentage, only while connected.
    pub fn mem_usage(&self) -> Option<u32> {
        self.when_connected(self.mem_util)
    }

    /// Relative path of the device's detail resource, e.g. `switches/AA-BB-...`.
    pub fn resource_path(&self) -> Option<String> {
        self.device_type
            .resource_segment()
            .map(|segment| format!("{segment}/{}", self.mac))
    }
}

/// Entry of the site device list (`GET devices`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(flatten)]
    pub info: DeviceInfo,
    #[serde(default)]
    need_upgrade: bool,
    #[serde(default)]
    fw_download: bool,
    #[serde(skip)]
    raw: Value,
}

impl Device {
    /// A newer firmware is available (only reported while connected).
    pub fn need_upgrade(&self) -> bool {
        self.info.is_connected() && self.need_upgrade
    }

    /// A firmware download is in progress (only reported while connected).
    pub fn fw_download(&self) -> bool {
        self.info.is_connected() && self.fw_download
    }
}

/// Uplink or downlink connection to another device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default, alias = "uplinkMac")]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub port: u32,
    #[serde(default)]
    pub model: Option<String>,
}

/// Live status shared by switch and gateway ports.
pub trait PortStatus {
    fn link_status(&self) -> LinkStatus;
    fn link_speed(&self) -> LinkSpeed;
    fn bytes_tx(&self) -> u64;
    fn bytes_rx(&self) -> u64;
    /// Is the port powering a PoE device?
    fn poe_active(&self) -> bool;
}

/// Firmware state of a device (`GET devices/{mac}/firmware`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareUpdate {
    #[serde(rename = "curFwVer")]
    pub current_version: String,
    #[serde(default, rename = "lastFwVer")]
    pub latest_version: String,
    #[serde(default, rename = "fwReleaseLog")]
    pub release_notes: String,
    #[serde(skip)]
    raw: Value,
}

keeps_raw!(Device, FirmwareUpdate);

impl FirmwareUpdate {
    pub fn upgrade_available(&self) -> bool {
        !self.latest_version.is_empty() && self.latest_version != self.current_version
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn device(category: i64) -> Device {
        serde_json::from_value(json!({
            "type": "switch",
            "mac": "AA-BB-CC-DD-EE-01",
            "name": "Core",
            "model": "TL-SG3428",
            "showModel": "TL-SG3428 v2.0",
            "status": 14,
            "statusCategory": category,
            "ip": "10.0.0.2",
            "uptime": "3day(s) 2h 1m 5s",
            "uptimeLong": 266_465,
            "cpuUtil": 7,
            "memUtil": 41,
            "firmwareVersion": "2.0.0",
            "needUpgrade": true,
            "someFutureField": [1, 2],
        }))
        .unwrap()
    }

    #[test]
    fn connected_fields_visible_when_connected() {
        let d = device(1);
        assert_eq!(d.info.device_type, DeviceType::Switch);
        assert_eq!(d.info.uptime(), Some(266_465));
        assert_eq!(d.info.cpu_usage(), Some(7));
        assert!(d.need_upgrade());
        assert_eq!(
            d.info.resource_path().as_deref(),
            Some("switches/AA-BB-CC-DD-EE-01")
        );
    }

    #[test]
    fn connected_fields_hidden_when_disconnected() {
        let d = device(0);
        assert_eq!(d.info.uptime(), None);
        assert_eq!(d.info.mem_usage(), None);
        assert_eq!(d.info.display_uptime(), None);
        assert!(!d.need_upgrade());
    }

    #[test]
    fn unknown_device_type_has_no_resource() {
        let d: DeviceInfo =
            serde_json::from_value(json!({"type": "olt", "mac": "AA"})).unwrap();
        assert_eq!(d.device_type, DeviceType::Other);
        assert_eq!(d.resource_path(), None);
    }

    #[test]
    fn uplink_mac_alias() {
        let link: Link =
            serde_json::from_value(json!({"uplinkMac": "11-22", "name": "gw", "port": 3}))
                .unwrap();
        assert_eq!(link.mac.as_deref(), Some("11-22"));
    }
}
