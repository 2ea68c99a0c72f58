// Network client views
//
// A client is either wired or wireless; the controller says which through
// the `wireless` flag. Common fields live in `ClientInfo`, the kind-specific
// ones in `ClientKind`. List entries without the flag are skipped by the
// list operations, so `Client::from_value` returns `None` for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definitions::{AuthenticationStatus, ConnectType, RadioId, WifiMode};
use super::lenient;
use super::raw::keeps_raw;

/// Fields shared by every client view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub guest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block: Option<bool>,
    /// Milliseconds since the epoch.
    #[serde(default, rename = "lastSeen", skip_serializing_if = "Option::is_none")]
    last_seen_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
    /// Current throughput in bytes per second.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub activity: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub auth_status: AuthenticationStatus,
    #[serde(default)]
    pub connect_dev_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub connect_type: ConnectType,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub down_packet: u64,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub traffic_down: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub traffic_up: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub up_packet: u64,
    /// VLAN id.
    #[serde(default)]
    pub vid: Option<u32>,
}

impl ClientInfo {
    /// Name if set, otherwise the MAC address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.mac)
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.or(self.block).unwrap_or(false)
    }

    /// Seconds connected (`uptime` on live clients, `duration` on history).
    pub fn connection_time(&self) -> Option<u64> {
        self.uptime.or(self.duration)
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen_ms.and_then(DateTime::from_timestamp_millis)
    }
}

/// Wired-only fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiredClientInfo {
    #[serde(default)]
    pub dot1x_vlan: Option<u32>,
    #[serde(default)]
    pub gateway_mac: Option<String>,
    #[serde(default)]
    pub gateway_name: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub port: Option<u32>,
    #[serde(default)]
    pub switch_mac: Option<String>,
    #[serde(default)]
    pub switch_name: Option<String>,
}

/// Wireless-only fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessClientInfo {
    #[serde(default)]
    pub ap_mac: Option<String>,
    #[serde(default)]
    pub ap_name: Option<String>,
    #[serde(default)]
    pub channel: Option<u32>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub power_save: bool,
    #[serde(default)]
    pub radio_id: Option<RadioId>,
    #[serde(default)]
    pub rssi: Option<i32>,
    /// Kbit/s.
    #[serde(default)]
    pub rx_rate: Option<u64>,
    #[serde(default)]
    pub signal_level: Option<u32>,
    #[serde(default)]
    pub signal_rank: Option<u32>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub tx_rate: Option<u64>,
    #[serde(default)]
    pub wifi_mode: Option<WifiMode>,
}

/// Wired or wireless specifics.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ClientKind {
    Wired(WiredClientInfo),
    Wireless(WirelessClientInfo),
}

impl ClientKind {
    /// Select the variant from the `wireless` flag; `None` when it is absent.
    fn from_flag(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        match value.get("wireless").and_then(Value::as_bool) {
            Some(true) => WirelessClientInfo::deserialize(value).map(|w| Some(Self::Wireless(w))),
            Some(false) => WiredClientInfo::deserialize(value).map(|w| Some(Self::Wired(w))),
            None => Ok(None),
        }
    }

    pub fn is_wireless(&self) -> bool {
        matches!(self, Self::Wireless(_))
    }
}

/// Client as returned by the client list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    #[serde(flatten)]
    pub info: ClientInfo,
    #[serde(flatten)]
    pub kind: ClientKind,
    #[serde(skip)]
    raw: Value,
}

impl Client {
    /// Parse a list entry; `None` when the entry has no `wireless` flag.
    pub fn from_value(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        let Some(kind) = ClientKind::from_flag(value)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            info: ClientInfo::deserialize(value)?,
            kind,
            raw: value.clone(),
        }))
    }
}

/// Reserved-address state of a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpSetting {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub use_fixed_addr: bool,
    #[serde(default)]
    pub net_id: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Per-client bandwidth limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enable: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub down_enable: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub down_limit: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub down_unit: u32,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub up_enable: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub up_limit: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub up_unit: u32,
}

/// Fields only present on the single-client detail view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetailFields {
    #[serde(default)]
    pub device_category: Option<String>,
    #[serde(default)]
    pub ip_setting: Option<IpSetting>,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<RateLimit>,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// Client as returned by `GET clients/{mac}`.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetails {
    #[serde(flatten)]
    pub info: ClientInfo,
    #[serde(flatten)]
    pub details: ClientDetailFields,
    #[serde(flatten)]
    pub kind: ClientKind,
    #[serde(skip)]
    raw: Value,
}

keeps_raw!(Client, ClientDetails);

impl ClientDetails {
    /// Parse a detail response. A missing `wireless` flag reads as wired.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let kind = match ClientKind::from_flag(value)? {
            Some(kind) => kind,
            None => ClientKind::Wired(WiredClientInfo::deserialize(value)?),
        };
        Ok(Self {
            info: ClientInfo::deserialize(value)?,
            details: ClientDetailFields::deserialize(value)?,
            kind,
            raw: value.clone(),
        })
    }

    pub fn uses_fixed_address(&self) -> bool {
        self.details
            .ip_setting
            .as_ref()
            .is_some_and(|s| s.use_fixed_addr)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::RawData;

    #[test]
    fn wireless_entry() {
        let value = json!({
            "mac": "AA-AA-AA-AA-AA-01",
            "name": "phone",
            "wireless": true,
            "active": true,
            "uptime": 120,
            "lastSeen": 1_700_000_000_000_i64,
            "connectType": 1,
            "ssid": "home",
            "apMac": "EA-P1",
            "radioId": 1,
            "wifiMode": 5,
            "rssi": -52,
            "powerSave": false,
        });
        let client = Client::from_value(&value).unwrap().unwrap();
        assert!(client.kind.is_wireless());
        assert_eq!(client.info.connection_time(), Some(120));
        assert_eq!(client.info.connect_type, ConnectType::Wireless);
        assert_eq!(
            client.info.last_seen().unwrap().timestamp(),
            1_700_000_000
        );
        match client.kind {
            ClientKind::Wireless(w) => {
                assert_eq!(w.ssid.as_deref(), Some("home"));
                assert_eq!(w.radio_id, Some(RadioId::Freq5_1));
            }
            ClientKind::Wired(_) => panic!("expected wireless"),
        }
    }

    #[test]
    fn explicit_nulls_read_as_defaults() {
        let value = json!({
            "mac": "AA-AA-AA-AA-AA-03",
            "wireless": false,
            "guest": null,
            "active": null,
            "activity": null,
            "authStatus": null,
            "connectType": null,
            "downPacket": null,
            "trafficDown": null,
            "trafficUp": null,
            "upPacket": null,
        });
        let client = Client::from_value(&value).unwrap().unwrap();
        assert_eq!(client.raw_data(), &value);
        assert!(!client.info.guest);
        assert!(!client.info.active);
        assert_eq!(client.info.traffic_down, 0);
        assert_eq!(client.info.up_packet, 0);
        assert_eq!(client.info.connect_type, ConnectType::default());
    }

    #[test]
    fn wired_entry_uses_duration_and_block() {
        let value = json!({
            "mac": "AA-AA-AA-AA-AA-02",
            "wireless": false,
            "duration": 300,
            "block": true,
            "switchMac": "SW-01",
            "port": 7,
        });
        let client = Client::from_value(&value).unwrap().unwrap();
        assert!(client.info.is_blocked());
        assert_eq!(client.info.connection_time(), Some(300));
        assert_eq!(client.info.display_name(), "AA-AA-AA-AA-AA-02");
        match client.kind {
            ClientKind::Wired(w) => assert_eq!(w.port, Some(7)),
            ClientKind::Wireless(_) => panic!("expected wired"),
        }
    }

    #[test]
    fn entry_without_flag_is_skipped() {
        let value = json!({"mac": "AA-AA-AA-AA-AA-03", "wireless": null});
        assert!(Client::from_value(&value).unwrap().is_none());
    }

    #[test]
    fn details_default_to_wired() {
        let value = json!({
            "mac": "AA-AA-AA-AA-AA-04",
            "ipSetting": {"useFixedAddr": true, "netId": "net1", "ip": "10.0.0.9"},
            "vendor": "Raspberry Pi",
        });
        let details = ClientDetails::from_value(&value).unwrap();
        assert!(!details.kind.is_wireless());
        assert!(details.uses_fixed_address());
        assert_eq!(details.details.vendor.as_deref(), Some("Raspberry Pi"));
    }
}
