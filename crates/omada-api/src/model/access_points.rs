use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definitions::LedSetting;
use super::devices::{DeviceInfo, Link};
use super::raw::{self, keeps_raw};

/// Configuration of one wired LAN port on an access point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointLanPortSettings {
    /// Port name, e.g. "ETH1".
    #[serde(rename = "lanPort")]
    pub port_name: String,
    #[serde(default)]
    pub support_vlan: bool,
    #[serde(default)]
    pub local_vlan_enable: bool,
    #[serde(default)]
    pub local_vlan_id: u16,
    #[serde(default)]
    pub support_poe: bool,
    /// PoE output enabled (only meaningful when `support_poe`).
    #[serde(default)]
    pub poe_out_enable: bool,
    #[serde(skip)]
    raw: Value,
}

/// Radio capabilities reported under `deviceMisc`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointCapabilities {
    #[serde(default)]
    pub support5g: bool,
    #[serde(default)]
    pub support5g2: bool,
    #[serde(default)]
    pub support6g: bool,
    #[serde(default)]
    pub support11ac: bool,
    #[serde(default)]
    pub support_mesh: bool,
}

/// Detailed access point view (`GET eaps/{mac}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    #[serde(flatten)]
    pub info: DeviceInfo,
    #[serde(default)]
    pub led_setting: LedSetting,
    /// Connected to the network over mesh rather than a cable.
    #[serde(default)]
    pub wireless_linked: bool,
    #[serde(default, rename = "deviceMisc")]
    pub capabilities: AccessPointCapabilities,
    #[serde(default, deserialize_with = "raw::list")]
    pub lan_port_settings: Vec<AccessPointLanPortSettings>,
    #[serde(default)]
    pub wired_uplink: Option<Link>,
    #[serde(skip)]
    raw: Value,
}

keeps_raw!(AccessPointLanPortSettings, AccessPoint);

impl AccessPoint {
    pub fn lan_port(&self, port_name: &str) -> Option<&AccessPointLanPortSettings> {
        self.lan_port_settings
            .iter()
            .find(|p| p.port_name == port_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lan_ports_and_capabilities() {
        let ap: AccessPoint = serde_json::from_value(json!({
            "type": "ap",
            "mac": "AA-BB",
            "ledSetting": 2,
            "wirelessLinked": false,
            "deviceMisc": {"support5g": true, "support6g": false, "supportMesh": true},
            "lanPortSettings": [
                {"lanPort": "ETH1", "supportVlan": true, "localVlanEnable": false,
                 "localVlanId": 1, "supportPoe": false, "poeOutEnable": false},
                {"lanPort": "ETH2", "supportVlan": true, "localVlanEnable": true,
                 "localVlanId": 30, "supportPoe": true, "poeOutEnable": true},
            ],
            "wiredUplink": {"mac": "11-22", "name": "Core", "port": 4},
        }))
        .unwrap();

        assert!(ap.capabilities.support5g);
        assert!(ap.capabilities.support_mesh);
        assert_eq!(ap.lan_port("ETH2").unwrap().local_vlan_id, 30);
        assert!(ap.lan_port("ETH9").is_none());
        assert_eq!(ap.wired_uplink.unwrap().port, 4);
    }
}
