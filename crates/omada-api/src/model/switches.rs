// Switch, switch port and port profile views

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definitions::{
    BandwidthControl, Eth802Dot1X, LedSetting, LinkDuplex, LinkSpeed, LinkStatus,
    NetworkTagsSetting, PoeMode, PortType,
};
use super::devices::{DeviceInfo, Link, PortStatus};
use super::raw::keeps_raw;

/// Live status of one switch port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortStatus {
    #[serde(default)]
    pub link_status: LinkStatus,
    #[serde(default)]
    pub link_speed: LinkSpeed,
    /// PoE output active.
    #[serde(default)]
    pub poe: bool,
    /// PoE power draw in watts.
    #[serde(default)]
    pub poe_power: Option<f64>,
    #[serde(default)]
    pub tx: u64,
    #[serde(default)]
    pub rx: u64,
    #[serde(default)]
    pub stp_discarding: bool,
}

impl PortStatus for SwitchPortStatus {
    fn link_status(&self) -> LinkStatus {
        self.link_status
    }

    fn link_speed(&self) -> LinkSpeed {
        self.link_speed
    }

    fn bytes_tx(&self) -> u64 {
        self.tx
    }

    fn bytes_rx(&self) -> u64 {
        self.rx
    }

    fn poe_active(&self) -> bool {
        self.poe
    }
}

/// Port summary as embedded in a switch's `ports` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPort {
    pub port: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default, rename = "type")]
    pub port_type: PortType,
    /// "switching", "mirroring" or "aggregating".
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub disable: bool,
    #[serde(default)]
    pub port_status: SwitchPortStatus,
}

/// Profile-controllable settings, shared by port profiles and by ports
/// carrying their own overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortProfileSettings {
    #[serde(default)]
    pub poe: PoeMode,
    #[serde(default, rename = "bandWidthCtrlType")]
    pub bandwidth_control: BandwidthControl,
    #[serde(default)]
    pub dot1x: Eth802Dot1X,
    #[serde(default)]
    pub lldp_med_enable: bool,
    #[serde(default)]
    pub topo_notify_enable: bool,
    #[serde(default)]
    pub spanning_tree_enable: bool,
    #[serde(default)]
    pub loopback_detect_enable: bool,
    #[serde(default)]
    pub port_isolation_enable: bool,
    /// Only reported by newer controllers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eee_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_control_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loopback_detect_vlan_based_enable: Option<bool>,
}

/// Full configuration and status of one switch port
/// (`GET switches/{mac}/ports[/{port}]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortDetails {
    #[serde(flatten)]
    pub port: SwitchPort,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub max_speed: LinkSpeed,
    #[serde(default)]
    pub link_speed: LinkSpeed,
    #[serde(default)]
    pub duplex: LinkDuplex,
    #[serde(default)]
    pub profile_name: String,
    #[serde(default, rename = "profileOverrideEnable")]
    pub has_profile_override: bool,
    /// Effective values when `has_profile_override` is set.
    #[serde(flatten)]
    pub settings: PortProfileSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_network_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_tags_setting: Option<NetworkTagsSetting>,
    #[serde(default, rename = "tagNetworkIds")]
    pub tagged_network_ids: Vec<String>,
    #[serde(default, rename = "untagNetworkIds")]
    pub untagged_network_ids: Vec<String>,
    /// Present only on ports that support a voice network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_network_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_network_id: Option<String>,
    #[serde(skip)]
    raw: Value,
}

impl SwitchPortDetails {
    pub fn has_voice_network(&self) -> bool {
        self.voice_network_enable.is_some()
    }
}

/// A named set of port settings (`GET setting/lan/profileSummary`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortProfile {
    pub id: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub settings: PortProfileSettings,
}

/// PoE capabilities of a switch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchDeviceCaps {
    #[serde(default)]
    pub poe_port_num: u32,
    #[serde(default)]
    pub poe_support: bool,
    /// 802.3bt support.
    #[serde(default)]
    pub support_bt: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwitchMisc {
    #[serde(default)]
    port_num: Option<u32>,
}

/// Detailed switch view (`GET switches/{mac}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    #[serde(flatten)]
    pub info: DeviceInfo,
    #[serde(default)]
    pub led_setting: LedSetting,
    #[serde(default)]
    port_num: Option<u32>,
    #[serde(default)]
    device_misc: SwitchMisc,
    #[serde(default)]
    pub ports: Vec<SwitchPort>,
    #[serde(default)]
    pub uplink: Option<Link>,
    #[serde(default, rename = "downlinkList")]
    pub downlinks: Vec<Link>,
    #[serde(default, rename = "devCap")]
    pub device_capabilities: SwitchDeviceCaps,
    #[serde(skip)]
    raw: Value,
}

keeps_raw!(SwitchPortDetails, Switch);

impl Switch {
    /// Number of ports, from `portNum` or `deviceMisc.portNum`.
    pub fn number_of_ports(&self) -> u32 {
        self.port_num
            .or(self.device_misc.port_num)
            .unwrap_or_else(|| u32::try_from(self.ports.len()).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn port_details_split_into_summary_and_settings() {
        let port: SwitchPortDetails = serde_json::from_value(json!({
            "id": "p1",
            "port": 5,
            "name": "Port5",
            "profileId": "prof-all",
            "profileName": "All",
            "type": 1,
            "operation": "switching",
            "disable": false,
            "maxSpeed": 3,
            "linkSpeed": 0,
            "duplex": 0,
            "profileOverrideEnable": true,
            "poe": 1,
            "bandWidthCtrlType": 0,
            "dot1x": 1,
            "lldpMedEnable": true,
            "topoNotifyEnable": false,
            "spanningTreeEnable": false,
            "loopbackDetectEnable": true,
            "portIsolationEnable": false,
            "portStatus": {"linkStatus": 1, "linkSpeed": 3, "poe": true, "poePower": 4.2,
                           "tx": 10, "rx": 20, "stpDiscarding": false},
        }))
        .unwrap();

        assert_eq!(port.port.port, 5);
        assert!(port.has_profile_override);
        assert_eq!(port.settings.poe, PoeMode::Enabled);
        assert!(port.settings.loopback_detect_enable);
        assert_eq!(port.settings.eee_enable, None);
        assert!(!port.has_voice_network());
        assert_eq!(port.port.port_status.link_speed(), LinkSpeed::Speed1Gbps);
        assert!(port.port.port_status.poe_active());
    }

    #[test]
    fn port_count_falls_back_to_device_misc() {
        let switch: Switch = serde_json::from_value(json!({
            "type": "switch",
            "mac": "AA",
            "deviceMisc": {"portNum": 10},
            "ports": [],
        }))
        .unwrap();
        assert_eq!(switch.number_of_ports(), 10);
    }

    #[test]
    fn profile_missing_poe_is_none() {
        let profile: PortProfile =
            serde_json::from_value(json!({"id": "x", "name": "Disable", "dot1x": 1})).unwrap();
        assert_eq!(profile.settings.poe, PoeMode::None);
    }
}
