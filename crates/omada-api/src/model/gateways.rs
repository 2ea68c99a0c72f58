use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definitions::{
    GatewayPortMode, GatewayPortType, LedSetting, LinkDuplex, LinkSpeed, LinkStatus, PoeMode,
};
use super::devices::{DeviceInfo, PortStatus};
use super::lenient;
use super::raw::{self, keeps_raw};

/// IPv6 state of a WAN port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WanPortIpv6Config {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enable: bool,
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub internet_state: bool,
}

/// Live status of one gateway port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPortStatus {
    #[serde(rename = "port")]
    pub port_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    port_desc: Option<String>,
    #[serde(default, rename = "type")]
    pub port_type: GatewayPortType,
    #[serde(default)]
    pub mode: GatewayPortMode,
    #[serde(default)]
    pub status: LinkStatus,
    #[serde(default)]
    pub tx: u64,
    #[serde(default)]
    pub rx: u64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub poe: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub internet_state: bool,
    #[serde(default)]
    pub wan_port_ipv6_config: WanPortIpv6Config,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub online_detection: bool,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default = "default_port_speed")]
    pub speed: LinkSpeed,
    #[serde(default = "default_port_duplex")]
    pub duplex: LinkDuplex,
    /// WAN connection protocol ("dhcp", "pppoe", "static", ...).
    #[serde(default)]
    pub proto: Option<String>,
    #[serde(skip)]
    raw: Value,
}

fn default_port_speed() -> LinkSpeed {
    LinkSpeed::Speed10Mbps
}

fn default_port_duplex() -> LinkDuplex {
    LinkDuplex::Full
}

impl GatewayPortStatus {
    /// Port description, falling back to the port name.
    pub fn display_name(&self) -> &str {
        self.port_desc.as_deref().unwrap_or(&self.name)
    }

    pub fn wan_connected(&self) -> bool {
        self.internet_state
    }

    pub fn ipv6_wan_connected(&self) -> bool {
        self.wan_port_ipv6_config.internet_state
    }

    /// Connected (v4 or v6) and passing the controller's online detection.
    pub fn online(&self) -> bool {
        (self.wan_connected() || self.ipv6_wan_connected()) && self.online_detection
    }

    pub fn wan_ipv6_enabled(&self) -> bool {
        self.wan_port_ipv6_config.enable
    }

    pub fn ipv6_address(&self) -> Option<&str> {
        self.wan_port_ipv6_config.addr.as_deref()
    }
}

impl PortStatus for GatewayPortStatus {
    fn link_status(&self) -> LinkStatus {
        self.status
    }

    fn link_speed(&self) -> LinkSpeed {
        self.speed
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

/// Raw `portConfigs` entry before PoE state is merged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPortConfig {
    port: u32,
    #[serde(default)]
    duplex: LinkDuplex,
    #[serde(default)]
    link_speed: LinkSpeed,
    #[serde(default)]
    mirror_enable: bool,
    #[serde(deserialize_with = "raw::one")]
    port_stat: GatewayPortStatus,
    #[serde(skip)]
    raw: Value,
}

/// Configuration of one gateway port, with its PoE mode resolved from the
/// gateway's `poeSettings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPortConfig {
    pub port_number: u32,
    pub duplex: LinkDuplex,
    pub link_speed: LinkSpeed,
    pub mirror_enable: bool,
    pub port_status: GatewayPortStatus,
    /// `PoeMode::None` for ports without PoE.
    pub poe_mode: PoeMode,
    /// The `portConfigs` entry; PoE state lives in the gateway's `poeSettings`.
    #[serde(skip)]
    raw: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoeSetting {
    #[serde(deserialize_with = "lenient::number")]
    port_id: u32,
    #[serde(deserialize_with = "lenient::flag")]
    enable: bool,
}

/// Detailed gateway view (`GET gateways/{mac}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    #[serde(flatten)]
    pub info: DeviceInfo,
    #[serde(default)]
    pub led_setting: LedSetting,
    #[serde(default, rename = "portNum")]
    pub number_of_ports: u32,
    #[serde(default, rename = "supportPoe")]
    pub supports_poe: bool,
    #[serde(default, rename = "portStats", deserialize_with = "raw::list")]
    pub port_status: Vec<GatewayPortStatus>,
    #[serde(default, deserialize_with = "raw::list")]
    port_configs: Vec<RawPortConfig>,
    #[serde(default)]
    poe_settings: Vec<PoeSetting>,
    #[serde(default, rename = "lldpEnable")]
    pub lldp_enabled: bool,
    #[serde(default)]
    pub echo_server: Option<String>,
    /// Gateway combined with a switch/controller in one device.
    #[serde(default, rename = "combinedGateway")]
    pub is_combined_gateway: bool,
    #[serde(skip)]
    raw: Value,
}

keeps_raw!(GatewayPortStatus, RawPortConfig, GatewayPortConfig, Gateway);

impl Gateway {
    /// Port configurations with PoE mode resolved per port.
    pub fn port_configs(&self) -> Vec<GatewayPortConfig> {
        let poe: HashMap<u32, bool> = self
            .poe_settings
            .iter()
            .map(|s| (s.port_id, s.enable))
            .collect();

        self.port_configs
            .iter()
            .map(|entry| GatewayPortConfig {
                port_number: entry.port,
                duplex: entry.duplex,
                link_speed: entry.link_speed,
                mirror_enable: entry.mirror_enable,
                port_status: entry.port_stat.clone(),
                poe_mode: match poe.get(&entry.port) {
                    Some(true) => PoeMode::Enabled,
                    Some(false) => PoeMode::Disabled,
                    None => PoeMode::None,
                },
                raw: entry.raw.clone(),
            })
            .collect()
    }

    pub fn port_config(&self, port_number: u32) -> Option<GatewayPortConfig> {
        self.port_configs()
            .into_iter()
            .find(|p| p.port_number == port_number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gateway() -> Gateway {
        serde_json::from_value(json!({
            "type": "gateway",
            "mac": "GW-01",
            "portNum": 3,
            "supportPoe": true,
            "lldpEnable": false,
            "echoServer": "0.0.0.0",
            "portStats": [],
            "portConfigs": [
                {"port": 1, "portStat": {"port": 1, "name": "WAN", "type": 0, "mode": 0,
                                         "status": 1, "internetState": 1, "onlineDetection": 1}},
                {"port": 5, "linkSpeed": 3, "portStat": {"port": 5, "name": "LAN5", "type": 2,
                                                         "mode": 1, "status": 0, "poe": true}},
                {"port": 6, "portStat": {"port": 6, "name": "LAN6", "portDesc": "Cameras",
                                         "type": 2, "mode": 1, "status": 1}},
            ],
            "poeSettings": [
                {"portId": 5, "enable": true},
                {"portId": "6", "enable": false},
            ],
        }))
        .unwrap()
    }

    #[test]
    fn poe_mode_resolved_from_settings() {
        let gw = gateway();
        let ports = gw.port_configs();
        assert_eq!(ports.len(), 3);
        assert_eq!(ports[0].poe_mode, PoeMode::None);
        assert_eq!(ports[1].poe_mode, PoeMode::Enabled);
        assert_eq!(ports[2].poe_mode, PoeMode::Disabled);
    }

    #[test]
    fn wan_helpers() {
        let gw = gateway();
        let wan = gw.port_config(1).unwrap().port_status;
        assert!(wan.wan_connected());
        assert!(wan.online());
        assert!(!wan.ipv6_wan_connected());
        assert_eq!(wan.speed, LinkSpeed::Speed10Mbps);
        assert_eq!(wan.duplex, LinkDuplex::Full);

        let lan6 = gw.port_config(6).unwrap().port_status;
        assert_eq!(lan6.display_name(), "Cameras");
        assert!(gw.port_config(9).is_none());
    }
}
