// Switch, switch port and port profile operations
//
// The port PATCH endpoint replaces the whole port configuration, so an
// update is composed from the current port (and, when overrides are in
// play, its effective profile values) with the caller's changes on top.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{DeviceRef, OmadaSiteClient, PortProfileOverrides, SwitchPortSettings};
use crate::error::Error;
use crate::model::{
    BandwidthControl, DeviceType, NetworkTagsSetting, PoeMode, PortProfile, Switch,
    SwitchPortDetails,
};
use crate::version::{ControllerVersion, V6};

#[derive(Deserialize)]
struct ProfileSummary {
    #[serde(default)]
    data: Vec<PortProfile>,
}

impl OmadaSiteClient {
    /// Detailed views of every switch in the site, fetched one by one.
    pub async fn get_switches(&self) -> Result<Vec<Switch>, Error> {
        let mut switches = Vec::new();
        for mac in self.macs_of_type(DeviceType::Switch).await? {
            switches.push(self.get_switch(&mac).await?);
        }
        Ok(switches)
    }

    /// `GET switches/{mac}`
    pub async fn get_switch<'a>(&self, device: impl Into<DeviceRef<'a>>) -> Result<Switch, Error> {
        let mac = device.into().require(DeviceType::Switch)?;
        let url = self.url(&format!("switches/{mac}")).await?;
        self.api.get_view(url, &[]).await
    }

    /// `GET switches/{mac}/ports`
    pub async fn get_switch_ports<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
    ) -> Result<Vec<SwitchPortDetails>, Error> {
        let mac = device.into().require(DeviceType::Switch)?;
        let url = self.url(&format!("switches/{mac}/ports")).await?;
        self.api.get_views(url, &[]).await
    }

    /// `GET switches/{mac}/ports/{port}`
    pub async fn get_switch_port<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        port: u32,
    ) -> Result<SwitchPortDetails, Error> {
        let mac = device.into().require(DeviceType::Switch)?;
        let url = self.url(&format!("switches/{mac}/ports/{port}")).await?;
        self.api.get_view(url, &[]).await
    }

    /// The port's effective profile settings: its own overrides when it has
    /// them, otherwise the values of its profile.
    pub async fn get_switch_port_overrides<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        port: u32,
    ) -> Result<PortProfileOverrides, Error> {
        let port = self.get_switch_port(device, port).await?;
        self.effective_overrides(&port).await
    }

    async fn effective_overrides(
        &self,
        port: &SwitchPortDetails,
    ) -> Result<PortProfileOverrides, Error> {
        if port.has_profile_override {
            return Ok(PortProfileOverrides::from_port_settings(&port.settings));
        }
        let profile = self.get_port_profile(&port.port.profile_id).await?;
        Ok(PortProfileOverrides::from_profile_settings(&profile.settings))
    }

    /// Port profiles defined for the site.
    ///
    /// `GET setting/lan/profileSummary`
    pub async fn get_port_profiles(&self) -> Result<Vec<PortProfile>, Error> {
        let url = self.url("setting/lan/profileSummary").await?;
        let summary: ProfileSummary = self.api.get(url, &[]).await?;
        Ok(summary.data)
    }

    pub async fn get_port_profile(&self, profile_id: &str) -> Result<PortProfile, Error> {
        self.get_port_profiles()
            .await?
            .into_iter()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| Error::invalid_device(format!("Port profile {profile_id} does not exist")))
    }

    /// Apply `settings` to a switch port and return the port as re-read
    /// from the controller.
    ///
    /// Unset fields keep their current values. With profile override
    /// enabled, unset override fields keep the port's effective values.
    pub async fn update_switch_port<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        port: u32,
        settings: &SwitchPortSettings,
    ) -> Result<SwitchPortDetails, Error> {
        let mac = device.into().require(DeviceType::Switch)?;
        let current = self.get_switch_port(mac, port).await?;

        let override_enabled = settings
            .profile_override_enabled
            .unwrap_or(current.has_profile_override);
        let overrides = if override_enabled {
            let existing = self.effective_overrides(&current).await?;
            Some(match &settings.profile_overrides {
                Some(requested) => requested.merged_over(&existing),
                None => existing,
            })
        } else {
            None
        };

        let version = self.api.controller_version().await?;
        let payload = switch_port_payload(&current, settings, overrides.as_ref(), version);
        debug!(mac, port, override_enabled, "updating switch port");

        let url = self.url(&format!("switches/{mac}/ports/{port}")).await?;
        let _: Value = self.api.patch(url, &payload).await?;
        self.get_switch_port(mac, port).await
    }
}

/// Full port configuration to PATCH.
///
/// `overrides` carries the merged override values and is `Some` exactly
/// when profile override is to be enabled.
pub(crate) fn switch_port_payload(
    current: &SwitchPortDetails,
    settings: &SwitchPortSettings,
    overrides: Option<&PortProfileOverrides>,
    version: ControllerVersion,
) -> Value {
    let mut payload = Map::new();

    let name = non_empty(settings.name.as_deref()).unwrap_or(&current.port.name);
    let profile_id = non_empty(settings.profile_id.as_deref()).unwrap_or(&current.port.profile_id);
    payload.insert("name".into(), json!(name));
    payload.insert("profileId".into(), json!(profile_id));
    payload.insert(
        "linkSpeed".into(),
        json!(settings.link_speed.unwrap_or(current.link_speed)),
    );
    payload.insert("duplex".into(), json!(settings.duplex.unwrap_or(current.duplex)));
    payload.insert("profileOverrideEnable".into(), json!(overrides.is_some()));
    payload.insert(
        "tagIds".into(),
        json!(settings.tag_ids.as_ref().unwrap_or(&current.tag_ids)),
    );

    if let Some(native) = non_empty(settings.native_network_id.as_deref())
        .or_else(|| non_empty(current.native_network_id.as_deref()))
    {
        payload.insert("nativeNetworkId".into(), json!(native));
    }

    match settings.network_tags_setting.or(current.network_tags_setting) {
        None | Some(NetworkTagsSetting::Unknown(_)) => {}
        Some(tags) => {
            payload.insert("networkTagsSetting".into(), json!(tags));
            if tags == NetworkTagsSetting::Custom {
                let tagged = settings
                    .tagged_network_ids
                    .as_ref()
                    .unwrap_or(&current.tagged_network_ids);
                let untagged = settings
                    .untagged_network_ids
                    .as_ref()
                    .unwrap_or(&current.untagged_network_ids);
                payload.insert("tagNetworkIds".into(), json!(tagged));
                payload.insert("untagNetworkIds".into(), json!(untagged));
            }
        }
    }

    if current.has_voice_network() {
        let voice = settings
            .voice_network
            .or(current.voice_network_enable)
            .unwrap_or(false);
        payload.insert("voiceNetworkEnable".into(), json!(voice));
        if voice {
            let id = settings
                .voice_network_id
                .as_ref()
                .or(current.voice_network_id.as_ref());
            payload.insert("voiceNetworkId".into(), json!(id));
        }
    }

    if let Some(overrides) = overrides {
        insert_overrides(&mut payload, overrides, version);
    }

    Value::Object(payload)
}

/// Override block: pinned fields plus the merged profile values.
fn insert_overrides(
    payload: &mut Map<String, Value>,
    o: &PortProfileOverrides,
    version: ControllerVersion,
) {
    // Not modelled here; pinned so the write is accepted.
    payload.insert("operation".into(), json!("switching"));
    payload.insert("bandWidthCtrlType".into(), json!(BandwidthControl::Off));
    payload.insert("topoNotifyEnable".into(), json!(false));

    let poe = if o.enable_poe.unwrap_or(false) {
        PoeMode::Enabled
    } else {
        PoeMode::Disabled
    };
    payload.insert("poe".into(), json!(poe));
    payload.insert("dot1x".into(), json!(o.dot1x_mode.unwrap_or_default()));
    payload.insert(
        "lldpMedEnable".into(),
        json!(o.lldp_med_enable.unwrap_or(false)),
    );
    payload.insert(
        "loopbackDetectEnable".into(),
        json!(o.loopback_detect.unwrap_or(false)),
    );
    payload.insert(
        "spanningTreeEnable".into(),
        json!(o.spanning_tree_enable.unwrap_or(false)),
    );
    payload.insert(
        "portIsolationEnable".into(),
        json!(o.port_isolation.unwrap_or(false)),
    );

    if version >= V6 {
        for (key, value) in [
            ("eeeEnable", o.eee),
            ("flowControlEnable", o.flow_control),
            ("loopbackDetectVlanBasedEnable", o.loopback_detect_vlan_based),
        ] {
            if let Some(value) = value {
                payload.insert(key.into(), json!(value));
            }
        }
        payload.insert("dhcpL2RelaySettings".into(), json!({ "enable": false }));
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Eth802Dot1X, LinkSpeed};

    const V5: ControllerVersion = ControllerVersion::new(5, 15, 0);

    fn port(extra: &Value) -> SwitchPortDetails {
        let mut base = json!({
            "id": "p5",
            "port": 5,
            "name": "Port5",
            "profileId": "prof-all",
            "profileName": "All",
            "linkSpeed": 0,
            "duplex": 0,
            "profileOverrideEnable": false,
            "poe": 1,
            "dot1x": 1,
            "lldpMedEnable": true,
            "spanningTreeEnable": false,
            "loopbackDetectEnable": false,
            "portIsolationEnable": false,
            "tagIds": ["t1"],
        });
        for (k, v) in extra.as_object().unwrap() {
            base[k] = v.clone();
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn profile_port_without_changes_keeps_everything() {
        let current = port(&json!({}));
        let payload = switch_port_payload(&current, &SwitchPortSettings::default(), None, V5);
        assert_eq!(
            payload,
            json!({
                "name": "Port5",
                "profileId": "prof-all",
                "linkSpeed": 0,
                "duplex": 0,
                "profileOverrideEnable": false,
                "tagIds": ["t1"],
            })
        );
    }

    #[test]
    fn override_block_is_complete_and_pinned() {
        let current = port(&json!({"profileOverrideEnable": true}));
        let overrides = PortProfileOverrides::from_port_settings(&current.settings);
        let payload = switch_port_payload(
            &current,
            &SwitchPortSettings::default(),
            Some(&overrides),
            V5,
        );

        assert_eq!(payload["profileOverrideEnable"], json!(true));
        assert_eq!(payload["operation"], json!("switching"));
        assert_eq!(payload["bandWidthCtrlType"], json!(0));
        assert_eq!(payload["topoNotifyEnable"], json!(false));
        assert_eq!(payload["poe"], json!(1));
        assert_eq!(payload["dot1x"], json!(1));
        assert_eq!(payload["lldpMedEnable"], json!(true));
        assert_eq!(payload["spanningTreeEnable"], json!(false));
        assert!(payload.get("dhcpL2RelaySettings").is_none());
        assert!(payload.get("eeeEnable").is_none());
    }

    #[test]
    fn newer_controllers_get_extra_override_fields() {
        let current = port(&json!({"profileOverrideEnable": true, "eeeEnable": true}));
        let overrides = PortProfileOverrides {
            flow_control: Some(false),
            ..PortProfileOverrides::default()
        }
        .merged_over(&PortProfileOverrides::from_port_settings(&current.settings));

        let payload = switch_port_payload(
            &current,
            &SwitchPortSettings::default(),
            Some(&overrides),
            ControllerVersion::new(6, 0, 0),
        );
        assert_eq!(payload["eeeEnable"], json!(true));
        assert_eq!(payload["flowControlEnable"], json!(false));
        assert!(payload.get("loopbackDetectVlanBasedEnable").is_none());
        assert_eq!(payload["dhcpL2RelaySettings"], json!({"enable": false}));
    }

    #[test]
    fn requested_values_win() {
        let current = port(&json!({"nativeNetworkId": "net-1"}));
        let settings = SwitchPortSettings {
            name: Some("Uplink".into()),
            link_speed: Some(LinkSpeed::Speed1Gbps),
            native_network_id: Some("net-2".into()),
            ..SwitchPortSettings::default()
        };
        let payload = switch_port_payload(&current, &settings, None, V5);
        assert_eq!(payload["name"], json!("Uplink"));
        assert_eq!(payload["linkSpeed"], json!(3));
        assert_eq!(payload["nativeNetworkId"], json!("net-2"));
    }

    #[test]
    fn empty_name_keeps_current() {
        let current = port(&json!({}));
        let settings = SwitchPortSettings {
            name: Some(String::new()),
            ..SwitchPortSettings::default()
        };
        let payload = switch_port_payload(&current, &settings, None, V5);
        assert_eq!(payload["name"], json!("Port5"));
    }

    #[test]
    fn custom_network_tags_carry_network_lists() {
        let current = port(&json!({
            "networkTagsSetting": 2,
            "tagNetworkIds": ["a"],
            "untagNetworkIds": ["b"],
        }));
        let settings = SwitchPortSettings {
            tagged_network_ids: Some(vec!["c".into()]),
            ..SwitchPortSettings::default()
        };
        let payload = switch_port_payload(&current, &settings, None, V5);
        assert_eq!(payload["networkTagsSetting"], json!(2));
        assert_eq!(payload["tagNetworkIds"], json!(["c"]));
        assert_eq!(payload["untagNetworkIds"], json!(["b"]));

        let block = SwitchPortSettings {
            network_tags_setting: Some(NetworkTagsSetting::Block),
            ..SwitchPortSettings::default()
        };
        let payload = switch_port_payload(&current, &block, None, V5);
        assert_eq!(payload["networkTagsSetting"], json!(1));
        assert!(payload.get("tagNetworkIds").is_none());
    }

    #[test]
    fn unknown_network_tags_setting_is_left_out() {
        let current = port(&json!({"networkTagsSetting": 9}));
        let payload = switch_port_payload(&current, &SwitchPortSettings::default(), None, V5);
        assert!(payload.get("networkTagsSetting").is_none());
    }

    #[test]
    fn voice_network_only_on_capable_ports() {
        let plain = port(&json!({}));
        let payload = switch_port_payload(&plain, &SwitchPortSettings::default(), None, V5);
        assert!(payload.get("voiceNetworkEnable").is_none());

        let voice = port(&json!({"voiceNetworkEnable": false, "voiceNetworkId": "v1"}));
        let settings = SwitchPortSettings {
            voice_network: Some(true),
            ..SwitchPortSettings::default()
        };
        let payload = switch_port_payload(&voice, &settings, None, V5);
        assert_eq!(payload["voiceNetworkEnable"], json!(true));
        assert_eq!(payload["voiceNetworkId"], json!("v1"));
    }

    #[test]
    fn override_poe_and_dot1x_from_request() {
        let current = port(&json!({"profileOverrideEnable": true}));
        let requested = PortProfileOverrides {
            enable_poe: Some(false),
            dot1x_mode: Some(Eth802Dot1X::Auto),
            ..PortProfileOverrides::default()
        };
        let merged =
            requested.merged_over(&PortProfileOverrides::from_port_settings(&current.settings));
        let payload =
            switch_port_payload(&current, &SwitchPortSettings::default(), Some(&merged), V5);
        assert_eq!(payload["poe"], json!(0));
        assert_eq!(payload["dot1x"], json!(2));
        assert_eq!(payload["lldpMedEnable"], json!(true));
    }
}
