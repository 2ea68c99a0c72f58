// Partial settings accepted by the site update operations
//
// Every field is optional: `None` keeps the device's current value.

use crate::model::{
    Eth802Dot1X, LinkDuplex, LinkSpeed, NetworkTagsSetting, PoeMode, PortProfileSettings,
};

/// Profile-level settings a switch port can override.
///
/// Bandwidth limits and mirroring are not modelled; writing overrides
/// resets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortProfileOverrides {
    pub enable_poe: Option<bool>,
    pub dot1x_mode: Option<Eth802Dot1X>,
    pub lldp_med_enable: Option<bool>,
    pub loopback_detect: Option<bool>,
    pub spanning_tree_enable: Option<bool>,
    pub port_isolation: Option<bool>,
    pub loopback_detect_vlan_based: Option<bool>,
    pub flow_control: Option<bool>,
    pub eee: Option<bool>,
}

impl PortProfileOverrides {
    /// Effective values of a port that already carries its own overrides.
    pub fn from_port_settings(settings: &PortProfileSettings) -> Self {
        Self::with_poe(settings, settings.poe == PoeMode::Enabled)
    }

    /// Values a port inherits from its profile.
    ///
    /// Profiles have no separate PoE switch, so any mode other than
    /// `Disabled` counts as enabled.
    pub fn from_profile_settings(settings: &PortProfileSettings) -> Self {
        Self::with_poe(settings, settings.poe != PoeMode::Disabled)
    }

    fn with_poe(settings: &PortProfileSettings, enable_poe: bool) -> Self {
        Self {
            enable_poe: Some(enable_poe),
            dot1x_mode: Some(settings.dot1x),
            lldp_med_enable: Some(settings.lldp_med_enable),
            loopback_detect: Some(settings.loopback_detect_enable),
            spanning_tree_enable: Some(settings.spanning_tree_enable),
            port_isolation: Some(settings.port_isolation_enable),
            loopback_detect_vlan_based: settings.loopback_detect_vlan_based_enable,
            flow_control: settings.flow_control_enable,
            eee: settings.eee_enable,
        }
    }

    /// Field-wise merge: values set on `self` win, the rest come from `current`.
    pub fn merged_over(&self, current: &Self) -> Self {
        Self {
            enable_poe: self.enable_poe.or(current.enable_poe),
            dot1x_mode: self.dot1x_mode.or(current.dot1x_mode),
            lldp_med_enable: self.lldp_med_enable.or(current.lldp_med_enable),
            loopback_detect: self.loopback_detect.or(current.loopback_detect),
            spanning_tree_enable: self.spanning_tree_enable.or(current.spanning_tree_enable),
            port_isolation: self.port_isolation.or(current.port_isolation),
            loopback_detect_vlan_based: self
                .loopback_detect_vlan_based
                .or(current.loopback_detect_vlan_based),
            flow_control: self.flow_control.or(current.flow_control),
            eee: self.eee.or(current.eee),
        }
    }
}

/// Changes to apply to a switch port.
#[derive(Debug, Clone, Default)]
pub struct SwitchPortSettings {
    pub name: Option<String>,
    /// Port profile to apply.
    pub profile_id: Option<String>,
    pub native_network_id: Option<String>,
    pub duplex: Option<LinkDuplex>,
    pub link_speed: Option<LinkSpeed>,
    /// Port labels.
    pub tag_ids: Option<Vec<String>>,
    pub network_tags_setting: Option<NetworkTagsSetting>,
    /// Used when the network tags setting is `Custom`.
    pub tagged_network_ids: Option<Vec<String>>,
    pub untagged_network_ids: Option<Vec<String>>,
    pub voice_network: Option<bool>,
    /// Used when the voice network is enabled.
    pub voice_network_id: Option<String>,
    pub profile_override_enabled: Option<bool>,
    /// Overrides applied when profile override is enabled; unset fields keep
    /// the port's current effective values.
    pub profile_overrides: Option<PortProfileOverrides>,
}

/// Changes to apply to an access point LAN port.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPointPortSettings {
    /// Ignored on ports without PoE.
    pub enable_poe: Option<bool>,
    pub vlan_enable: Option<bool>,
    pub vlan_id: Option<u16>,
}

/// Changes to apply to a gateway port. PoE is the only writable setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayPortSettings {
    pub enable_poe: Option<bool>,
}

/// Fixed IP reservation for a client. No address clears the reservation.
#[derive(Debug, Clone, Default)]
pub struct FixedAddress {
    pub network_id: Option<String>,
    pub ip_address: Option<String>,
}

/// Changes to apply to a client.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub name: Option<String>,
    /// Access points the client is locked to; an empty list unlocks it.
    pub lock_to_aps: Option<Vec<String>>,
    pub fixed_address: Option<FixedAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_requested_values() {
        let current = PortProfileOverrides {
            enable_poe: Some(true),
            dot1x_mode: Some(Eth802Dot1X::ForceAuthorized),
            lldp_med_enable: Some(true),
            loopback_detect: Some(false),
            spanning_tree_enable: Some(false),
            port_isolation: Some(false),
            eee: Some(true),
            ..PortProfileOverrides::default()
        };
        let requested = PortProfileOverrides {
            enable_poe: Some(false),
            port_isolation: Some(true),
            ..PortProfileOverrides::default()
        };

        let merged = requested.merged_over(&current);
        assert_eq!(merged.enable_poe, Some(false));
        assert_eq!(merged.port_isolation, Some(true));
        assert_eq!(merged.lldp_med_enable, Some(true));
        assert_eq!(merged.eee, Some(true));
        assert_eq!(merged.flow_control, None);
    }

    #[test]
    fn profile_poe_counts_anything_but_disabled() {
        let mut settings = PortProfileSettings {
            poe: PoeMode::UseDeviceSettings,
            ..PortProfileSettings::default()
        };
        assert_eq!(
            PortProfileOverrides::from_profile_settings(&settings).enable_poe,
            Some(true)
        );
        assert_eq!(
            PortProfileOverrides::from_port_settings(&settings).enable_poe,
            Some(false)
        );

        settings.poe = PoeMode::Disabled;
        assert_eq!(
            PortProfileOverrides::from_profile_settings(&settings).enable_poe,
            Some(false)
        );
    }

    #[test]
    fn optional_fields_follow_what_the_controller_reports() {
        let settings = PortProfileSettings {
            eee_enable: Some(true),
            ..PortProfileSettings::default()
        };
        let overrides = PortProfileOverrides::from_port_settings(&settings);
        assert_eq!(overrides.eee, Some(true));
        assert_eq!(overrides.flow_control, None);
        assert_eq!(overrides.loopback_detect_vlan_based, None);
    }

    #[test]
    fn empty_request_keeps_current() {
        let current = PortProfileOverrides {
            enable_poe: Some(true),
            spanning_tree_enable: Some(true),
            ..PortProfileOverrides::default()
        };
        assert_eq!(
            PortProfileOverrides::default().merged_over(&current),
            current
        );
    }
}
