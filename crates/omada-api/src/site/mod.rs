// Site-scoped operations
//
// `OmadaSiteClient` shares the controller connection with the top-level
// client and adds the site key to every URL. Operations are grouped by
// device family in the sibling files.

mod access_points;
mod clients;
mod devices;
mod gateways;
mod settings;
mod switches;

use std::sync::Arc;

use url::Url;

pub use settings::{
    AccessPointPortSettings, ClientSettings, FixedAddress, GatewayPortSettings,
    PortProfileOverrides, SwitchPortSettings,
};

use crate::connection::ApiConnection;
use crate::error::Error;
use crate::model::{
    AccessPoint, Client, ClientDetails, ClientInfo, Device, DeviceInfo, DeviceType, Gateway,
    Switch,
};

/// Client for one Omada site.
#[derive(Clone)]
pub struct OmadaSiteClient {
    api: Arc<ApiConnection>,
    site_id: String,
}

impl OmadaSiteClient {
    pub(crate) fn new(api: Arc<ApiConnection>, site_id: String) -> Self {
        Self { api, site_id }
    }

    /// The site key used in URLs.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    async fn url(&self, endpoint: &str) -> Result<Url, Error> {
        self.api.url(endpoint, Some(&self.site_id)).await
    }
}

impl std::fmt::Debug for OmadaSiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmadaSiteClient")
            .field("site_id", &self.site_id)
            .finish_non_exhaustive()
    }
}

// ── Device and client references ─────────────────────────────────────

/// A device given either by MAC address or by a handle already fetched
/// from the controller.
///
/// Handles carry their device type, so an operation for the wrong kind of
/// device is rejected before any request is made.
#[derive(Debug, Clone, Copy)]
pub enum DeviceRef<'a> {
    Mac(&'a str),
    Handle {
        mac: &'a str,
        device_type: DeviceType,
    },
}

impl<'a> DeviceRef<'a> {
    pub fn mac(&self) -> &'a str {
        match *self {
            Self::Mac(mac) | Self::Handle { mac, .. } => mac,
        }
    }

    /// The MAC, provided the handle (if any) is of the `expected` kind.
    pub(crate) fn require(self, expected: DeviceType) -> Result<&'a str, Error> {
        match self {
            Self::Mac(mac) => Ok(mac),
            Self::Handle { mac, device_type } if device_type == expected => Ok(mac),
            Self::Handle { mac, device_type } => Err(Error::invalid_device(format!(
                "Device {mac} is of type '{device_type}', expected '{expected}'"
            ))),
        }
    }
}

impl<'a> From<&'a str> for DeviceRef<'a> {
    fn from(mac: &'a str) -> Self {
        Self::Mac(mac)
    }
}

impl<'a> From<&'a String> for DeviceRef<'a> {
    fn from(mac: &'a String) -> Self {
        Self::Mac(mac)
    }
}

impl<'a> From<&'a DeviceInfo> for DeviceRef<'a> {
    fn from(info: &'a DeviceInfo) -> Self {
        Self::Handle {
            mac: &info.mac,
            device_type: info.device_type,
        }
    }
}

macro_rules! device_ref_from {
    ($($ty:ty),+) => {
        $(
            impl<'a> From<&'a $ty> for DeviceRef<'a> {
                fn from(device: &'a $ty) -> Self {
                    Self::from(&device.info)
                }
            }
        )+
    };
}

device_ref_from!(Device, Switch, AccessPoint, Gateway);

/// A client given either by MAC address or by a fetched client view.
#[derive(Debug, Clone, Copy)]
pub struct ClientRef<'a>(&'a str);

impl<'a> ClientRef<'a> {
    pub fn mac(&self) -> &'a str {
        self.0
    }
}

impl<'a> From<&'a str> for ClientRef<'a> {
    fn from(mac: &'a str) -> Self {
        Self(mac)
    }
}

impl<'a> From<&'a String> for ClientRef<'a> {
    fn from(mac: &'a String) -> Self {
        Self(mac)
    }
}

impl<'a> From<&'a ClientInfo> for ClientRef<'a> {
    fn from(info: &'a ClientInfo) -> Self {
        Self(&info.mac)
    }
}

impl<'a> From<&'a Client> for ClientRef<'a> {
    fn from(client: &'a Client) -> Self {
        Self(&client.info.mac)
    }
}

impl<'a> From<&'a ClientDetails> for ClientRef<'a> {
    fn from(client: &'a ClientDetails) -> Self {
        Self(&client.info.mac)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn mac_refs_pass_any_type_check() {
        let r = DeviceRef::from("AA-BB");
        assert_eq!(r.require(DeviceType::Switch).unwrap(), "AA-BB");
        assert_eq!(r.require(DeviceType::Ap).unwrap(), "AA-BB");
    }

    #[test]
    fn handles_are_type_checked() {
        let device: Device =
            serde_json::from_value(json!({"type": "ap", "mac": "EA-01"})).unwrap();
        let r = DeviceRef::from(&device);
        assert_eq!(r.require(DeviceType::Ap).unwrap(), "EA-01");
        assert!(matches!(
            r.require(DeviceType::Switch),
            Err(Error::InvalidDevice { .. })
        ));
    }
}
