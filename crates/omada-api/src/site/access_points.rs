// Access point operations

use serde_json::{Value, json};

use super::{AccessPointPortSettings, DeviceRef, OmadaSiteClient};
use crate::error::Error;
use crate::model::{AccessPoint, AccessPointLanPortSettings, DeviceType};

impl OmadaSiteClient {
    /// Detailed views of every access point in the site, fetched one by one.
    pub async fn get_access_points(&self) -> Result<Vec<AccessPoint>, Error> {
        let mut access_points = Vec::new();
        for mac in self.macs_of_type(DeviceType::Ap).await? {
            access_points.push(self.get_access_point(&mac).await?);
        }
        Ok(access_points)
    }

    /// `GET eaps/{mac}`
    pub async fn get_access_point<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
    ) -> Result<AccessPoint, Error> {
        let mac = device.into().require(DeviceType::Ap)?;
        let url = self.url(&format!("eaps/{mac}")).await?;
        self.api.get_view(url, &[]).await
    }

    /// One wired LAN port of an access point, e.g. `"ETH1"`.
    pub async fn get_access_point_port<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        port_name: &str,
    ) -> Result<AccessPointLanPortSettings, Error> {
        let access_point = self.get_access_point(device).await?;
        find_port(&access_point, port_name).cloned()
    }

    /// Change the VLAN or PoE settings of an access point LAN port and
    /// return the port as re-read from the controller.
    pub async fn update_access_point_port<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        port_name: &str,
        settings: AccessPointPortSettings,
    ) -> Result<AccessPointLanPortSettings, Error> {
        let mac = device.into().require(DeviceType::Ap)?;
        let access_point = self.get_access_point(mac).await?;
        let current = find_port(&access_point, port_name)?;

        let url = self.url(&format!("eaps/{mac}")).await?;
        let payload = json!({ "lanPortSettings": [access_point_port_entry(current, settings)] });
        let _: Value = self.api.patch(url, &payload).await?;

        self.get_access_point_port(mac, port_name).await
    }
}

fn find_port<'p>(
    access_point: &'p AccessPoint,
    port_name: &str,
) -> Result<&'p AccessPointLanPortSettings, Error> {
    access_point
        .lan_port(port_name)
        .ok_or_else(|| Error::invalid_device(format!("Port {port_name} not found")))
}

/// The port's entry of the `lanPortSettings` write.
///
/// PoE is only changed on ports that support it.
fn access_point_port_entry(
    current: &AccessPointLanPortSettings,
    settings: AccessPointPortSettings,
) -> Value {
    let poe = match settings.enable_poe {
        Some(enable) if current.support_poe => enable,
        _ => current.poe_out_enable,
    };
    json!({
        "id": current.port_name,
        "lanPort": current.port_name,
        "localVlanEnable": settings.vlan_enable.unwrap_or(current.local_vlan_enable),
        "localVlanId": settings.vlan_id.unwrap_or(current.local_vlan_id),
        "poeOutEnable": poe,
    })
}
