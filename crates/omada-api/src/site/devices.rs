// Device listing, firmware and LED operations shared by every device kind

use serde_json::{Value, json};

use super::{DeviceRef, OmadaSiteClient};
use crate::error::Error;
use crate::model::{Device, DeviceInfo, DeviceType, FirmwareUpdate, LedSetting};

impl OmadaSiteClient {
    /// Every device adopted into the site.
    ///
    /// `GET devices`
    pub async fn get_devices(&self) -> Result<Vec<Device>, Error> {
        let url = self.url("devices").await?;
        self.api.get_views(url, &[]).await
    }

    /// One device from the site list.
    pub async fn get_device(&self, mac: &str) -> Result<Device, Error> {
        self.get_devices()
            .await?
            .into_iter()
            .find(|d| d.info.mac.eq_ignore_ascii_case(mac))
            .ok_or_else(|| Error::invalid_device(format!("Device {mac} not found")))
    }

    /// MACs of the listed devices of one kind, in list order.
    pub(crate) async fn macs_of_type(&self, device_type: DeviceType) -> Result<Vec<String>, Error> {
        Ok(self
            .get_devices()
            .await?
            .into_iter()
            .filter(|d| d.info.device_type == device_type)
            .map(|d| d.info.mac)
            .collect())
    }

    /// Installed firmware and any available upgrade.
    ///
    /// `GET devices/{mac}/firmware`
    pub async fn get_firmware_details<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
    ) -> Result<FirmwareUpdate, Error> {
        let mac = device.into().mac();
        let url = self.url(&format!("devices/{mac}/firmware")).await?;
        self.api.get_view(url, &[]).await
    }

    /// Ask the controller to start an online firmware upgrade.
    ///
    /// Returns once the request is accepted; completion is not tracked.
    pub async fn start_firmware_upgrade<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
    ) -> Result<(), Error> {
        let mac = device.into().mac();
        let url = self.url(&format!("cmd/devices/{mac}/onlineUpgrade")).await?;
        let _: Value = self.api.post(url, Some(&json!({ "mac": mac }))).await?;
        Ok(())
    }

    /// Set the onboard LED behaviour of a device.
    pub async fn set_led_setting<'a>(
        &self,
        device: impl Into<DeviceRef<'a>>,
        setting: LedSetting,
    ) -> Result<(), Error> {
        let (mac, device_type) = match device.into() {
            DeviceRef::Handle { mac, device_type } => (mac.to_owned(), device_type),
            DeviceRef::Mac(mac) => {
                let DeviceInfo {
                    mac, device_type, ..
                } = self.get_device(mac).await?.info;
                (mac, device_type)
            }
        };
        let segment = device_type.resource_segment().ok_or_else(|| {
            Error::invalid_device(format!("Device {mac} of type '{device_type}' has no LED setting"))
        })?;

        let url = self.url(&format!("{segment}/{mac}")).await?;
        let payload = json!({ "mac": mac, "ledSetting": setting });
        let _: Value = self.api.patch(url, &payload).await?;
        Ok(())
    }
}
