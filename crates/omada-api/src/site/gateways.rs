// Gateway operations
//
// A site has at most one gateway, so every operation accepts `None` to
// mean "the site's gateway", resolved from the device list.

use serde_json::{Value, json};

use super::{DeviceRef, GatewayPortSettings, OmadaSiteClient};
use crate::connection::decode_view;
use crate::error::Error;
use crate::model::{DeviceType, Gateway, GatewayPortConfig, GatewayPortStatus, PoeMode};

impl OmadaSiteClient {
    /// Detailed views of the site's gateways (zero or one).
    pub async fn get_gateways(&self) -> Result<Vec<Gateway>, Error> {
        let mut gateways = Vec::new();
        for mac in self.macs_of_type(DeviceType::Gateway).await? {
            gateways.push(self.get_gateway(Some(DeviceRef::Mac(&mac))).await?);
        }
        Ok(gateways)
    }

    async fn gateway_mac(&self, device: Option<DeviceRef<'_>>) -> Result<String, Error> {
        match device {
            Some(device) => device.require(DeviceType::Gateway).map(str::to_owned),
            None => self
                .macs_of_type(DeviceType::Gateway)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| Error::invalid_device("No gateways found in site")),
        }
    }

    /// `GET gateways/{mac}`
    pub async fn get_gateway(&self, device: Option<DeviceRef<'_>>) -> Result<Gateway, Error> {
        let mac = self.gateway_mac(device).await?;
        let url = self.url(&format!("gateways/{mac}")).await?;
        self.api.get_view(url, &[]).await
    }

    /// Configuration of one gateway port.
    pub async fn get_gateway_port(
        &self,
        port_id: u32,
        device: Option<DeviceRef<'_>>,
    ) -> Result<GatewayPortConfig, Error> {
        self.get_gateway(device)
            .await?
            .port_config(port_id)
            .ok_or_else(|| Error::invalid_device(format!("Port {port_id} not found")))
    }

    /// Connect or disconnect a WAN port (IPv4, or IPv6 when `ipv6` is set).
    ///
    /// `POST cmd/gateways/{mac}/internetState` or `.../ipv6State`
    pub async fn set_gateway_wan_port_connect_state(
        &self,
        port_id: u32,
        connect: bool,
        device: Option<DeviceRef<'_>>,
        ipv6: bool,
    ) -> Result<GatewayPortStatus, Error> {
        let mac = self.gateway_mac(device).await?;
        let command = if ipv6 { "ipv6State" } else { "internetState" };
        let url = self.url(&format!("cmd/gateways/{mac}/{command}")).await?;
        let payload = json!({ "portId": port_id, "operation": u8::from(connect) });
        let port: Value = self.api.post(url, Some(&payload)).await?;
        decode_view(&port)
    }

    /// Apply `settings` to a gateway port and return the port as re-read
    /// from the controller.
    ///
    /// Settings with nothing to change only read the port.
    pub async fn set_gateway_port_settings(
        &self,
        port_id: u32,
        settings: GatewayPortSettings,
        device: Option<DeviceRef<'_>>,
    ) -> Result<GatewayPortConfig, Error> {
        let mac = self.gateway_mac(device).await?;

        if let Some(enable) = settings.enable_poe {
            let gateway = self.get_gateway(Some(DeviceRef::Mac(&mac))).await?;
            if !gateway.supports_poe {
                return Err(Error::invalid_device("This gateway does not support PoE"));
            }
            let url = self.url(&format!("gateways/{mac}")).await?;
            let _: Value = self
                .api
                .patch(url, &gateway_poe_payload(&gateway, port_id, enable))
                .await?;
        }

        self.get_gateway_port(port_id, Some(DeviceRef::Mac(&mac)))
            .await
    }
}

/// Whole-device PoE write: every PoE port is listed with its current state,
/// except `port_id` which takes `enable`.
fn gateway_poe_payload(gateway: &Gateway, port_id: u32, enable: bool) -> Value {
    let poe_settings: Vec<Value> = gateway
        .port_configs()
        .iter()
        .filter(|p| p.poe_mode != PoeMode::None)
        .map(|p| {
            let enabled = if p.port_number == port_id {
                enable
            } else {
                p.poe_mode == PoeMode::Enabled
            };
            json!({ "enable": enabled, "portId": p.port_number })
        })
        .collect();

    json!({
        "lldpEnable": gateway.lldp_enabled,
        "echoServer": gateway.echo_server,
        "poeSettings": poe_settings,
    })
}
