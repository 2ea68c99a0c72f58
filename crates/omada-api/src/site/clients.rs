// Site client operations
//
// The list endpoints are paged and streamed. Connected clients are read
// from `clients` with `filters.active=false`, which the controller expects
// for the live list; known clients come from `insight/clients`.

use std::pin::pin;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{ClientRef, ClientSettings, OmadaSiteClient};
use crate::connection::deserialization_error;
use crate::error::Error;
use crate::model::{Client, ClientDetails};

impl OmadaSiteClient {
    /// Clients currently connected to the site network.
    pub fn get_connected_clients(&self) -> impl Stream<Item = Result<Client, Error>> + Send + '_ {
        self.client_stream("clients", vec![("filters.active", "false".to_owned())])
    }

    /// Every client the site has seen.
    pub fn get_known_clients(&self) -> impl Stream<Item = Result<Client, Error>> + Send + '_ {
        self.client_stream("insight/clients", Vec::new())
    }

    fn client_stream<'a>(
        &'a self,
        endpoint: &'static str,
        query: Vec<(&'a str, String)>,
    ) -> impl Stream<Item = Result<Client, Error>> + Send + 'a {
        try_stream! {
            let url = self.url(endpoint).await?;
            let mut pages = pin!(self.api.iterate_pages(url, query));
            while let Some(item) = pages.next().await {
                let item = item?;
                match Client::from_value(&item).map_err(|e| deserialization_error(&e, item.to_string()))? {
                    Some(client) => yield client,
                    None => debug!("skipping client entry without a wireless flag"),
                }
            }
        }
    }

    /// Details of one client.
    ///
    /// `GET clients/{mac}`
    pub async fn get_client<'a>(
        &self,
        client: impl Into<ClientRef<'a>>,
    ) -> Result<ClientDetails, Error> {
        let mac = client.into().mac();
        let url = self.url(&format!("clients/{mac}")).await?;
        let value: Value = self.api.get(url, &[]).await?;
        ClientDetails::from_value(&value).map_err(|e| deserialization_error(&e, value.to_string()))
    }

    /// Update a client's name, AP lock or fixed address, then read it back.
    ///
    /// Settings with nothing to change only read the client.
    pub async fn update_client<'a>(
        &self,
        client: impl Into<ClientRef<'a>>,
        settings: &ClientSettings,
    ) -> Result<ClientDetails, Error> {
        let mac = client.into().mac();
        let payload = client_payload(settings);
        if payload.is_empty() {
            return self.get_client(mac).await;
        }

        let url = self.url(&format!("clients/{mac}")).await?;
        let _: Value = self.api.patch(url, &Value::Object(payload)).await?;
        self.get_client(mac).await
    }

    /// Rename a client.
    pub async fn set_client_name<'a>(
        &self,
        client: impl Into<ClientRef<'a>>,
        name: &str,
    ) -> Result<ClientDetails, Error> {
        let settings = ClientSettings {
            name: Some(name.to_owned()),
            ..ClientSettings::default()
        };
        self.update_client(client, &settings).await
    }

    /// Block a client from the network.
    ///
    /// `POST cmd/clients/{mac}/block`
    pub async fn block_client<'a>(&self, client: impl Into<ClientRef<'a>>) -> Result<(), Error> {
        self.client_command(client.into(), "block").await
    }

    /// Unblock a client.
    ///
    /// `POST cmd/clients/{mac}/unblock`
    pub async fn unblock_client<'a>(
        &self,
        client: impl Into<ClientRef<'a>>,
    ) -> Result<(), Error> {
        self.client_command(client.into(), "unblock").await
    }

    /// Force a client to reconnect.
    ///
    /// `POST cmd/clients/{mac}/reconnect`
    pub async fn reconnect_client<'a>(
        &self,
        client: impl Into<ClientRef<'a>>,
    ) -> Result<(), Error> {
        self.client_command(client.into(), "reconnect").await
    }

    async fn client_command(&self, client: ClientRef<'_>, command: &str) -> Result<(), Error> {
        let url = self
            .url(&format!("cmd/clients/{}/{command}", client.mac()))
            .await?;
        let _: Value = self.api.post(url, None).await?;
        Ok(())
    }
}

fn client_payload(settings: &ClientSettings) -> Map<String, Value> {
    let mut payload = Map::new();

    if let Some(name) = settings.name.as_deref().filter(|n| !n.is_empty()) {
        payload.insert("name".into(), json!(name));
    }

    if let Some(aps) = &settings.lock_to_aps {
        payload.insert(
            "clientLockToApSetting".into(),
            json!({ "enable": !aps.is_empty(), "aps": aps }),
        );
    }

    if let Some(fixed) = &settings.fixed_address {
        let ip_setting = match fixed.ip_address.as_deref().filter(|ip| !ip.is_empty()) {
            Some(ip) => json!({
                "useFixedAddr": true,
                "netId": fixed.network_id,
                "ip": ip,
            }),
            None => json!({ "useFixedAddr": false }),
        };
        payload.insert("ipSetting".into(), ip_setting);
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::FixedAddress;

    #[test]
    fn empty_settings_produce_empty_payload() {
        assert!(client_payload(&ClientSettings::default()).is_empty());
        let blank_name = ClientSettings {
            name: Some(String::new()),
            ..ClientSettings::default()
        };
        assert!(client_payload(&blank_name).is_empty());
    }

    #[test]
    fn lock_and_fixed_address() {
        let settings = ClientSettings {
            name: Some("printer".into()),
            lock_to_aps: Some(vec!["EA-01".into()]),
            fixed_address: Some(FixedAddress {
                network_id: Some("net-lan".into()),
                ip_address: Some("10.0.0.50".into()),
            }),
        };
        let payload = Value::Object(client_payload(&settings));
        assert_eq!(
            payload,
            json!({
                "name": "printer",
                "clientLockToApSetting": {"enable": true, "aps": ["EA-01"]},
                "ipSetting": {"useFixedAddr": true, "netId": "net-lan", "ip": "10.0.0.50"},
            })
        );
    }

    #[test]
    fn clearing_lock_and_reservation() {
        let settings = ClientSettings {
            lock_to_aps: Some(Vec::new()),
            fixed_address: Some(FixedAddress::default()),
            ..ClientSettings::default()
        };
        let payload = Value::Object(client_payload(&settings));
        assert_eq!(
            payload,
            json!({
                "clientLockToApSetting": {"enable": false, "aps": []},
                "ipSetting": {"useFixedAddr": false},
            })
        );
    }
}
