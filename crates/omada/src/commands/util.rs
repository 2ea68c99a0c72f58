//! Shared helpers for command handlers.

use std::pin::pin;

use futures_util::TryStreamExt;

use omada_api::OmadaSiteClient;
use omada_api::model::Device;

use crate::error::CliError;

/// Canonical controller form of a MAC address (`AA-BB-CC-DD-EE-FF`), or
/// `None` when `input` is not a MAC address.
pub fn normalize_mac(input: &str) -> Option<String> {
    let hex: String = input
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let upper = hex.to_ascii_uppercase();
    let pairs: Vec<&str> = (0..12)
        .step_by(2)
        .filter_map(|i| upper.get(i..i + 2))
        .collect();
    Some(pairs.join("-"))
}

/// Find a device of the site by MAC address or exact name.
pub async fn find_device(site: &OmadaSiteClient, identifier: &str) -> Result<Device, CliError> {
    let mac = normalize_mac(identifier);
    site.get_devices()
        .await?
        .into_iter()
        .find(|d| match &mac {
            Some(mac) => d.info.mac.eq_ignore_ascii_case(mac),
            None => d.info.name == identifier,
        })
        .ok_or_else(|| CliError::not_found("device", identifier, "devices"))
}

/// Resolve a client MAC address. Names are looked up among known clients.
pub async fn find_client_mac(
    site: &OmadaSiteClient,
    identifier: &str,
) -> Result<String, CliError> {
    if let Some(mac) = normalize_mac(identifier) {
        return Ok(mac);
    }
    let mut clients = pin!(site.get_known_clients());
    while let Some(client) = clients.try_next().await? {
        if client.info.name.as_deref() == Some(identifier) {
            return Ok(client.info.mac);
        }
    }
    Err(CliError::not_found("client", identifier, "known-clients"))
}

/// Read a secret from the terminal.
pub fn prompt_secret(label: &str) -> Result<String, CliError> {
    rpassword::prompt_password(label).map_err(|e| CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macs_are_normalised() {
        assert_eq!(
            normalize_mac("aa:bb:cc:dd:ee:0f").as_deref(),
            Some("AA-BB-CC-DD-EE-0F")
        );
        assert_eq!(
            normalize_mac("AA-BB-CC-DD-EE-0F").as_deref(),
            Some("AA-BB-CC-DD-EE-0F")
        );
        assert_eq!(
            normalize_mac("aabb.ccdd.ee0f").as_deref(),
            Some("AA-BB-CC-DD-EE-0F")
        );
    }

    #[test]
    fn names_are_not_macs() {
        assert_eq!(normalize_mac("Core Switch"), None);
        assert_eq!(normalize_mac("AA-BB-CC-DD-EE"), None);
        assert_eq!(normalize_mac("GG-BB-CC-DD-EE-FF"), None);
    }
}
