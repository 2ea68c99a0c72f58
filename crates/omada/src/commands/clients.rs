//! Client command handlers.

use futures_util::TryStreamExt;
use tabled::Tabled;

use omada_api::OmadaSiteClient;
use omada_api::model::{Client, ClientDetails, ClientInfo, ClientKind};

use crate::cli::{GlobalOpts, SetClientNameArgs};
use crate::error::CliError;
use crate::output::{self, Marks};

use super::util;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

/// Where the client is attached: switch and port, or access point and SSID.
fn attachment(kind: &ClientKind) -> String {
    match kind {
        ClientKind::Wired(w) => {
            let via = w
                .switch_name
                .as_deref()
                .or(w.switch_mac.as_deref())
                .or(w.gateway_name.as_deref())
                .or(w.gateway_mac.as_deref());
            match (via, w.port) {
                (Some(via), Some(port)) => format!("wired {via} port {port}"),
                (Some(via), None) => format!("wired {via}"),
                (None, _) => "wired".into(),
            }
        }
        ClientKind::Wireless(w) => {
            let ap = w.ap_name.as_deref().or(w.ap_mac.as_deref()).unwrap_or("-");
            match &w.ssid {
                Some(ssid) => format!("wireless {ap} ({ssid})"),
                None => format!("wireless {ap}"),
            }
        }
    }
}

fn client_row(c: &Client) -> ClientRow {
    ClientRow {
        mac: c.info.mac.clone(),
        ip: output::or_dash(c.info.ip.as_deref()).to_owned(),
        name: c.info.display_name().to_owned(),
        connection: attachment(&c.kind),
        duration: c
            .info
            .connection_time()
            .map_or_else(|| "-".into(), output::display_duration),
    }
}

fn common_lines(marks: Marks, info: &ClientInfo) -> Vec<String> {
    vec![
        format!("MAC:         {}", info.mac),
        format!("Name:        {}", output::or_dash(info.name.as_deref())),
        format!("Hostname:    {}", output::or_dash(info.host_name.as_deref())),
        format!("IP:          {}", output::or_dash(info.ip.as_deref())),
        format!("Active:      {}", marks.check(info.active)),
        format!("Blocked:     {}", marks.check(info.is_blocked())),
        format!("Guest:       {}", marks.check(info.guest)),
        format!(
            "Connected:   {}",
            info.connection_time()
                .map_or_else(|| "-".into(), output::display_duration)
        ),
        format!(
            "Last seen:   {}",
            info.last_seen()
                .map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
        format!("Downloaded:  {}", output::display_bytes(info.traffic_down)),
        format!("Uploaded:    {}", output::display_bytes(info.traffic_up)),
    ]
}

fn kind_lines(kind: &ClientKind) -> Vec<String> {
    match kind {
        ClientKind::Wired(w) => vec![
            "Connection:  wired".into(),
            format!(
                "Switch:      {} {}",
                output::or_dash(w.switch_mac.as_deref()),
                output::or_dash(w.switch_name.as_deref())
            ),
            format!(
                "Port:        {}",
                w.port.map_or_else(|| "-".into(), |p| p.to_string())
            ),
            format!(
                "Gateway:     {} {}",
                output::or_dash(w.gateway_mac.as_deref()),
                output::or_dash(w.gateway_name.as_deref())
            ),
            format!("Network:     {}", output::or_dash(w.network_name.as_deref())),
        ],
        ClientKind::Wireless(w) => vec![
            "Connection:  wireless".into(),
            format!(
                "AP:          {} {}",
                output::or_dash(w.ap_mac.as_deref()),
                output::or_dash(w.ap_name.as_deref())
            ),
            format!("SSID:        {}", output::or_dash(w.ssid.as_deref())),
            format!(
                "Channel:     {}",
                w.channel.map_or_else(|| "-".into(), |c| c.to_string())
            ),
            format!(
                "RSSI:        {}",
                w.rssi.map_or_else(|| "-".into(), |r| format!("{r} dBm"))
            ),
        ],
    }
}

fn detail(marks: Marks, c: &ClientDetails) -> String {
    let mut lines = common_lines(marks, &c.info);
    lines.extend(kind_lines(&c.kind));
    if let Some(vendor) = &c.details.vendor {
        lines.push(format!("Vendor:      {vendor}"));
    }
    if let Some(os) = &c.details.os_name {
        lines.push(format!("OS:          {os}"));
    }
    if let Some(setting) = c.details.ip_setting.as_ref().filter(|s| s.use_fixed_addr) {
        lines.push(format!(
            "Fixed IP:    {}",
            output::or_dash(setting.ip.as_deref())
        ));
    }
    lines.join("\n")
}

pub async fn list(
    site: &OmadaSiteClient,
    known: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let clients: Vec<Client> = if known {
        site.get_known_clients().try_collect().await?
    } else {
        site.get_connected_clients().try_collect().await?
    };
    let out = output::render_entities(global, &clients, client_row, |c| {
        c.info.mac.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(
    site: &OmadaSiteClient,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let mac = util::find_client_mac(site, identifier).await?;
    let client = site.get_client(&mac).await?;
    let out = output::render_entity(
        global,
        &client,
        |c| detail(marks, c),
        |c| c.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn set_blocked(
    site: &OmadaSiteClient,
    identifier: &str,
    block: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mac = util::find_client_mac(site, identifier).await?;
    if block {
        site.block_client(&mac).await?;
    } else {
        site.unblock_client(&mac).await?;
    }
    output::print_status(
        &format!(
            "Client {mac} {}",
            if block { "blocked" } else { "unblocked" }
        ),
        global.quiet,
    );
    Ok(())
}

pub async fn set_name(
    site: &OmadaSiteClient,
    args: &SetClientNameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let mac = util::find_client_mac(site, &args.client).await?;
    let client = site.set_client_name(&mac, &args.name).await?;
    let out = output::render_entity(
        global,
        &client,
        |c| detail(marks, c),
        |c| c.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use omada_api::model::{WiredClientInfo, WirelessClientInfo};

    use super::*;

    #[test]
    fn wired_attachment_prefers_switch_name() {
        let kind = ClientKind::Wired(WiredClientInfo {
            switch_mac: Some("AA-BB-CC-DD-EE-01".into()),
            switch_name: Some("core".into()),
            port: Some(7),
            ..WiredClientInfo::default()
        });
        assert_eq!(attachment(&kind), "wired core port 7");
    }

    #[test]
    fn wireless_attachment_shows_ssid() {
        let kind = ClientKind::Wireless(WirelessClientInfo {
            ap_mac: Some("AA-BB-CC-DD-EE-02".into()),
            ssid: Some("home".into()),
            ..WirelessClientInfo::default()
        });
        assert_eq!(attachment(&kind), "wireless AA-BB-CC-DD-EE-02 (home)");
    }
}
