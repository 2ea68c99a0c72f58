//! Access point command handlers.

use tabled::Tabled;

use omada_api::OmadaSiteClient;
use omada_api::model::AccessPoint;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Marks};

use super::util;

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "LAN Ports")]
    lan_ports: usize,
    #[tabled(rename = "Mesh")]
    wireless_linked: bool,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&AccessPoint> for AccessPointRow {
    fn from(ap: &AccessPoint) -> Self {
        Self {
            mac: ap.info.mac.clone(),
            name: ap.info.name.clone(),
            model: ap.info.model_display_name.clone(),
            ip: output::or_dash(ap.info.ip_address.as_deref()).to_owned(),
            lan_ports: ap.lan_port_settings.len(),
            wireless_linked: ap.wireless_linked,
            status: ap.info.status_category.to_string(),
        }
    }
}

fn detail(marks: Marks, ap: &AccessPoint) -> String {
    let info = &ap.info;
    let caps = &ap.capabilities;
    let mut lines = vec![
        format!("Name:        {}", info.name),
        format!(
            "Address:     {} ({})",
            info.mac,
            output::or_dash(info.ip_address.as_deref())
        ),
        format!("Status:      {} ({})", info.status, info.status_category),
        format!("LAN Ports:   {}", ap.lan_port_settings.len()),
    ];
    for p in &ap.lan_port_settings {
        lines.push(format!(
            "    Port {}  PoE supported: {} on: {}  VLAN: {} {}",
            p.port_name,
            marks.check(p.support_poe),
            marks.check(p.poe_out_enable),
            marks.check(p.support_vlan && p.local_vlan_enable),
            p.local_vlan_id
        ));
    }
    lines.push(format!("Model:       {}", info.model_display_name));
    lines.push(format!("LED Setting: {}", ap.led_setting));
    lines.push(format!(
        "Uptime:      {}",
        output::or_dash(info.display_uptime())
    ));
    lines.push(format!("WiFi uplink: {}", marks.check(ap.wireless_linked)));
    lines.push(match &ap.wired_uplink {
        Some(uplink) => format!(
            "Uplink:      {} {}",
            output::or_dash(uplink.mac.as_deref()),
            uplink.name
        ),
        None => "Uplink:      <none>".into(),
    });
    lines.push("WiFi Features:".into());
    lines.push(format!("    802.11ac: {}", marks.check(caps.support11ac)));
    lines.push(format!("    5G:       {}", marks.check(caps.support5g)));
    lines.push(format!("    5G2:      {}", marks.check(caps.support5g2)));
    lines.push(format!("    6G:       {}", marks.check(caps.support6g)));
    lines.push(format!("    Mesh:     {}", marks.check(caps.support_mesh)));
    lines.join("\n")
}

pub async fn list(site: &OmadaSiteClient, global: &GlobalOpts) -> Result<(), CliError> {
    let access_points = site.get_access_points().await?;
    let out = output::render_entities(
        global,
        &access_points,
        |ap| AccessPointRow::from(ap),
        |ap| ap.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(
    site: &OmadaSiteClient,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let device = util::find_device(site, identifier).await?;
    let access_point = site.get_access_point(&device).await?;
    let out = output::render_entity(
        global,
        &access_point,
        |ap| detail(marks, ap),
        |ap| ap.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
