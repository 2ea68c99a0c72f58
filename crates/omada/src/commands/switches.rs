//! Switch command handlers.

use tabled::Tabled;

use omada_api::OmadaSiteClient;
use omada_api::model::{PoeMode, PortType, Switch, SwitchPortDetails};

use crate::cli::{GlobalOpts, OutputFormat, SwitchPortsArgs};
use crate::error::CliError;
use crate::output::{self, Marks};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Ports")]
    ports: u32,
    #[tabled(rename = "PoE Ports")]
    poe_ports: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Switch> for SwitchRow {
    fn from(s: &Switch) -> Self {
        Self {
            mac: s.info.mac.clone(),
            name: s.info.name.clone(),
            model: s.info.model_display_name.clone(),
            ip: output::or_dash(s.info.ip_address.as_deref()).to_owned(),
            ports: s.number_of_ports(),
            poe_ports: s.device_capabilities.poe_port_num,
            status: s.info.status_category.to_string(),
        }
    }
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "No.")]
    port: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Profile")]
    profile: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Override")]
    overridden: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "PoE")]
    poe: String,
    #[tabled(rename = "Received")]
    rx: String,
    #[tabled(rename = "Transmitted")]
    tx: String,
}

fn supports_poe(switch: &Switch, port: &SwitchPortDetails) -> bool {
    switch.device_capabilities.poe_support && port.port.port_type != PortType::Sfp
}

fn poe_summary(marks: Marks, switch: &Switch, port: &SwitchPortDetails) -> String {
    if !supports_poe(switch, port) {
        return "not supported".into();
    }
    let status = &port.port.port_status;
    let power = status
        .poe_power
        .map_or_else(String::new, |w| format!(" {w:.1}W"));
    format!(
        "{} active {}{power}",
        marks.check(port.settings.poe == PoeMode::Enabled),
        marks.check(status.poe)
    )
}

fn port_row(marks: Marks, switch: &Switch, p: &SwitchPortDetails) -> PortRow {
    let status = &p.port.port_status;
    PortRow {
        port: p.port.port,
        name: p.port.name.clone(),
        profile: p.profile_name.clone(),
        enabled: marks.check(!p.port.disable),
        overridden: marks.check(p.has_profile_override),
        link: marks.link(status.link_status),
        speed: status.link_speed.to_string(),
        poe: poe_summary(marks, switch, p),
        rx: output::display_bytes(status.rx),
        tx: output::display_bytes(status.tx),
    }
}

fn port_detail(marks: Marks, switch: &Switch, p: &SwitchPortDetails) -> String {
    let status = &p.port.port_status;
    [
        format!("Port: {:2} - {}", p.port.port, p.port.name),
        format!("    Type:        {}", p.port.port_type),
        format!(
            "    Profile:     {} (override {})",
            p.profile_name,
            marks.check(p.has_profile_override)
        ),
        format!("    Enabled:     {}", marks.check(!p.port.disable)),
        format!("    Status:      {}", marks.link(status.link_status)),
        format!("    PoE:         {}", poe_summary(marks, switch, p)),
        format!(
            "    Link Speed:  {} (max {})",
            status.link_speed, p.max_speed
        ),
        format!("    Transmitted: {}", output::display_bytes(status.tx)),
        format!("    Received:    {}", output::display_bytes(status.rx)),
        format!("    Operation:   {}", p.port.operation),
        format!("    Limit Mode:  {}", p.settings.bandwidth_control),
    ]
    .join("\n")
}

fn detail(s: &Switch) -> String {
    let info = &s.info;
    let mut lines = vec![
        format!("Name:         {}", info.name),
        format!(
            "Address:      {} ({})",
            info.mac,
            output::or_dash(info.ip_address.as_deref())
        ),
        format!("Status:       {} ({})", info.status, info.status_category),
        format!("Ports:        {}", s.number_of_ports()),
        format!("Supports PoE: {}", s.device_capabilities.poe_support),
    ];
    if s.device_capabilities.poe_support {
        lines.push(format!("PoE ports:    {}", s.device_capabilities.poe_port_num));
    }
    lines.push(format!("Model:        {}", info.model_display_name));
    lines.push(format!("Firmware:     {}", info.firmware_version));
    lines.push(format!("LED Setting:  {}", s.led_setting));
    lines.push(format!(
        "Uptime:       {}",
        output::or_dash(info.display_uptime())
    ));
    if let Some(uplink) = &s.uplink {
        lines.push(format!(
            "Uplink:       {} {} (port {})",
            output::or_dash(uplink.mac.as_deref()),
            uplink.name,
            uplink.port
        ));
    }
    if !s.downlinks.is_empty() {
        lines.push("Downlink devices:".into());
        for downlink in &s.downlinks {
            lines.push(format!(
                "  - {} {} (port {})",
                output::or_dash(downlink.mac.as_deref()),
                downlink.name,
                downlink.port
            ));
        }
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(site: &OmadaSiteClient, global: &GlobalOpts) -> Result<(), CliError> {
    let switches = site.get_switches().await?;
    let out = output::render_entities(
        global,
        &switches,
        |s| SwitchRow::from(s),
        |s| s.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(
    site: &OmadaSiteClient,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = util::find_device(site, identifier).await?;
    let switch = site.get_switch(&device).await?;
    let out = output::render_entity(global, &switch, detail, |s| s.info.mac.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn ports(
    site: &OmadaSiteClient,
    args: &SwitchPortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let device = util::find_device(site, &args.device).await?;
    let switch = site.get_switch(&device).await?;
    let mut ports = site.get_switch_ports(&device).await?;
    if let Some(wanted) = args.port {
        ports.retain(|p| p.port.port == wanted);
        if ports.is_empty() {
            return Err(CliError::not_found(
                "port",
                &wanted.to_string(),
                &format!("switch-ports {}", args.device),
            ));
        }
    }

    let out = if global.format() == OutputFormat::Table && !args.table {
        ports
            .iter()
            .map(|p| port_detail(marks, &switch, p))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        output::render_entities(
            global,
            &ports,
            |p| port_row(marks, &switch, p),
            |p| p.port.port.to_string(),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
