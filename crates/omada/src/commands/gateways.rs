//! Gateway command handlers.

use omada_api::model::{Device, Gateway, GatewayPortMode, GatewayPortStatus};
use omada_api::{DeviceRef, OmadaSiteClient};

use crate::cli::{GlobalOpts, WanArgs};
use crate::error::CliError;
use crate::output::{self, Marks};

use super::util;

fn detail(marks: Marks, g: &Gateway) -> String {
    let info = &g.info;
    let mut lines = vec![
        format!("Name:         {}", info.name),
        format!(
            "Address:      {} ({})",
            info.mac,
            output::or_dash(info.ip_address.as_deref())
        ),
        format!("Status:       {} ({})", info.status, info.status_category),
        format!("Ports:        {}", g.number_of_ports),
        format!("Supports PoE: {}", g.supports_poe),
        format!("Model:        {}", info.model_display_name),
        format!(
            "Uptime:       {}",
            output::or_dash(info.display_uptime())
        ),
        "WAN Ports:".into(),
    ];
    for p in g.port_status.iter().filter(|p| p.mode == GatewayPortMode::Wan) {
        lines.push(format!(
            "    Port: {:>2} {:7} {:>15} {:>8} {}",
            p.port_number,
            p.port_type.to_string(),
            output::or_dash(p.ip.as_deref()),
            output::or_dash(p.proto.as_deref()),
            marks.check(p.wan_connected())
        ));
    }
    lines.push("LAN Ports:".into());
    for p in g.port_status.iter().filter(|p| p.mode == GatewayPortMode::Lan) {
        lines.push(format!(
            "    Port: {:>2} {:7} {}",
            p.port_number,
            p.port_type.to_string(),
            marks.link(p.status)
        ));
    }
    lines.push(format!("LED Setting:  {}", g.led_setting));
    lines.join("\n")
}

fn wan_detail(marks: Marks, p: &GatewayPortStatus) -> String {
    let mut lines = vec![
        format!("Port:      {}", p.port_number),
        format!("Name:      {} ({})", p.display_name(), p.name),
        format!("Link:      {}", marks.link(p.status)),
        format!("Mode:      {}", p.mode),
        format!(
            "IPv4:      {} {}",
            marks.check(p.wan_connected()),
            if p.wan_connected() {
                output::or_dash(p.ip.as_deref())
            } else {
                ""
            }
        ),
        format!("IPv4Proto: {}", output::or_dash(p.proto.as_deref())),
    ];
    if p.wan_ipv6_enabled() {
        lines.push(format!(
            "IPv6:      {} {}",
            marks.check(p.ipv6_wan_connected()),
            if p.ipv6_wan_connected() {
                output::or_dash(p.ipv6_address())
            } else {
                ""
            }
        ));
    }
    lines.push(format!("Online:    {}", marks.check(p.online_detection)));
    lines.push(format!("Speed:     {}", p.speed));
    lines.push(format!("Duplex:    {}", p.duplex));
    lines.join("\n")
}

/// Look up the gateway named on the command line, if any.
async fn named_gateway(
    site: &OmadaSiteClient,
    identifier: Option<&str>,
) -> Result<Option<Device>, CliError> {
    match identifier {
        Some(identifier) => Ok(Some(util::find_device(site, identifier).await?)),
        None => Ok(None),
    }
}

pub async fn show(
    site: &OmadaSiteClient,
    identifier: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let device = named_gateway(site, identifier).await?;
    let gateway = site.get_gateway(device.as_ref().map(DeviceRef::from)).await?;
    let out = output::render_entity(
        global,
        &gateway,
        |g| detail(marks, g),
        |g| g.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Show a WAN port, optionally connecting or disconnecting it first.
pub async fn wan(site: &OmadaSiteClient, args: &WanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let device = named_gateway(site, args.mac.as_deref()).await?;
    let gateway_ref = device.as_ref().map(DeviceRef::from);
    let gateway = site.get_gateway(gateway_ref).await?;

    let mut port = gateway
        .port_status
        .into_iter()
        .find(|p| p.port_number == args.port)
        .ok_or_else(|| CliError::not_found("port", &args.port.to_string(), "gateway"))?;

    if port.mode != GatewayPortMode::Wan {
        return Err(CliError::Validation {
            field: "port".into(),
            reason: format!("port {} is not in WAN mode", args.port),
        });
    }

    if let Some(connect) = args.requested() {
        if args.ipv6 && !port.wan_ipv6_enabled() {
            return Err(CliError::Validation {
                field: "ipv6".into(),
                reason: format!("port {} is not configured for IPv6", args.port),
            });
        }
        port = site
            .set_gateway_wan_port_connect_state(args.port, connect, gateway_ref, args.ipv6)
            .await?;
        output::print_status(
            "Ok! Note that the gateway may take a few seconds or more to apply the change.",
            global.quiet,
        );
    }

    let out = output::render_entity(
        global,
        &port,
        |p| wan_detail(marks, p),
        |p| p.port_number.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
