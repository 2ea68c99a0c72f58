//! Device command handlers: listing, firmware, LEDs and PoE.

use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use omada_api::model::{Device, DeviceType, FirmwareUpdate, PoeMode, RawData};
use omada_api::{
    AccessPointPortSettings, DeviceRef, GatewayPortSettings, OmadaSiteClient,
    PortProfileOverrides, SwitchPortSettings,
};

use crate::cli::{FirmwareArgs, GlobalOpts, OutputFormat, PoeArgs, SetDeviceLedArgs};
use crate::error::CliError;
use crate::output::{self, Marks};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let info = &d.info;
        Self {
            mac: info.mac.clone(),
            ip: output::or_dash(info.ip_address.as_deref()).to_owned(),
            dtype: info.device_type.to_string(),
            name: info.name.clone(),
            model: info.model_display_name.clone(),
            status: info.status_category.to_string(),
            uptime: info
                .uptime()
                .map_or_else(|| "-".into(), output::display_duration),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceFirmware {
    name: String,
    mac: String,
    #[serde(flatten)]
    firmware: FirmwareUpdate,
}

impl RawData for DeviceFirmware {
    fn raw_data(&self) -> &Value {
        self.firmware.raw_data()
    }
}

#[derive(Tabled)]
struct FirmwareRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Status")]
    status: String,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(site: &OmadaSiteClient, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = site.get_devices().await?;
    let out = output::render_entities(
        global,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.info.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn firmware(
    site: &OmadaSiteClient,
    args: &FirmwareArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marks = Marks::new(global);
    let mut entries = Vec::new();
    for device in site.get_devices().await? {
        let firmware = site.get_firmware_details(&device).await?;
        entries.push(DeviceFirmware {
            name: device.info.name,
            mac: device.info.mac,
            firmware,
        });
    }

    let mut out = output::render_entities(
        global,
        &entries,
        |e| FirmwareRow {
            name: e.name.clone(),
            current: e.firmware.current_version.clone(),
            latest: output::or_dash(Some(e.firmware.latest_version.as_str())).to_owned(),
            status: if e.firmware.upgrade_available() {
                marks.warn("update available")
            } else {
                "up to date".into()
            },
        },
        |e| e.mac.clone(),
    )?;

    if args.release_notes && global.format() == OutputFormat::Table {
        for e in entries.iter().filter(|e| e.firmware.upgrade_available()) {
            if !e.firmware.release_notes.is_empty() {
                let _ = write!(
                    out,
                    "\n\n{} ({}):\n{}",
                    e.name, e.firmware.latest_version, e.firmware.release_notes
                );
            }
        }
    }
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn set_led(
    site: &OmadaSiteClient,
    args: SetDeviceLedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = util::find_device(site, &args.device).await?;
    site.set_led_setting(&device, args.mode.into()).await?;
    output::print_status(
        &format!("LED mode of {} set to {:?}", device.info.name, args.mode),
        global.quiet,
    );
    Ok(())
}

/// Show or change the PoE state of one port of a switch, gateway or access point.
#[allow(clippy::too_many_lines)]
pub async fn poe(
    site: &OmadaSiteClient,
    args: &PoeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = util::find_device(site, &args.device).await?;
    let name = device.info.name.clone();
    let change = args.requested();

    let out = match device.info.device_type {
        DeviceType::Switch => {
            let port = match change {
                Some(on) => {
                    let settings = SwitchPortSettings {
                        profile_override_enabled: Some(true),
                        profile_overrides: Some(PortProfileOverrides {
                            enable_poe: Some(on),
                            ..PortProfileOverrides::default()
                        }),
                        ..SwitchPortSettings::default()
                    };
                    site.update_switch_port(&device, args.port, &settings).await?
                }
                None => site.get_switch_port(&device, args.port).await?,
            };
            let line = format!("Switch {name} port {} PoE is {}", args.port, port.settings.poe);
            output::render_entity(global, &port, |_| line.clone(), |p| {
                p.port.port.to_string()
            })?
        }
        DeviceType::Gateway => {
            let gateway = Some(DeviceRef::from(&device));
            let port = match change {
                Some(on) => {
                    let settings = GatewayPortSettings {
                        enable_poe: Some(on),
                    };
                    site.set_gateway_port_settings(args.port, settings, gateway).await?
                }
                None => site.get_gateway_port(args.port, gateway).await?,
            };
            let line = format!("Gateway {name} port {} PoE is {}", args.port, port.poe_mode);
            output::render_entity(global, &port, |_| line.clone(), |p| {
                p.port_number.to_string()
            })?
        }
        DeviceType::Ap => {
            let port_name = format!("ETH{}", args.port);
            let port = match change {
                Some(on) => {
                    let settings = AccessPointPortSettings {
                        enable_poe: Some(on),
                        ..AccessPointPortSettings::default()
                    };
                    site.update_access_point_port(&device, &port_name, settings).await?
                }
                None => site.get_access_point_port(&device, &port_name).await?,
            };
            let mode = if port.poe_out_enable {
                PoeMode::Enabled
            } else if port.support_poe {
                PoeMode::Disabled
            } else {
                PoeMode::None
            };
            let line = format!("Access point {name} port {} PoE is {mode}", port.port_name);
            output::render_entity(global, &port, |_| line.clone(), |p| {
                p.port_name.clone()
            })?
        }
        DeviceType::Other => {
            return Err(CliError::InvalidDevice {
                message: format!("Device {name} does not have manageable PoE ports"),
            });
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
