//! Command dispatch: bridges CLI args -> omada-api calls -> output formatting.

pub mod access_points;
pub mod clients;
pub mod controller;
pub mod devices;
pub mod gateways;
pub mod switches;
pub mod targets;
pub mod util;

use omada_api::OmadaClient;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &OmadaClient,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::ControllerInfo => controller::info(client, global).await,
        Command::Reboot => controller::reboot(client, global).await,
        Command::SetCertificate(args) => controller::set_certificate(client, args, global).await,

        site_cmd => {
            let site = client.get_site_client(&target.site).await?;
            match site_cmd {
                Command::Devices => devices::list(&site, global).await,
                Command::Firmware(args) => devices::firmware(&site, &args, global).await,
                Command::SetDeviceLed(args) => devices::set_led(&site, args, global).await,
                Command::Poe(args) => devices::poe(&site, &args, global).await,

                Command::Switches => switches::list(&site, global).await,
                Command::Switch(args) => switches::show(&site, &args.device, global).await,
                Command::SwitchPorts(args) => switches::ports(&site, &args, global).await,

                Command::AccessPoints => access_points::list(&site, global).await,
                Command::AccessPoint(args) => {
                    access_points::show(&site, &args.device, global).await
                }

                Command::Gateway(args) => gateways::show(&site, args.mac.as_deref(), global).await,
                Command::Wan(args) => gateways::wan(&site, &args, global).await,

                Command::Clients => clients::list(&site, false, global).await,
                Command::KnownClients => clients::list(&site, true, global).await,
                Command::Client(args) => clients::show(&site, &args.client, global).await,
                Command::BlockClient(args) => {
                    clients::set_blocked(&site, &args.client, true, global).await
                }
                Command::UnblockClient(args) => {
                    clients::set_blocked(&site, &args.client, false, global).await
                }
                Command::SetClientName(args) => clients::set_name(&site, &args, global).await,

                // Handled above or before a session is opened
                Command::Target(_)
                | Command::Targets
                | Command::ControllerInfo
                | Command::Reboot
                | Command::SetCertificate(_) => unreachable!(),
            }
        }
    }
}
