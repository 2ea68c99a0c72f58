//! Controller-wide commands: info, reboot, certificate upload.

use secrecy::SecretString;
use serde::Serialize;

use omada_api::OmadaClient;

use crate::cli::{GlobalOpts, SetCertificateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControllerSummary {
    name: String,
    version: String,
    controller_id: String,
    url: String,
}

fn detail(c: &ControllerSummary) -> String {
    [
        format!("Controller name:    {}", c.name),
        format!("Controller version: {}", c.version),
        format!("Controller id:      {}", c.controller_id),
        format!("URL:                {}", c.url),
    ]
    .join("\n")
}

pub async fn info(client: &OmadaClient, global: &GlobalOpts) -> Result<(), CliError> {
    let api = client.connection();
    let summary = ControllerSummary {
        name: client.get_controller_name().await?,
        version: api.controller_version().await?.to_string(),
        controller_id: api.controller_id().unwrap_or_default(),
        url: api.base_url().to_string(),
    };
    let out = output::render_single(global.format(), &summary, detail, |c| c.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn reboot(client: &OmadaClient, global: &GlobalOpts) -> Result<(), CliError> {
    let reboot_time = client.reboot().await?;
    output::print_status(
        &format!(
            "Controller is rebooting, and should be back up in approximately {reboot_time} seconds."
        ),
        global.quiet,
    );
    Ok(())
}

pub async fn set_certificate(
    client: &OmadaClient,
    args: SetCertificateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = match args.password {
        Some(password) => password,
        None => util::prompt_secret("Certificate password: ")?,
    };
    let password = SecretString::from(password);

    let cert_id = client.set_certificate(&args.cert_file, &password).await?;
    tracing::debug!(%cert_id, "certificate enabled");
    output::print_status(
        "Certificate uploaded successfully, and enabled. Please reboot the controller to apply the changes.",
        global.quiet,
    );
    Ok(())
}
