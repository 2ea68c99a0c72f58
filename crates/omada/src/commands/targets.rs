//! Target management: add, update, delete and list named controllers.

use serde::Serialize;
use tabled::Tabled;

use omada_api::OmadaClient;

use crate::cli::{GlobalOpts, TargetArgs};
use crate::config::{self, Target};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

/// Listing entry; never carries the password.
#[derive(Clone, Serialize, Tabled)]
struct TargetRow {
    #[tabled(rename = "", display_with = "default_marker")]
    #[serde(rename = "default")]
    is_default: bool,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Verify TLS")]
    verify_ssl: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn default_marker(is_default: &bool) -> String {
    if *is_default { "*".into() } else { String::new() }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config(global)?;
    let rows: Vec<TargetRow> = cfg
        .targets()
        .map(|(name, target, is_default)| TargetRow {
            is_default,
            name: name.to_owned(),
            url: target.url.clone(),
            site: target.site.clone(),
            username: target.username.clone(),
            verify_ssl: target.verify_ssl,
        })
        .collect();

    let out = output::render_list(global.format(), &rows, TargetRow::clone, |r| r.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_target(args: TargetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config(global)?;

    if args.delete {
        cfg.delete_target(&args.name)?;
        config::save_config(&cfg, global)?;
        output::print_status(&format!("Deleted target {}", args.name), global.quiet);
        return Ok(());
    }

    let target = match cfg.targets.get(&args.name) {
        Some(existing) => updated_target(existing.clone(), &args),
        None => new_target(&args)?,
    };

    let controller_name = validate(&target).await?;
    cfg.set_target(&args.name, target.clone(), args.set_default)?;
    config::save_config(&cfg, global)?;

    output::print_status(
        &format!(
            "Set target {} to controller {controller_name} and site {}",
            args.name, target.site
        ),
        global.quiet,
    );
    Ok(())
}

fn updated_target(mut target: Target, args: &TargetArgs) -> Target {
    if let Some(url) = &args.url {
        target.url.clone_from(url);
    }
    if let Some(username) = &args.username {
        target.username.clone_from(username);
    }
    if let Some(password) = &args.password {
        target.password.clone_from(password);
    }
    if let Some(site) = &args.site {
        target.site.clone_from(site);
    }
    if args.verify_ssl {
        target.verify_ssl = true;
    } else if args.no_verify_ssl {
        target.verify_ssl = false;
    }
    target
}

fn new_target(args: &TargetArgs) -> Result<Target, CliError> {
    let (Some(url), Some(username)) = (&args.url, &args.username) else {
        return Err(CliError::Validation {
            field: "target".into(),
            reason: "--url and --username are required for new targets".into(),
        });
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => util::prompt_secret("Password: ")?,
    };

    let mut target = Target::new(url.clone(), username.clone(), password);
    if let Some(site) = &args.site {
        target.site.clone_from(site);
    }
    target.verify_ssl = !args.no_verify_ssl;
    Ok(target)
}

/// Log in with the target's settings and check its site exists.
/// Returns the controller's name.
async fn validate(target: &Target) -> Result<String, CliError> {
    let client = target.to_client()?;
    client
        .with_session(async |client: &OmadaClient| {
            let name = client.get_controller_name().await?;
            let sites = client.get_sites().await?;
            if sites.iter().any(|s| s.name == target.site) {
                return Ok(name);
            }
            let available: Vec<&str> = sites.iter().map(|s| s.name.as_str()).collect();
            Err(CliError::Validation {
                field: "site".into(),
                reason: format!(
                    "no site named '{}' on controller {name}; available sites: {}",
                    target.site,
                    available.join(", ")
                ),
            })
        })
        .await
}
