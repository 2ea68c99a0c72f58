//! Clap derive structures for the `omada` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use omada_api::model::LedSetting;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// omada -- manage TP-Link Omada SDN controllers from the command line
#[derive(Debug, Parser)]
#[command(
    name = "omada",
    version,
    about = "Manage TP-Link Omada networks from the command line",
    long_about = "Query and control devices and clients on a TP-Link Omada SDN controller.\n\n\
        Controllers are addressed through named targets stored in the config file;\n\
        add one with `omada target <name> --url <url> --username <user>`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Target controller to use (defaults to the configured default target)
    #[arg(long, short = 't', env = "OMADA_TARGET", global = true)]
    pub target: Option<String>,

    /// Path of the config file
    #[arg(long, env = "OMADA_CONFIG", global = true, hide_env = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OMADA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Print entities as the raw JSON the controller returned
    #[arg(long, short = 'd', global = true)]
    pub dump: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    /// Output format after applying `--dump`.
    ///
    /// Views the CLI builds itself have no controller payload, so `--dump`
    /// renders them as `--output json`.
    pub fn format(&self) -> OutputFormat {
        if self.dump {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Target name as given; empty selects the default target.
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables and detail views (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, update or delete a named controller target
    Target(TargetArgs),

    /// List the configured targets
    #[command(alias = "t")]
    Targets,

    /// Show the controller's name and version
    ControllerInfo,

    /// List devices managed by the controller
    #[command(alias = "d")]
    Devices,

    /// List switches with their details
    Switches,

    /// Show details about a switch
    Switch(DeviceArg),

    /// Show the ports of a switch
    SwitchPorts(SwitchPortsArgs),

    /// List access points with their details
    AccessPoints,

    /// Show details about an access point
    AccessPoint(DeviceArg),

    /// Show details about the site's gateway
    Gateway(GatewayArgs),

    /// List clients connected to the site network
    #[command(alias = "c")]
    Clients,

    /// List every client the site has seen
    KnownClients,

    /// Show details of a client
    Client(ClientArg),

    /// Block a client from the network
    BlockClient(ClientArg),

    /// Unblock a client
    UnblockClient(ClientArg),

    /// Set the name of a client
    SetClientName(SetClientNameArgs),

    /// Show or change the PoE state of a device port
    Poe(PoeArgs),

    /// Show or change the internet state of a gateway WAN port
    Wan(WanArgs),

    /// Show firmware versions and available updates
    Firmware(FirmwareArgs),

    /// Set the LED mode of a device
    SetDeviceLed(SetDeviceLedArgs),

    /// Reboot the controller
    Reboot,

    /// Upload and enable a certificate for the controller's web interface
    SetCertificate(SetCertificateArgs),
}

// ── Targets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Name of the target
    pub name: String,

    /// The URL of the Omada controller
    #[arg(long)]
    pub url: Option<String>,

    /// The name of the user used to authenticate
    #[arg(long)]
    pub username: Option<String>,

    /// The user's password; prompted for when a new target has none
    #[arg(long)]
    pub password: Option<String>,

    /// The Omada site to control
    #[arg(long)]
    pub site: Option<String>,

    /// Make this the default target
    #[arg(long, short = 's')]
    pub set_default: bool,

    /// Verify the controller's TLS certificate (default for new targets)
    #[arg(long, conflicts_with = "no_verify_ssl")]
    pub verify_ssl: bool,

    /// Do not verify the controller's TLS certificate
    #[arg(long)]
    pub no_verify_ssl: bool,

    /// Delete the target instead
    #[arg(long, conflicts_with_all = ["url", "username", "password", "site", "set_default"])]
    pub delete: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArg {
    /// The MAC address or name of the device
    pub device: String,
}

#[derive(Debug, Args)]
pub struct SwitchPortsArgs {
    /// The MAC address or name of the switch
    pub device: String,

    /// Only show this port
    #[arg(long, short = 'p')]
    pub port: Option<u32>,

    /// One line per port instead of detail blocks
    #[arg(long)]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct GatewayArgs {
    /// The MAC address or name of the gateway (defaults to the site's gateway)
    #[arg(long)]
    pub mac: Option<String>,
}

#[derive(Debug, Args)]
pub struct PoeArgs {
    /// The MAC address or name of the gateway, switch or access point
    pub device: String,

    /// Port number on the device
    #[arg(long, short = 'p')]
    pub port: u32,

    /// Turn PoE on
    #[arg(long, conflicts_with = "off")]
    pub on: bool,

    /// Turn PoE off
    #[arg(long)]
    pub off: bool,
}

impl PoeArgs {
    /// Requested state; `None` only shows the current state.
    pub fn requested(&self) -> Option<bool> {
        match (self.on, self.off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct WanArgs {
    /// The MAC address or name of the gateway (defaults to the site's gateway)
    #[arg(long)]
    pub mac: Option<String>,

    /// WAN port number
    #[arg(long, short = 'p')]
    pub port: u32,

    /// Connect the port to the internet
    #[arg(long, conflicts_with = "disconnect")]
    pub connect: bool,

    /// Disconnect the port from the internet
    #[arg(long)]
    pub disconnect: bool,

    /// Act on the IPv6 connection instead of IPv4
    #[arg(long)]
    pub ipv6: bool,
}

impl WanArgs {
    pub fn requested(&self) -> Option<bool> {
        match (self.connect, self.disconnect) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct FirmwareArgs {
    /// Show release notes for available updates
    #[arg(long, short = 'r')]
    pub release_notes: bool,
}

#[derive(Debug, Args)]
pub struct SetDeviceLedArgs {
    /// The MAC address or name of the device
    pub device: String,

    /// LED mode to set
    pub mode: LedMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LedMode {
    On,
    Off,
    /// Follow the site-wide LED setting
    SiteSettings,
}

impl From<LedMode> for LedSetting {
    fn from(mode: LedMode) -> Self {
        match mode {
            LedMode::On => Self::On,
            LedMode::Off => Self::Off,
            LedMode::SiteSettings => Self::SiteSettings,
        }
    }
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientArg {
    /// The MAC address or name of the client
    pub client: String,
}

#[derive(Debug, Args)]
pub struct SetClientNameArgs {
    /// The MAC address or name of the client
    pub client: String,

    /// New name of the client
    pub name: String,
}

// ── Controller ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetCertificateArgs {
    /// Certificate file in PKCS#12 (.pfx) format
    pub cert_file: PathBuf,

    /// Certificate password; prompted for when omitted
    #[arg(long, short = 'p')]
    pub password: Option<String>,
}
