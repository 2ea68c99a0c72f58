// omada-api: Async Rust client for the TP-Link Omada SDN controller API
//
// `OmadaClient` covers controller-wide calls and hands out one
// `OmadaSiteClient` per site. Both share a single `ApiConnection`, which
// logs in on demand and unwraps the controller's response envelope.

pub mod auth;
pub mod client;
pub mod clock;
pub mod connection;
pub mod error;
pub mod model;
pub mod site;
pub mod transport;
pub mod version;

pub use auth::{ConnectionConfig, Credentials, DEFAULT_LOGIN_FRESHNESS};
pub use client::{OmadaClient, SiteRef};
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::{ApiConnection, ControllerIdentity, PAGE_SIZE};
pub use error::Error;
pub use site::{
    AccessPointPortSettings, ClientRef, ClientSettings, DeviceRef, FixedAddress,
    GatewayPortSettings, OmadaSiteClient, PortProfileOverrides, SwitchPortSettings,
};
pub use transport::{TlsMode, TransportConfig};
pub use version::{ControllerVersion, MIN_CONTROLLER_VERSION};
