// Typed views over controller responses
//
// Each view is parsed once from the raw JSON with explicit per-field
// defaults, so a missing optional field never fails a whole response.

pub mod access_points;
pub mod clients;
pub mod controller;
pub mod definitions;
pub mod devices;
pub mod gateways;
pub mod switches;

mod lenient;
pub(crate) mod raw;

pub use access_points::{AccessPoint, AccessPointCapabilities, AccessPointLanPortSettings};
pub use clients::{
    Client, ClientDetailFields, ClientDetails, ClientInfo, ClientKind, IpSetting, RateLimit,
    WiredClientInfo, WirelessClientInfo,
};
pub use controller::{ControllerInfo, InterfaceDetails, RebootResult, Site};
pub use definitions::{
    AuthenticationStatus, BandwidthControl, ConnectType, DeviceStatus, DeviceStatusCategory,
    Eth802Dot1X, GatewayPortMode, GatewayPortType, LedSetting, LinkDuplex, LinkSpeed, LinkStatus,
    NetworkTagsSetting, PoeMode, PortType, RadioId, WifiMode,
};
pub use devices::{Device, DeviceInfo, DeviceType, FirmwareUpdate, Link, PortStatus};
pub use gateways::{Gateway, GatewayPortConfig, GatewayPortStatus, WanPortIpv6Config};
pub use raw::RawData;
pub use switches::{
    PortProfile, PortProfileSettings, Switch, SwitchDeviceCaps, SwitchPort, SwitchPortDetails,
    SwitchPortStatus,
};
