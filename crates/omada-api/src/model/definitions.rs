// Integer-coded enumerations used on the wire
//
// Every enum serialises as its controller integer and deserialises
// leniently: a value this client does not recognise becomes `Unknown(n)`
// instead of failing the whole response.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident default $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "i64", into = "i64")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not know about.
            Unknown(i64),
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                match value {
                    $( $value => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value, )+
                    $name::Unknown(other) => other,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$variant => f.write_str(stringify!($variant)), )+
                    Self::Unknown(other) => write!(f, "Unknown({other})"),
                }
            }
        }
    };
}

wire_enum! {
    /// Fine-grained device state.
    pub enum DeviceStatus default Disconnected {
        Disconnected = 0,
        DisconnectedMigrating = 1,
        Provisioning = 10,
        Configuring = 11,
        Upgrading = 12,
        Rebooting = 13,
        Connected = 14,
        ConnectedWireless = 15,
        ConnectedMigrating = 16,
        ConnectedWirelessMigrating = 17,
        Pending = 20,
        PendingWireless = 21,
        Adopting = 22,
        AdoptingWireless = 23,
        AdoptFailed = 24,
        AdoptFailedWireless = 25,
        ManagedExternally = 26,
        ManagedExternallyWireless = 27,
        HeartbeatMissed = 30,
        HeartbeatMissedWireless = 31,
        HeartbeatMissedMigrating = 32,
        HeartbeatMissedWirelessMigrating = 33,
        Isolated = 40,
        IsolatedMigrating = 41,
    }
}

wire_enum! {
    /// Coarse device state; several fields are only meaningful when `Connected`.
    pub enum DeviceStatusCategory default Disconnected {
        Disconnected = 0,
        Connected = 1,
        Pending = 2,
        HeartbeatMissed = 3,
        Isolated = 4,
    }
}

wire_enum! {
    pub enum PortType default Copper {
        Copper = 1,
        Combo = 2,
        Sfp = 3,
    }
}

wire_enum! {
    pub enum GatewayPortType default Wan {
        Wan = 0,
        WanLan = 1,
        Lan = 2,
        SfpWan = 3,
    }
}

wire_enum! {
    pub enum GatewayPortMode default Disabled {
        Disabled = -1,
        Wan = 0,
        Lan = 1,
    }
}

wire_enum! {
    pub enum LinkStatus default Down {
        Down = 0,
        Up = 1,
    }
}

wire_enum! {
    pub enum LinkSpeed default Auto {
        Auto = 0,
        Speed10Mbps = 1,
        Speed100Mbps = 2,
        Speed1Gbps = 3,
        Speed2_5Gbps = 4,
        Speed10Gbps = 5,
    }
}

wire_enum! {
    pub enum LinkDuplex default Auto {
        Auto = 0,
        Half = 1,
        Full = 2,
    }
}

wire_enum! {
    /// 802.1X port control mode.
    pub enum Eth802Dot1X default ForceAuthorized {
        ForceUnauthorized = 0,
        ForceAuthorized = 1,
        Auto = 2,
    }
}

wire_enum! {
    pub enum BandwidthControl default Off {
        Off = 0,
        RateLimit = 1,
        StormControl = 2,
    }
}

wire_enum! {
    /// PoE output mode. `None` means the port has no PoE at all.
    pub enum PoeMode default None {
        None = -1,
        Disabled = 0,
        Enabled = 1,
        UseDeviceSettings = 2,
    }
}

wire_enum! {
    pub enum AuthenticationStatus default Connected {
        Connected = 0,
        Pending = 1,
        Authorized = 2,
        AuthFree = 3,
    }
}

wire_enum! {
    pub enum ConnectType default Wired {
        GuestWireless = 0,
        Wireless = 1,
        Wired = 2,
    }
}

wire_enum! {
    pub enum RadioId default Freq2_4 {
        Freq2_4 = 0,
        Freq5_1 = 1,
        Freq5_2 = 2,
        Freq6 = 3,
    }
}

wire_enum! {
    pub enum WifiMode default Ac {
        A = 0,
        B = 1,
        G = 2,
        Na = 3,
        Ng = 4,
        Ac = 5,
        Axa = 6,
        Axg = 7,
    }
}

wire_enum! {
    /// Onboard LED behaviour.
    pub enum LedSetting default SiteSettings {
        Off = 0,
        On = 1,
        SiteSettings = 2,
    }
}

wire_enum! {
    /// Which networks a switch port carries tagged.
    pub enum NetworkTagsSetting default All {
        All = 0,
        Block = 1,
        Custom = 2,
    }
}
