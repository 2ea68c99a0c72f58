// Controller version parsing and ordering.
//
// Omada controllers report versions with three or four numeric components
// ("5.9.31", "5.15.24.18"). Missing trailing components compare as zero,
// so "5.1" == "5.1.0" and "5.15.24.18" > "5.15.24".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Oldest controller release this client talks to.
pub const MIN_CONTROLLER_VERSION: ControllerVersion = ControllerVersion::new(5, 1, 0);

/// First release that accepts the 6.x switch-port payload additions.
pub(crate) const V6: ControllerVersion = ControllerVersion::new(6, 0, 0);

/// A dotted numeric controller version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControllerVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl ControllerVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build: 0,
        }
    }

    /// Whether this controller is at or above the supported baseline.
    pub fn is_supported(&self) -> bool {
        *self >= MIN_CONTROLLER_VERSION
    }
}

impl FromStr for ControllerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || Error::UnsupportedControllerVersion {
            version: s.to_owned(),
        };

        let mut parts = [0_u64; 4];
        let mut count = 0;
        for component in s.trim().split('.') {
            let slot = parts.get_mut(count).ok_or_else(unsupported)?;
            // Tolerate pre-release suffixes such as "31-beta".
            let digits: &str = component
                .find(|c: char| !c.is_ascii_digit())
                .map_or(component, |end| &component[..end]);
            *slot = digits.parse().map_err(|_| unsupported())?;
            count += 1;
        }

        let [major, minor, patch, build] = parts;
        Ok(Self {
            major,
            minor,
            patch,
            build,
        })
    }
}

impl fmt::Display for ControllerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.build != 0 {
            write!(f, ".{}", self.build)?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for ControllerVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v(s: &str) -> ControllerVersion {
        s.parse().unwrap()
    }

    #[test]
    fn parses_three_and_four_components() {
        assert_eq!(v("5.9.31"), ControllerVersion::new(5, 9, 31));
        let four = v("5.15.24.18");
        assert_eq!(four.build, 18);
        assert_eq!(four.to_string(), "5.15.24.18");
    }

    #[test]
    fn missing_components_compare_as_zero() {
        assert_eq!(v("5.1"), v("5.1.0"));
        assert!(v("5.15.24.18") > v("5.15.24"));
        assert!(v("10.0.0") > v("5.15.24.18"));
    }

    #[test]
    fn baseline_gate() {
        assert!(!v("5.0.30").is_supported());
        assert!(!v("4.4.8").is_supported());
        assert!(v("5.1.0").is_supported());
        assert!(v("5.13.30.8").is_supported());
        assert!(v("10.0.0").is_supported());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "abc".parse::<ControllerVersion>(),
            Err(Error::UnsupportedControllerVersion { .. })
        ));
        assert!("1.2.3.4.5".parse::<ControllerVersion>().is_err());
        assert!("".parse::<ControllerVersion>().is_err());
    }

    #[test]
    fn tolerates_suffix() {
        assert_eq!(v("5.14.32-beta"), ControllerVersion::new(5, 14, 32));
    }
}
