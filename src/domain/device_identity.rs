use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Canonical device identity: the station MAC with its colon separators stripped and
/// upper-cased, exactly 12 hexadecimal characters. Firmware storage directories must be
/// named in this canonical form, as all lookups go through this type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn parse(value: &str) -> Result<DeviceIdentity, MalformedIdentity> {
        let normalized = value.replace(':', "").to_uppercase();
        if normalized.len() == 12 && normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(DeviceIdentity(normalized))
        } else {
            Err(MalformedIdentity)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeviceIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[error("Header: station mac")]
pub struct MalformedIdentity;
