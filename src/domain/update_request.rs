use crate::domain::{DeviceIdentity, SketchHash};

/// One device's self-reported state, valid for a single update negotiation. The last four
/// fields are diagnostics the device sends along; they are logged but never interpreted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UpdateRequest {
    pub identity: DeviceIdentity,
    pub sketch_version: u32,
    pub sketch_hash: SketchHash,
    pub chip_size: String,
    pub free_space: String,
    pub sketch_size: String,
    pub sdk_version: String,
}
