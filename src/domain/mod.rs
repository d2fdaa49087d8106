mod device_identity;
mod firmware;
mod sketch_hash;
mod update_request;

pub use device_identity::{DeviceIdentity, MalformedIdentity};
pub use firmware::Firmware;
pub use sketch_hash::{MalformedHash, SketchHash};
pub use update_request::UpdateRequest;
