use std::path::PathBuf;

/// A firmware image discovered on disk, tagged with the version parsed from its file name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Firmware {
    pub path: PathBuf,
    pub version: u32,
}
