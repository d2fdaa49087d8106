use crate::domain::{DeviceIdentity, Firmware};
use std::path::PathBuf;
use tokio::fs;
use tokio_stream::wrappers::ReadDirStream;
use tokio_stream::StreamExt;
use tracing::{instrument, warn};

const FIRMWARE_PREFIX: &str = "firmware-sketch-";
const FIRMWARE_SUFFIX: &str = ".bin";

/// Finds the firmware images stored for a device. Images live in a directory named by the
/// canonical identity (`<root>/<IDENTITY>/firmware-sketch-<version>.bin`); since lookups
/// only accept a [`DeviceIdentity`], a directory named in any other form is never found.
/// The catalog is rebuilt from disk on every request, nothing is cached.
#[derive(Clone, Debug)]
pub struct FirmwareRepository {
    root: PathBuf,
}

impl FirmwareRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FirmwareRepository { root: root.into() }
    }

    /// Returns all firmwares of the device, sorted ascending by version. Files sharing a
    /// version number are ordered by file name, so the newest pick is deterministic.
    #[instrument(skip_all, fields(identity = %identity))]
    pub async fn list_firmwares(&self, identity: &DeviceIdentity) -> Vec<Firmware> {
        let path = self.root.join(identity.as_str());
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Vec::new(),
        }

        let dir = match fs::read_dir(&path).await {
            Ok(dir) => dir,
            Err(err) => {
                warn!("⚠️ Unable to read '{}': {}", path.display(), err);
                return Vec::new();
            }
        };

        let mut firmwares = Vec::new();
        let mut entries = ReadDirStream::new(dir);
        while let Some(entry) = entries.next().await {
            match entry {
                Ok(entry) => {
                    if let Some(firmware) = firmware_from_path(entry.path()) {
                        firmwares.push(firmware);
                    }
                }
                Err(err) => warn!("⚠️ Unable to read directory entry: {}", err),
            }
        }

        firmwares.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.path.cmp(&b.path)));
        firmwares
    }

    /// The firmware with the highest version number, if the device has any.
    pub async fn latest_firmware(&self, identity: &DeviceIdentity) -> Option<Firmware> {
        self.list_firmwares(identity).await.pop()
    }
}

/// Extracts a firmware from a path whose file name is `firmware-sketch-<digits>.bin`.
/// Anything else, including same-stem files with another extension, yields `None`.
fn firmware_from_path(path: PathBuf) -> Option<Firmware> {
    let name = path.file_name()?.to_str()?;
    let digits = name.strip_prefix(FIRMWARE_PREFIX)?.strip_suffix(FIRMWARE_SUFFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let version = digits.parse().ok()?;
    Some(Firmware { path, version })
}
