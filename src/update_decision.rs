use crate::domain::{Firmware, SketchHash, UpdateRequest};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument, warn};

const HASH_CHUNK_SIZE: usize = 512;

#[derive(PartialEq, Eq, Debug)]
pub enum UpdateDecision {
    NoFirmware,
    UpToDate,
    IdenticalContent,
    Update { firmware: Firmware, sketch_hash: SketchHash },
}

/// Decides whether the device should download new firmware. A failure to hash the
/// candidate file is an error of its own, it must never masquerade as "no firmware".
#[instrument(skip_all, fields(identity = %request.identity))]
pub async fn decide(request: &UpdateRequest, latest: Option<Firmware>) -> Result<UpdateDecision, DecisionError> {
    let Some(firmware) = latest else {
        warn!("No firmware available for {} (installed <{}>)", request.identity, request.sketch_version);
        return Ok(UpdateDecision::NoFirmware);
    };

    if firmware.version <= request.sketch_version {
        info!(
            "Update for {} not required (installed <{}>; available <{}>)",
            request.identity, request.sketch_version, firmware.version
        );
        return Ok(UpdateDecision::UpToDate);
    }

    let sketch_hash = hash_file(&firmware.path).await.map_err(|source| DecisionError::Hash {
        source,
        path: firmware.path.clone(),
    })?;

    if sketch_hash == request.sketch_hash {
        // The device reports an older version but already runs these exact bytes. Serving
        // them again would reboot it into the same state and start an endless update cycle.
        warn!(
            "Update for {} not possible (checksum matches; installed <{}>; available <{}>)",
            request.identity, request.sketch_version, firmware.version
        );
        return Ok(UpdateDecision::IdenticalContent);
    }

    info!(
        "Update available for {} (installed <{}>; available <{}>)",
        request.identity, request.sketch_version, firmware.version
    );
    Ok(UpdateDecision::Update { firmware, sketch_hash })
}

/// MD5 over the full file content, read in fixed-size chunks so firmware images never
/// have to fit in memory twice.
async fn hash_file(path: &Path) -> io::Result<SketchHash> {
    let mut file = File::open(path).await?;
    let mut context = md5::Context::new();
    let mut chunk = [0u8; HASH_CHUNK_SIZE];

    loop {
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        context.consume(&chunk[..read]);
    }

    Ok(SketchHash::from_digest(context.compute()))
}

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("unable to hash '{}': {}", path.display(), source)]
    Hash { source: io::Error, path: PathBuf },
}
