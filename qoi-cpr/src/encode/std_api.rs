use std::fs::File;
use std::io::Write;
use std::path::Path;

use snafu::ResultExt;

use crate::config::Config;
use crate::descriptor::ImageDescriptor;
use crate::error::{EncodeError, WriteIoSnafu};

/// Encodes `pixels` and writes the result to `path` in one call.
///
/// Returns the number of bytes written. This is a thin convenience over [`super::encode`] plus
/// a single `write_all`; callers that already hold an open file or a non-file writer should call
/// [`super::encode`] directly instead.
pub fn write_file(
    path: impl AsRef<Path>,
    pixels: &[u8],
    desc: ImageDescriptor,
    cfg: &Config,
) -> Result<usize, EncodeError> {
    let encoded = super::encode(pixels, desc, cfg)?;

    let mut file = File::create(path.as_ref()).context(WriteIoSnafu)?;
    file.write_all(&encoded).context(WriteIoSnafu)?;

    log::debug!("wrote {} bytes to {}", encoded.len(), path.as_ref().display());
    Ok(encoded.len())
}
