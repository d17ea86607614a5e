use snafu::Snafu;

/// Errors produced by [`crate::encode`] and the file-writer collaborator.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EncodeError {
    #[snafu(display("invalid image descriptor: {reason}"))]
    InvalidDescriptor { reason: &'static str },

    #[snafu(display(
        "pixel data length does not match descriptor: expected {expected} bytes \
         ({width}x{height}x{channels}), got {actual}"
    ))]
    UnmatchedDataSize {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
        channels: u8,
    },

    #[cfg(feature = "std")]
    #[snafu(display("failed to write encoded image"))]
    WriteIo { source: std::io::Error },
}
