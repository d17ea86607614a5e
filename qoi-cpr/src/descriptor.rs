use crate::consts::QOI_PIXELS_MAX;
use crate::error::{EncodeError, InvalidDescriptorSnafu};
use snafu::ensure;

/// Immutable metadata describing the raw pixel buffer the encoder is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    /// `3` for RGB, `4` for RGBA.
    pub channels: u8,
    /// `0` for sRGB with linear alpha, `1` for all-linear; purely descriptive, never
    /// interpreted by the encoder.
    pub colorspace: u8,
}

impl ImageDescriptor {
    pub const fn new(width: u32, height: u32, channels: u8, colorspace: u8) -> Self {
        Self {
            width,
            height,
            channels,
            colorspace,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EncodeError> {
        ensure!(self.width != 0, InvalidDescriptorSnafu { reason: "width must be non-zero" });
        ensure!(self.height != 0, InvalidDescriptorSnafu { reason: "height must be non-zero" });
        ensure!(
            matches!(self.channels, 3 | 4),
            InvalidDescriptorSnafu { reason: "channels must be 3 or 4" }
        );
        ensure!(
            self.colorspace <= 1,
            InvalidDescriptorSnafu { reason: "colorspace must be 0 or 1" }
        );
        ensure!(
            self.height < QOI_PIXELS_MAX / self.width,
            InvalidDescriptorSnafu {
                reason: "image dimensions exceed the encoder's pixel count guard"
            }
        );

        Ok(())
    }

    #[inline]
    pub(crate) fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub(crate) fn byte_len(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Worst-case encoded size: every pixel as an `RGBA` literal, plus header and trailer.
    pub(crate) fn max_encoded_size(&self) -> usize {
        self.pixel_count() * (self.channels as usize + 1) + 14 + 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(ImageDescriptor::new(0, 10, 4, 0).validate().is_err());
        assert!(ImageDescriptor::new(10, 0, 4, 0).validate().is_err());
    }

    #[test]
    fn rejects_bad_channels_and_colorspace() {
        assert!(ImageDescriptor::new(1, 1, 2, 0).validate().is_err());
        assert!(ImageDescriptor::new(1, 1, 5, 0).validate().is_err());
        assert!(ImageDescriptor::new(1, 1, 3, 2).validate().is_err());
    }

    #[test]
    fn accepts_ordinary_descriptor() {
        assert!(ImageDescriptor::new(64, 64, 4, 0).validate().is_ok());
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let desc = ImageDescriptor::new(1, QOI_PIXELS_MAX, 3, 0);
        assert!(desc.validate().is_err());
    }
}
