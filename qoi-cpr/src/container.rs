use alloc::vec::Vec;

use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PADDING};
use crate::descriptor::ImageDescriptor;

/// Writes the 14-byte big-endian QOI header into `out`, which must have at least
/// [`QOI_HEADER_SIZE`] bytes of spare capacity.
pub(crate) fn write_header(out: &mut Vec<u8>, desc: &ImageDescriptor) {
    debug_assert!(out.capacity() - out.len() >= QOI_HEADER_SIZE);

    out.extend_from_slice(&QOI_MAGIC);
    out.extend_from_slice(&desc.width.to_be_bytes());
    out.extend_from_slice(&desc.height.to_be_bytes());
    out.push(desc.channels);
    out.push(desc.colorspace);
}

/// Appends the fixed 8-byte end-of-stream trailer.
pub(crate) fn write_trailer(out: &mut Vec<u8>) {
    out.extend_from_slice(&QOI_PADDING);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_layout() {
        let desc = ImageDescriptor::new(4, 2, 4, 0);
        let mut out = Vec::with_capacity(32);
        write_header(&mut out, &desc);
        assert_eq!(
            out,
            vec![b'q', b'o', b'i', b'f', 0, 0, 0, 4, 0, 0, 0, 2, 4, 0]
        );
    }

    #[test]
    fn trailer_is_fixed_padding() {
        let mut out = Vec::new();
        write_trailer(&mut out);
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }
}
