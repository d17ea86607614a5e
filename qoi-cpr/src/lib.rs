//! A lossy, QOI-compatible image encoder.
//!
//! The output bitstream is byte-for-byte valid [QOI](https://qoiformat.org/): any spec-conforming
//! QOI decoder can read it back without modification. What makes it lossy is the encoder's
//! freedom to choose an opcode whose *reconstruction* only approximates the true pixel, as long
//! as the approximation sits within a perceptually weighted, locally contrast-adaptive budget
//! (see [`Config`] and the module docs on [`contrast`]). A [`Config::lossless`] budget of zero
//! recovers the behaviour of a conventional, lossless QOI encoder.
//!
//! ## Stream format
//!
//! ```plain
//! .- QOI_OP_INDEX ----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  0  0 |     index       |
//! `-------------------------`
//! ```
//! - 2-bit tag `00`, 6-bit index into the 64-slot running colour index.
//!
//! ```plain
//! .- QOI_OP_DIFF -----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----+-----+-----|
//! |  0  1 |  dr |  dg |  db |
//! `-------------------------`
//! ```
//! - 2-bit tag `01`, per-channel delta from the previously stored pixel, each in `-2..=1`.
//!
//! ```plain
//! .- QOI_OP_LUMA -------------------------------------.
//! |         Byte[0]         |         Byte[1]         |
//! |  7  6  5  4  3  2  1  0 |  7  6  5  4  3  2  1  0 |
//! |----+---------------------+-------------+-----------|
//! | 1 0 |     green diff     |   dr - dg   |  db - dg  |
//! `---------------------------------------------------`
//! ```
//! - 2-bit tag `10`, 6-bit green delta `-32..=31`, 4+4 bit red/blue chroma relative to green,
//!   each `-8..=7`.
//!
//! ```plain
//! .- QOI_OP_RUN ------------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  1  1 |       run       |
//! `-------------------------`
//! ```
//! - 2-bit tag `11`, 6-bit run length biased by `-1`, covering `1..=62` repeats of the
//!   previously *stored* pixel. `0xFE` and `0xFF` are reserved (below).
//!
//! `QOI_OP_RGB` (`0xFE` + 3 bytes) and `QOI_OP_RGBA` (`0xFF` + 4 bytes) carry full-precision
//! pixels and are always available as the final fallback in the cascade.
//!
//! ## Feature flags
//!
//! - `alloc` (implied by `std`): enables [`encode`], which returns an owned `Vec<u8>`.
//! - `std` (default): enables [`write_file`], a thin collaborator that encodes straight to disk.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod candidates;
mod config;
mod consts;
#[cfg(feature = "alloc")]
mod container;
mod contrast;
mod descriptor;
#[cfg(feature = "alloc")]
pub mod encode;
mod error;
mod hash_index;
mod metric;
mod pixel;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use consts::QOI_PIXELS_MAX;
pub use descriptor::ImageDescriptor;
#[cfg(feature = "alloc")]
pub use encode::encode;
#[cfg(feature = "std")]
pub use encode::write_file;
pub use error::EncodeError;
pub use pixel::Pixel;
