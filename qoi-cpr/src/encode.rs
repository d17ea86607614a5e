//! The pixel loop: drives the lookahead window, queries the contrast gate, dispatches opcode
//! candidates in priority order, and maintains `last_stored` and the running colour index.

use alloc::vec::Vec;

use snafu::ensure;

use crate::candidates::{diff_candidate, index_lookup, luma_candidate, rgb_literal, rgba_literal, run_extends};
use crate::config::Config;
use crate::consts::{MAX_RUN, QOI_OP_INDEX, QOI_OP_RUN};
use crate::container::{write_header, write_trailer};
use crate::contrast::ContrastGate;
use crate::descriptor::ImageDescriptor;
use crate::error::{EncodeError, UnmatchedDataSizeSnafu};
use crate::hash_index::HashIndex;
use crate::metric::{weighted_alpha_delta, Threshold};
use crate::pixel::Pixel;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::write_file;

struct EncoderState {
    last_stored: Pixel,
    run: u8,
    hash_index: HashIndex,
    out: Vec<u8>,
}

impl EncoderState {
    fn flush_run(&mut self) {
        if self.run > 0 {
            self.out.push(QOI_OP_RUN | (self.run - 1));
            log::trace!("flushed run of {}", self.run);
            self.run = 0;
        }
    }

    /// Commits a non-RUN opcode: flushes any open run, writes the bytes, updates `last_stored`,
    /// and re-files the resulting pixel into its hash slot (a no-op for `INDEX`, whose slot is
    /// already coherent by the index-coherence invariant).
    fn emit(&mut self, bytes: &[u8], new_last_stored: Pixel) {
        self.flush_run();
        self.out.extend_from_slice(bytes);
        self.last_stored = new_last_stored;

        let slot = new_last_stored.hash();
        self.hash_index.set(slot, new_last_stored);

        log::trace!("emitted {}-byte opcode, now at slot {slot}", bytes.len());
    }
}

/// `true` iff the alpha delta between `px` and `last_stored` is already within budget, meaning
/// an opcode that leaves alpha untouched (`DIFF`, `LUMA`, `RGB`) is still admissible.
fn alpha_budget_ok(px: Pixel, last_stored: Pixel, thresh: Threshold, cfg: &Config) -> bool {
    weighted_alpha_delta(px, last_stored, cfg) <= thresh.alpha
}

/// Encodes raw `RGB`/`RGBA` pixel bytes into a lossy-but-QOI-compatible bitstream.
///
/// `pixels` must contain exactly `desc.width * desc.height * desc.channels` bytes in raster
/// order, three or four channels per pixel as declared by `desc.channels`. See the crate
/// documentation for the opcode cascade and `cfg`'s perceptual knobs; [`Config::lossless`]
/// disables every approximation.
pub fn encode(pixels: &[u8], desc: ImageDescriptor, cfg: &Config) -> Result<Vec<u8>, EncodeError> {
    desc.validate()?;

    let expected = desc.byte_len();
    ensure!(
        pixels.len() == expected,
        UnmatchedDataSizeSnafu {
            expected,
            actual: pixels.len(),
            width: desc.width,
            height: desc.height,
            channels: desc.channels,
        }
    );

    let channels = desc.channels as usize;
    let channel_count = desc.channels;
    let pixel_count = desc.pixel_count();
    let read_pixel = move |i: usize| Pixel::read(&pixels[i * channels..], channel_count);

    let mut state = EncoderState {
        last_stored: Pixel::initial(),
        run: 0,
        hash_index: HashIndex::new(),
        out: Vec::with_capacity(desc.max_encoded_size()),
    };

    write_header(&mut state.out, &desc);
    log::debug!(
        "encoding {}x{} ({} channels) with weights {:?}",
        desc.width,
        desc.height,
        desc.channels,
        cfg.weights
    );

    let mut px_prev = state.last_stored;
    let mut px = px_prev;
    let mut px_next = read_pixel(0);

    let mut gate = ContrastGate::new(px, px_next, cfg);

    for i in 0..pixel_count {
        px_prev = px;
        px = px_next;
        px_next = if i + 1 < pixel_count {
            read_pixel(i + 1)
        } else {
            px_prev
        };

        if cfg.mulalpha && px.is_fully_transparent() {
            px = Pixel::transparent_black();
        }

        let thresh = gate.next(px, px_next, cfg);

        if run_extends(px, state.last_stored, thresh, cfg) {
            state.run += 1;
            if state.run == MAX_RUN || i + 1 == pixel_count {
                state.flush_run();
            }
            continue;
        }

        if let Some((slot, stored)) = index_lookup(px, &state.hash_index, thresh, cfg) {
            state.emit(&[QOI_OP_INDEX | slot], stored);
            continue;
        }

        if alpha_budget_ok(px, state.last_stored, thresh, cfg) {
            if let Some(diff) = diff_candidate(px, state.last_stored, thresh, cfg) {
                state.emit(&[diff.byte], diff.reconstruction);
            } else if let Some(luma) = luma_candidate(px, state.last_stored, thresh, cfg) {
                state.emit(&luma.bytes, luma.reconstruction);
            } else {
                let (bytes, reconstruction) = rgb_literal(px, state.last_stored);
                state.emit(&bytes, reconstruction);
            }
        } else {
            let (bytes, reconstruction) = rgba_literal(px);
            state.emit(&bytes, reconstruction);
        }
    }

    write_trailer(&mut state.out);

    debug_assert!(state.out.len() <= desc.max_encoded_size());
    log::debug!("encoded to {} bytes", state.out.len());

    Ok(state.out)
}
