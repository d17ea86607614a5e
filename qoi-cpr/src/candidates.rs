//! The five opcode evaluators, each either producing the bytes it would emit and the pixel a
//! decoder would then be holding, or rejecting the pixel for the next candidate in the cascade.

use crate::config::Config;
use crate::consts::{QOI_OP_DIFF, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA};
use crate::hash_index::HashIndex;
use crate::metric::{distance, within, Threshold};
use crate::pixel::{wrapping_apply, wrapping_diff, Pixel};

/// `true` iff `px` may extend (or start) a RUN: it either repeats `last_stored` exactly or is
/// close enough under the current threshold.
pub(crate) fn run_extends(px: Pixel, last_stored: Pixel, thresh: Threshold, cfg: &Config) -> bool {
    px == last_stored || within(distance(px, last_stored, cfg), thresh)
}

/// Looks up `px` in the running colour index: an exact hash-slot hit always wins; otherwise the
/// closest valid slot within budget, ties broken by lower slot index.
pub(crate) fn index_lookup(
    px: Pixel,
    index: &HashIndex,
    thresh: Threshold,
    cfg: &Config,
) -> Option<(u8, Pixel)> {
    let direct_slot = px.hash();
    if index.get(direct_slot) == Some(px) {
        return Some((direct_slot, px));
    }

    let mut best: Option<(u8, Pixel, f32)> = None;
    for (slot, stored) in index.iter() {
        let d = distance(px, stored, cfg);
        if !within(d, thresh) {
            continue;
        }

        let score = d.colour + d.alpha;
        let improves = match best {
            None => true,
            Some((_, _, best_score)) => score < best_score,
        };
        if improves {
            best = Some((slot, stored, score));
        }
    }

    best.map(|(slot, stored, _)| (slot, stored))
}

pub(crate) struct DiffCandidate {
    pub(crate) byte: u8,
    pub(crate) reconstruction: Pixel,
}

/// The 1-byte `QOI_OP_DIFF`: per-channel deltas clamped to `-2..=1`.
pub(crate) fn diff_candidate(
    px: Pixel,
    last_stored: Pixel,
    thresh: Threshold,
    cfg: &Config,
) -> Option<DiffCandidate> {
    let vr = wrapping_diff(px.r, last_stored.r).clamp(-2, 1);
    let vg = wrapping_diff(px.g, last_stored.g).clamp(-2, 1);
    let vb = wrapping_diff(px.b, last_stored.b).clamp(-2, 1);

    let reconstruction = last_stored.with_rgb(
        wrapping_apply(last_stored.r, vr),
        wrapping_apply(last_stored.g, vg),
        wrapping_apply(last_stored.b, vb),
    );

    if reconstruction == px || within(distance(px, reconstruction, cfg), thresh) {
        let byte =
            QOI_OP_DIFF | ((vr + 2) as u8) << 4 | ((vg + 2) as u8) << 2 | ((vb + 2) as u8);
        Some(DiffCandidate { byte, reconstruction })
    } else {
        None
    }
}

pub(crate) struct LumaCandidate {
    pub(crate) bytes: [u8; 2],
    pub(crate) reconstruction: Pixel,
}

/// The 2-byte `QOI_OP_LUMA`: green delta `-32..=31`, red/blue chroma relative to green
/// `-8..=7`.
pub(crate) fn luma_candidate(
    px: Pixel,
    last_stored: Pixel,
    thresh: Threshold,
    cfg: &Config,
) -> Option<LumaCandidate> {
    let raw_vr = wrapping_diff(px.r, last_stored.r);
    let raw_vg = wrapping_diff(px.g, last_stored.g);
    let raw_vb = wrapping_diff(px.b, last_stored.b);

    let vg = raw_vg.clamp(-32, 31);
    let vg_r = raw_vr.wrapping_sub(raw_vg).clamp(-8, 7);
    let vg_b = raw_vb.wrapping_sub(raw_vg).clamp(-8, 7);

    let reconstruction = last_stored.with_rgb(
        wrapping_apply(wrapping_apply(last_stored.r, vg), vg_r),
        wrapping_apply(last_stored.g, vg),
        wrapping_apply(wrapping_apply(last_stored.b, vg), vg_b),
    );

    if reconstruction == px || within(distance(px, reconstruction, cfg), thresh) {
        let bytes = [
            QOI_OP_LUMA | (vg + 32) as u8,
            ((vg_r + 8) as u8) << 4 | (vg_b + 8) as u8,
        ];
        Some(LumaCandidate { bytes, reconstruction })
    } else {
        None
    }
}

/// The unconditional 4-byte `QOI_OP_RGB` literal. Alpha is carried over from `last_stored`
/// untouched — a decoder never updates alpha on this opcode, so neither may the encoder.
pub(crate) fn rgb_literal(px: Pixel, last_stored: Pixel) -> ([u8; 4], Pixel) {
    (
        [QOI_OP_RGB, px.r, px.g, px.b],
        last_stored.with_rgb(px.r, px.g, px.b),
    )
}

/// The 5-byte `QOI_OP_RGBA` literal, used when the alpha budget rejects every opcode above.
pub(crate) fn rgba_literal(px: Pixel) -> ([u8; 5], Pixel) {
    ([QOI_OP_RGBA, px.r, px.g, px.b, px.a], px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_rejects_large_deltas_under_lossless_config() {
        let cfg = Config::lossless();
        let thresh = Threshold { colour: 0.0, alpha: 0.0 };
        let last_stored = Pixel::new(100, 100, 100, 255);
        let px = Pixel::new(120, 100, 100, 255);
        assert!(diff_candidate(px, last_stored, thresh, &cfg).is_none());
    }

    #[test]
    fn diff_accepts_small_delta_under_lossless_config() {
        let cfg = Config::lossless();
        let thresh = Threshold { colour: 0.0, alpha: 0.0 };
        let last_stored = Pixel::new(100, 100, 100, 255);
        let px = Pixel::new(101, 101, 101, 255);
        let candidate = diff_candidate(px, last_stored, thresh, &cfg).unwrap();
        assert_eq!(candidate.reconstruction, px);
        assert_eq!(candidate.byte, 0x40 | (3 << 4) | (3 << 2) | 3);
    }

    #[test]
    fn luma_accepts_green_20_delta() {
        let cfg = Config::lossless();
        let thresh = Threshold { colour: 0.0, alpha: 0.0 };
        let last_stored = Pixel::new(0, 0, 0, 255);
        let px = Pixel::new(20, 20, 20, 255);
        let candidate = luma_candidate(px, last_stored, thresh, &cfg).unwrap();
        assert_eq!(candidate.reconstruction, px);
        assert_eq!(candidate.bytes, [0x80 | (20 + 32), 0x88]);
    }

    #[test]
    fn luma_rejects_green_delta_beyond_range_under_lossless_config() {
        // A green delta of 40 exceeds LUMA's [-32, 31] range; no reconstruction can match
        // exactly and lossless tolerates no approximation, so this must fall through.
        let cfg = Config::lossless();
        let thresh = Threshold { colour: 0.0, alpha: 0.0 };
        let last_stored = Pixel::new(0, 0, 0, 255);
        let px = Pixel::new(40, 40, 40, 255);
        assert!(luma_candidate(px, last_stored, thresh, &cfg).is_none());
    }

    #[test]
    fn rgb_literal_preserves_alpha() {
        let last_stored = Pixel::new(1, 2, 3, 200);
        let px = Pixel::new(50, 60, 70, 255);
        let (bytes, reconstruction) = rgb_literal(px, last_stored);
        assert_eq!(bytes, [QOI_OP_RGB, 50, 60, 70]);
        assert_eq!(reconstruction, Pixel::new(50, 60, 70, 200));
    }

    #[test]
    fn index_lookup_prefers_lower_slot_on_tie() {
        let cfg = Config::default();
        let thresh = Threshold { colour: 1000.0, alpha: 1000.0 };
        let mut index = HashIndex::new();
        index.set(2, Pixel::new(10, 10, 10, 255));
        index.set(4, Pixel::new(10, 10, 10, 255));
        let px = Pixel::new(11, 11, 11, 255);
        let (slot, _) = index_lookup(px, &index, thresh, &cfg).unwrap();
        assert_eq!(slot, 2);
    }
}
