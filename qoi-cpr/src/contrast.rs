use crate::config::Config;
use crate::metric::{max_colour_delta, weighted_alpha_delta, weighted_colour_delta, Threshold};
use crate::pixel::Pixel;

#[derive(Debug, Clone, Copy, Default)]
struct Delta {
    colour: f32,
    alpha: f32,
}

/// Derives a per-pixel quality budget from local contrast: smooth runs (low contrast between
/// neighbours) get the tight `lothresh`, busy texture (high contrast) gets the loose `hithresh`,
/// interpolated linearly in between.
pub(crate) struct ContrastGate {
    prev_delta: Delta,
}

impl ContrastGate {
    /// Seeds `prev_delta` from the delta between the encoder's initial `last_stored` pixel and
    /// the first real pixel of the image.
    pub(crate) fn new(seed_from: Pixel, first_pixel: Pixel, cfg: &Config) -> Self {
        Self {
            prev_delta: Delta {
                colour: weighted_colour_delta(seed_from, first_pixel, cfg),
                alpha: weighted_alpha_delta(seed_from, first_pixel, cfg),
            },
        }
    }

    /// Computes the threshold pair for the current pixel `px`, given its raster successor
    /// `px_next` (which is `px_prev` again at the last pixel of the image, per spec §4.4).
    pub(crate) fn next(&mut self, px: Pixel, px_next: Pixel, cfg: &Config) -> Threshold {
        let d_next = Delta {
            colour: weighted_colour_delta(px, px_next, cfg),
            alpha: weighted_alpha_delta(px, px_next, cfg),
        };

        let colour_max = max_colour_delta(cfg);
        let mut contrast_colour = if colour_max > 0.0 {
            self.prev_delta.colour.min(d_next.colour) / colour_max
        } else {
            0.0
        };
        if cfg.mulalpha {
            contrast_colour *= px.a as f32 / 255.0;
        }
        let contrast_alpha = self.prev_delta.alpha.min(d_next.alpha) / 255.0;

        self.prev_delta = d_next;

        Threshold {
            colour: cfg.lothresh * (1.0 - contrast_colour) + cfg.hithresh * contrast_colour,
            alpha: cfg.lothresh * (1.0 - contrast_alpha) + cfg.hithresh * contrast_alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_uses_lothresh() {
        let cfg = Config::default();
        let px = Pixel::new(10, 10, 10, 255);
        let mut gate = ContrastGate::new(px, px, &cfg);
        let thresh = gate.next(px, px, &cfg);
        assert_eq!(thresh.colour, cfg.lothresh);
        assert_eq!(thresh.alpha, cfg.lothresh);
    }

    #[test]
    fn maximal_contrast_uses_hithresh() {
        let cfg = Config::default();
        let black = Pixel::new(0, 0, 0, 0);
        let white = Pixel::new(255, 255, 255, 255);
        let mut gate = ContrastGate::new(black, white, &cfg);
        let thresh = gate.next(white, black, &cfg);
        assert!((thresh.colour - cfg.hithresh).abs() < 1e-3);
        assert!((thresh.alpha - cfg.hithresh).abs() < 1e-3);
    }

    #[test]
    fn zero_weight_colour_max_does_not_divide_by_zero() {
        let cfg = Config::new([0.0, 0.0, 0.0, 1.0], 1.0, 2.0, false);
        let mut gate = ContrastGate::new(Pixel::default(), Pixel::default(), &cfg);
        let thresh = gate.next(Pixel::new(1, 2, 3, 4), Pixel::new(5, 6, 7, 8), &cfg);
        assert_eq!(thresh.colour, cfg.lothresh);
    }
}
