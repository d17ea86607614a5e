use crate::pixel::Pixel;

/// The 64-slot running colour table a QOI decoder maintains, plus an explicit validity mask.
///
/// The reference C encoder relies on the index array starting zeroed, so slot `0` (holding
/// `(0,0,0,0)`, whose hash is `0`) is implicitly "valid" from the first pixel onward. This
/// implementation makes that explicit with a bitmask rather than re-deriving validity from
/// `hash(slot) == index` on every lookup (see `DESIGN.md` for the historical variant this
/// replaces).
#[derive(Debug, Clone)]
pub(crate) struct HashIndex {
    slots: [Pixel; 64],
    valid: u64,
}

impl HashIndex {
    pub(crate) fn new() -> Self {
        Self {
            slots: [Pixel::transparent_black(); 64],
            valid: 1,
        }
    }

    #[inline]
    pub(crate) fn get(&self, slot: u8) -> Option<Pixel> {
        if self.valid & (1 << slot) != 0 {
            Some(self.slots[slot as usize])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, slot: u8, pixel: Pixel) {
        self.slots[slot as usize] = pixel;
        self.valid |= 1 << slot;
    }

    /// Iterates the valid `(slot, pixel)` pairs, in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u8, Pixel)> + '_ {
        (0u8..64).filter_map(move |slot| self.get(slot).map(|px| (slot, px)))
    }
}
