//! Coordinate-indexed bitset.
//!
//! [`CellSet`] stores one bit per grid cell. It backs per-cell flags that
//! must be looked up in O(1) during a tick (the falling set, goal squares)
//! without deriving string or tuple keys.

use serde::{Deserialize, Serialize};

use crate::Pos;

const WORD_BITS: usize = 64;

/// One bit per cell of a `width × height` grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellSet {
    width: u32,
    height: u32,
    words: Vec<u64>,
}

impl CellSet {
    /// Create an empty set sized for a `width × height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            words: vec![0; cells.div_ceil(WORD_BITS)],
        }
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let (Ok(x), Ok(y)) = (u32::try_from(pos.x), u32::try_from(pos.y)) else {
            return None;
        };
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set the bit for `pos`. Returns false if `pos` is outside the grid.
    pub fn insert(&mut self, pos: Pos) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
                true
            }
            None => false,
        }
    }

    /// Clear the bit for `pos`.
    pub fn remove(&mut self, pos: Pos) {
        if let Some(i) = self.index(pos) {
            self.words[i / WORD_BITS] &= !(1 << (i % WORD_BITS));
        }
    }

    /// Whether the bit for `pos` is set. Out-of-bounds is never set.
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos)
            .is_some_and(|i| self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0)
    }

    /// Clear every bit, keeping the dimensions.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of set bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Set positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width as usize;
        self.words.iter().enumerate().flat_map(move |(wi, &word)| {
            (0..WORD_BITS).filter_map(move |bit| {
                if word & (1 << bit) == 0 {
                    return None;
                }
                let i = wi * WORD_BITS + bit;
                // Width and height are u32, so both components fit in i32 for any real grid.
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                Some(Pos::new((i % width) as i32, (i / width) as i32))
            })
        })
    }

    /// Dimensions this set was created for.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
