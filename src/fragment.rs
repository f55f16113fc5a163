//! Fragmenter: fixed-size non-overlapping windows over a candle sequence.
//!
//! The OB+ methodology evaluates patterns over consecutive groups of 5
//! candles ("fragmentos"). The trailing `len % 5` candles never form a
//! fragment and are left untouched by the analyzer.

use crate::{Color, Ohlc, OhlcExt};

/// Window size of the OB+ methodology
pub const FRAGMENT_LEN: usize = 5;

/// A fixed-size window over the candle sequence, identified by its starting
/// index and 1-based ordinal number, with the derived color sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Index of the first candle of the window
    pub start: usize,
    /// Ordinal, 1-based, assigned in sequence order
    pub number: u32,
    pub colors: [Color; FRAGMENT_LEN],
}

impl Fragment {
    /// Exclusive end index of the window
    #[inline]
    pub fn end(&self) -> usize {
        self.start + FRAGMENT_LEN
    }

    /// Color at a 0-based position within the window
    #[inline]
    pub fn color(&self, position: usize) -> Color {
        self.colors[position]
    }

    /// The window's color sequence as a symbol string, e.g. "VVRVR"
    pub fn symbols(&self) -> String {
        self.colors.iter().map(|c| c.symbol()).collect()
    }
}

/// Split a candle sequence into `floor(len / 5)` non-overlapping fragments
pub fn fragments<T: Ohlc>(candles: &[T]) -> Vec<Fragment> {
    let count = candles.len() / FRAGMENT_LEN;
    let mut out = Vec::with_capacity(count);

    for i in 0..count {
        let start = i * FRAGMENT_LEN;
        let mut colors = [Color::Up; FRAGMENT_LEN];
        for (slot, candle) in colors.iter_mut().zip(&candles[start..start + FRAGMENT_LEN]) {
            *slot = candle.color();
        }
        out.push(Fragment {
            start,
            number: i as u32 + 1,
            colors,
        });
    }

    out
}
