//! Color-counting helpers shared across rule evaluators.

use crate::Color;

/// Majority color over an odd-length slice (count of ups decides; an odd
/// count cannot tie)
#[inline]
pub(crate) fn majority(colors: &[Color]) -> Color {
    let ups = colors.iter().filter(|c| c.is_up()).count();
    if ups * 2 > colors.len() {
        Color::Up
    } else {
        Color::Down
    }
}

/// Minority color, or `None` when the slice is uniform (no minority to bet on)
#[inline]
pub(crate) fn minority(colors: &[Color]) -> Option<Color> {
    let ups = colors.iter().filter(|c| c.is_up()).count();
    if ups == 0 || ups == colors.len() {
        return None;
    }
    Some(majority(colors).opposite())
}

/// True when every color in the slice is the same
#[inline]
pub(crate) fn all_same(colors: &[Color]) -> bool {
    colors.windows(2).all(|pair| pair[0] == pair[1])
}

/// True when both colors appear in the slice
#[inline]
pub(crate) fn mixed(colors: &[Color]) -> bool {
    !all_same(colors)
}
