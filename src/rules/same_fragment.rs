//! Rules whose entry lands inside the detected fragment itself.
//!
//! Positions are 0-based within the fragment's color sequence; entry
//! indexes are absolute into the candle sequence.

use super::helpers;
use super::{Detection, PatternRule};
use crate::fragment::Fragment;

/// Torres Gêmeas: the first candle's color repeats at the last candle of
/// the fragment. Always fires.
pub(super) fn torres_gemeas(fragment: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::TorresGemeas,
        entry: fragment.start + 4,
        direction: fragment.colors[0].into(),
    })
}

/// Três Mosqueteiros: the central candle's color repeats at the following
/// candle. Always fires.
pub(super) fn tres_mosqueteiros(fragment: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::TresMosqueteiros,
        entry: fragment.start + 3,
        direction: fragment.colors[2].into(),
    })
}

/// Padrão 23: the second candle's color repeats at the third. Always fires.
pub(super) fn padrao_23(fragment: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::Padrao23,
        entry: fragment.start + 2,
        direction: fragment.colors[1].into(),
    })
}

/// Momentum Continuación: three equal opening candles carry their color
/// into the fourth. Fires only on a uniform leading triple.
pub(super) fn momentum_continuacion(fragment: &Fragment) -> Option<Detection> {
    if !helpers::all_same(&fragment.colors[..3]) {
        return None;
    }
    Some(Detection {
        rule: PatternRule::MomentumContinuacion,
        entry: fragment.start + 3,
        direction: fragment.colors[0].into(),
    })
}

/// Extremos Opuestos: the last candle tends to oppose the first.
/// Always fires, predicting the inverted color.
pub(super) fn extremos_opuestos(fragment: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::ExtremosOpuestos,
        entry: fragment.start + 4,
        direction: fragment.colors[0].opposite().into(),
    })
}

/// Simetría Central: candle 2's color repeats at candle 4. Always fires.
pub(super) fn simetria_central(fragment: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::SimetriaCentral,
        entry: fragment.start + 3,
        direction: fragment.colors[1].into(),
    })
}

/// Generic fallback: fires on any mixed fragment, predicting the window's
/// majority color at the last candle. A uniform fragment produces nothing.
pub(super) fn generic(fragment: &Fragment) -> Option<Detection> {
    if !helpers::mixed(&fragment.colors) {
        return None;
    }
    Some(Detection {
        rule: PatternRule::Generic,
        entry: fragment.start + 4,
        direction: helpers::majority(&fragment.colors).into(),
    })
}
