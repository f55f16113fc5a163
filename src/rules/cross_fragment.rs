//! Rules whose entry lands inside the following fragment.
//!
//! These read the detected fragment's central triple (positions 1..=3) or
//! central candle and place the entry relative to the next fragment's
//! start. On the last fragment there is no next window, so the dispatcher
//! never calls these.

use super::helpers;
use super::{Detection, PatternRule};
use crate::fragment::Fragment;

/// Mejor de 3: majority color of the central triple repeats at the central
/// candle of the next fragment. The triple is odd, so a majority always
/// exists.
pub(super) fn mejor_de_3(fragment: &Fragment, next: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::MejorDe3,
        entry: next.start + 2,
        direction: helpers::majority(&fragment.colors[1..4]).into(),
    })
}

/// Milhão Maioria: majority color of the central triple repeats at the
/// first candle of the next fragment.
pub(super) fn milhao_maioria(fragment: &Fragment, next: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::MilhaoMaioria,
        entry: next.start,
        direction: helpers::majority(&fragment.colors[1..4]).into(),
    })
}

/// Padrão Ímpar: the central candle's color repeats at the first candle of
/// the next fragment. Always fires.
pub(super) fn padrao_impar(fragment: &Fragment, next: &Fragment) -> Option<Detection> {
    Some(Detection {
        rule: PatternRule::PadraoImpar,
        entry: next.start,
        direction: fragment.colors[2].into(),
    })
}

/// MHI 3: the minority color of the central triple prevails at the central
/// candle of the next fragment. A uniform triple has no minority and
/// produces nothing.
pub(super) fn mhi_3(fragment: &Fragment, next: &Fragment) -> Option<Detection> {
    let minority = helpers::minority(&fragment.colors[1..4])?;
    Some(Detection {
        rule: PatternRule::Mhi3,
        entry: next.start + 2,
        direction: minority.into(),
    })
}
