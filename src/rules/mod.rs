//! Fragment pattern rules of the OB+ methodology.
//!
//! Each rule is a pure function of a fragment's color sequence (and, for
//! cross-fragment rules, the immediately following fragment) to an optional
//! entry. Rules never look further than one fragment ahead and never read
//! prices, only colors.
//!
//! # Rule Categories
//!
//! - **Same-fragment**: entry lands inside the detected fragment
//!   (Torres Gêmeas, Três Mosqueteiros, Padrão 23, Momentum, Extremos
//!   Opuestos, Simetría Central, Generic).
//! - **Cross-fragment**: entry lands inside the following fragment and the
//!   rule is skipped on the last one (Mejor de 3, Milhão Maioria, Padrão
//!   Ímpar, MHI 3).

pub(crate) mod helpers;

mod cross_fragment;
mod same_fragment;

use crate::fragment::Fragment;
use crate::Direction;

/// A detected pattern: where to enter and in which direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub rule: PatternRule,
    /// Absolute candle index of the primary entry
    pub entry: usize,
    pub direction: Direction,
}

/// Named fragment strategies, dispatched exhaustively.
///
/// Descriptor strings resolve through [`PatternRule::parse`]; the canonical
/// ids are the snake_case names from the OB+ strategy store, with known
/// alias spellings accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PatternRule {
    #[serde(rename = "mejor_de_3")]
    MejorDe3,
    #[serde(rename = "milhao_maioria")]
    MilhaoMaioria,
    #[serde(rename = "torres_gemeas")]
    TorresGemeas,
    #[serde(rename = "tres_mosqueteiros")]
    TresMosqueteiros,
    #[serde(rename = "padrao_23")]
    Padrao23,
    #[serde(rename = "padrao_impar")]
    PadraoImpar,
    #[serde(rename = "momentum_continuacion")]
    MomentumContinuacion,
    #[serde(rename = "mhi_3")]
    Mhi3,
    #[serde(rename = "extremos_opuestos")]
    ExtremosOpuestos,
    #[serde(rename = "simetria_central")]
    SimetriaCentral,
    #[serde(rename = "generic")]
    Generic,
}

impl PatternRule {
    /// All rules, in strategy-store order
    pub const ALL: [PatternRule; 11] = [
        PatternRule::MejorDe3,
        PatternRule::MilhaoMaioria,
        PatternRule::TorresGemeas,
        PatternRule::TresMosqueteiros,
        PatternRule::Padrao23,
        PatternRule::PadraoImpar,
        PatternRule::MomentumContinuacion,
        PatternRule::Mhi3,
        PatternRule::ExtremosOpuestos,
        PatternRule::SimetriaCentral,
        PatternRule::Generic,
    ];

    /// Canonical snake_case identifier
    pub fn id(self) -> &'static str {
        match self {
            PatternRule::MejorDe3 => "mejor_de_3",
            PatternRule::MilhaoMaioria => "milhao_maioria",
            PatternRule::TorresGemeas => "torres_gemeas",
            PatternRule::TresMosqueteiros => "tres_mosqueteiros",
            PatternRule::Padrao23 => "padrao_23",
            PatternRule::PadraoImpar => "padrao_impar",
            PatternRule::MomentumContinuacion => "momentum_continuacion",
            PatternRule::Mhi3 => "mhi_3",
            PatternRule::ExtremosOpuestos => "extremos_opuestos",
            PatternRule::SimetriaCentral => "simetria_central",
            PatternRule::Generic => "generic",
        }
    }

    /// Human label as shown on the dashboard
    pub fn label(self) -> &'static str {
        match self {
            PatternRule::MejorDe3 => "Mejor de 3",
            PatternRule::MilhaoMaioria => "Milhão Maioria",
            PatternRule::TorresGemeas => "Torres Gêmeas",
            PatternRule::TresMosqueteiros => "Três Mosqueteiros",
            PatternRule::Padrao23 => "Padrão 23",
            PatternRule::PadraoImpar => "Padrão Ímpar",
            PatternRule::MomentumContinuacion => "Momentum Continuación",
            PatternRule::Mhi3 => "MHI 3",
            PatternRule::ExtremosOpuestos => "Extremos Opuestos",
            PatternRule::SimetriaCentral => "Simetría Central",
            PatternRule::Generic => "Generic",
        }
    }

    /// Parse a descriptor name. Case-insensitive; accepts the alias
    /// spellings that appear across strategy-store revisions. Returns
    /// `None` for unknown names (callers fall back to [`Self::Generic`]).
    pub fn parse(name: &str) -> Option<PatternRule> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "mejor_de_3" => Some(PatternRule::MejorDe3),
            "milhao_maioria" => Some(PatternRule::MilhaoMaioria),
            "torres_gemeas" => Some(PatternRule::TorresGemeas),
            // "mosqueteros" spelling appears in older store rows
            "tres_mosqueteiros" | "tres_mosqueteros" => Some(PatternRule::TresMosqueteiros),
            "padrao_23" => Some(PatternRule::Padrao23),
            "padrao_impar" => Some(PatternRule::PadraoImpar),
            "momentum_continuacion" => Some(PatternRule::MomentumContinuacion),
            "mhi_3" | "mhi3" => Some(PatternRule::Mhi3),
            "extremos_opuestos" => Some(PatternRule::ExtremosOpuestos),
            "simetria_central" => Some(PatternRule::SimetriaCentral),
            "generic" | "default" => Some(PatternRule::Generic),
            _ => None,
        }
    }

    /// True for rules whose entry lands in the following fragment
    pub fn needs_next_fragment(self) -> bool {
        matches!(
            self,
            PatternRule::MejorDe3
                | PatternRule::MilhaoMaioria
                | PatternRule::PadraoImpar
                | PatternRule::Mhi3
        )
    }

    /// Evaluate the rule against a fragment.
    ///
    /// `next` is the immediately following fragment; cross-fragment rules
    /// produce no detection without it (the last fragment is skipped, not
    /// an error).
    pub fn evaluate(self, fragment: &Fragment, next: Option<&Fragment>) -> Option<Detection> {
        match self {
            PatternRule::MejorDe3 => cross_fragment::mejor_de_3(fragment, next?),
            PatternRule::MilhaoMaioria => cross_fragment::milhao_maioria(fragment, next?),
            PatternRule::TorresGemeas => same_fragment::torres_gemeas(fragment),
            PatternRule::TresMosqueteiros => same_fragment::tres_mosqueteiros(fragment),
            PatternRule::Padrao23 => same_fragment::padrao_23(fragment),
            PatternRule::PadraoImpar => cross_fragment::padrao_impar(fragment, next?),
            PatternRule::MomentumContinuacion => same_fragment::momentum_continuacion(fragment),
            PatternRule::Mhi3 => cross_fragment::mhi_3(fragment, next?),
            PatternRule::ExtremosOpuestos => same_fragment::extremos_opuestos(fragment),
            PatternRule::SimetriaCentral => same_fragment::simetria_central(fragment),
            PatternRule::Generic => same_fragment::generic(fragment),
        }
    }
}

impl std::fmt::Display for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_ids() {
        for rule in PatternRule::ALL {
            assert_eq!(PatternRule::parse(rule.id()), Some(rule));
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            PatternRule::parse("tres_mosqueteros"),
            Some(PatternRule::TresMosqueteiros)
        );
        assert_eq!(PatternRule::parse("MHI3"), Some(PatternRule::Mhi3));
        assert_eq!(PatternRule::parse("default"), Some(PatternRule::Generic));
        assert_eq!(
            PatternRule::parse("  Torres_Gemeas "),
            Some(PatternRule::TorresGemeas)
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(PatternRule::parse("hammer"), None);
        assert_eq!(PatternRule::parse(""), None);
    }

    #[test]
    fn test_serde_uses_canonical_ids() {
        let json = serde_json::to_string(&PatternRule::MejorDe3).unwrap();
        assert_eq!(json, "\"mejor_de_3\"");
        let back: PatternRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PatternRule::MejorDe3);
    }

    #[test]
    fn test_cross_fragment_classification() {
        assert!(PatternRule::MejorDe3.needs_next_fragment());
        assert!(PatternRule::Mhi3.needs_next_fragment());
        assert!(!PatternRule::TorresGemeas.needs_next_fragment());
        assert!(!PatternRule::Generic.needs_next_fragment());
    }
}
