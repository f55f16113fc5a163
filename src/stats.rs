//! Summary counts and rule ranking.
//!
//! `summarize` condenses an annotated sequence into the counts a dashboard
//! displays. `score_rule`/`rank_rules` grade every rule's primary
//! predictions deterministically over a sequence and rank them by
//! effectiveness, the computation behind a strategy list view.

use crate::fragment;
use crate::rules::PatternRule;
use crate::{AnnotatedCandle, Analyzer, Ohlc, OhlcExt};

/// Counts extracted from an annotated sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    pub candles: usize,
    pub fragments: usize,
    pub pattern_candles: usize,
    pub primary_entries: usize,
    pub martingale_entries: usize,
    pub wins: usize,
    pub losses: usize,
}

impl Summary {
    /// Share of winning entries over all graded entries, if any were placed
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.wins + self.losses;
        (total > 0).then(|| self.wins as f64 / total as f64)
    }
}

/// Condense an annotated sequence into summary counts
pub fn summarize<T>(annotated: &[AnnotatedCandle<T>]) -> Summary {
    let mut summary = Summary {
        candles: annotated.len(),
        ..Summary::default()
    };

    for candle in annotated {
        let marks = &candle.annotations;
        if marks.is_fragment_start() {
            summary.fragments += 1;
        }
        if marks.is_pattern_candle() {
            summary.pattern_candles += 1;
        }
        if let Some(entry) = marks.entry {
            if marks.is_primary_entry() {
                summary.primary_entries += 1;
            } else {
                summary.martingale_entries += 1;
            }
            if entry.outcome.is_win() {
                summary.wins += 1;
            } else {
                summary.losses += 1;
            }
        }
    }

    summary
}

/// Deterministic effectiveness of a single rule over a candle sequence
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RuleScore {
    pub rule: PatternRule,
    /// Detections graded (primary entries only, no martingale recovery)
    pub occurrences: usize,
    pub wins: usize,
    pub losses: usize,
    /// wins / occurrences, in 0.0..=1.0
    pub effectiveness: f64,
    /// effectiveness scaled to 0..=100, as shown on the dashboard
    pub score: f64,
}

impl Analyzer {
    /// Grade one rule's primary predictions over the sequence.
    ///
    /// Grading is always deterministic here, independent of the configured
    /// mode: a ranking is a statement about the data, not about a demo
    /// draw. Returns `None` when detections stay under the configured
    /// minimum-occurrences floor.
    pub fn score_rule<T: Ohlc>(&self, candles: &[T], rule: PatternRule) -> Option<RuleScore> {
        let frags = fragment::fragments(candles);
        let mut occurrences = 0usize;
        let mut wins = 0usize;

        for (i, frag) in frags.iter().enumerate() {
            let Some(detection) = rule.evaluate(frag, frags.get(i + 1)) else {
                continue;
            };
            occurrences += 1;
            if candles[detection.entry].realized_direction() == detection.direction {
                wins += 1;
            }
        }

        if occurrences < self.config().min_occurrences {
            return None;
        }

        let effectiveness = wins as f64 / occurrences as f64;
        Some(RuleScore {
            rule,
            occurrences,
            wins,
            losses: occurrences - wins,
            effectiveness,
            score: effectiveness * 100.0,
        })
    }

    /// Score every rule and rank by effectiveness, best first. Rules under
    /// the minimum-occurrences floor are excluded.
    pub fn rank_rules<T: Ohlc>(&self, candles: &[T]) -> Vec<RuleScore> {
        let mut scores: Vec<RuleScore> = PatternRule::ALL
            .iter()
            .filter_map(|&rule| self.score_rule(candles, rule))
            .collect();
        scores.sort_by(|a, b| {
            b.effectiveness
                .partial_cmp(&a.effectiveness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalyzerBuilder, Strategy};

    #[derive(Debug, Clone, Copy)]
    struct Bar {
        o: f64,
        c: f64,
    }

    impl Ohlc for Bar {
        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.o.max(self.c)
        }

        fn low(&self) -> f64 {
            self.o.min(self.c)
        }

        fn close(&self) -> f64 {
            self.c
        }
    }

    fn up() -> Bar {
        Bar { o: 1.0, c: 2.0 }
    }

    fn down() -> Bar {
        Bar { o: 2.0, c: 1.0 }
    }

    #[test]
    fn test_summary_counts() {
        let analyzer = Analyzer::default();
        let candles = vec![up(); 10];
        let annotated = analyzer
            .analyze(&candles, &Strategy::new("torres_gemeas"))
            .unwrap();
        let summary = summarize(&annotated);

        assert_eq!(summary.candles, 10);
        assert_eq!(summary.fragments, 2);
        assert_eq!(summary.pattern_candles, 10);
        assert_eq!(summary.primary_entries, 2);
        assert_eq!(summary.martingale_entries, 0);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 0);
        assert_eq!(summary.hit_rate(), Some(1.0));
    }

    #[test]
    fn test_summary_counts_martingales() {
        // [V,V,V,V,R] then recovery candle: primary loss + level-1 win
        let candles = vec![
            up(),
            up(),
            up(),
            up(),
            down(),
            up(),
            up(),
            up(),
            up(),
            up(),
        ];
        let analyzer = Analyzer::default();
        let annotated = analyzer
            .analyze(&candles, &Strategy::new("torres_gemeas"))
            .unwrap();
        let summary = summarize(&annotated);

        assert_eq!(summary.primary_entries, 2);
        assert_eq!(summary.martingale_entries, 1);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize::<Bar>(&[]);
        assert_eq!(summary.candles, 0);
        assert_eq!(summary.hit_rate(), None);
    }

    #[test]
    fn test_score_rule_perfect_effectiveness() {
        let analyzer = Analyzer::default();
        let candles = vec![up(); 20];
        let score = analyzer
            .score_rule(&candles, PatternRule::TorresGemeas)
            .unwrap();

        assert_eq!(score.occurrences, 4);
        assert_eq!(score.wins, 4);
        assert_eq!(score.losses, 0);
        assert_eq!(score.effectiveness, 1.0);
        assert_eq!(score.score, 100.0);
    }

    #[test]
    fn test_score_rule_counts_losses() {
        // Every fragment ends down while starting up: torres always loses
        let mut candles = Vec::new();
        for _ in 0..4 {
            candles.extend([up(), up(), up(), up(), down()]);
        }
        let analyzer = Analyzer::default();
        let score = analyzer
            .score_rule(&candles, PatternRule::TorresGemeas)
            .unwrap();

        assert_eq!(score.occurrences, 4);
        assert_eq!(score.wins, 0);
        assert_eq!(score.effectiveness, 0.0);
    }

    #[test]
    fn test_min_occurrences_floor_filters() {
        let analyzer = AnalyzerBuilder::new().min_occurrences(5).build().unwrap();
        let candles = vec![up(); 10]; // only 2 fragments
        assert!(analyzer
            .score_rule(&candles, PatternRule::TorresGemeas)
            .is_none());
    }

    #[test]
    fn test_cross_rule_skips_last_fragment() {
        let analyzer = Analyzer::default();
        let candles = vec![up(); 10]; // 2 fragments
        let score = analyzer
            .score_rule(&candles, PatternRule::MejorDe3)
            .unwrap();
        // Only the first fragment has a follower
        assert_eq!(score.occurrences, 1);
    }

    #[test]
    fn test_rank_rules_sorted_descending() {
        let candles: Vec<Bar> = (0..40)
            .map(|i| if i % 3 == 0 { down() } else { up() })
            .collect();
        let analyzer = Analyzer::default();
        let ranked = analyzer.rank_rules(&candles);

        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].effectiveness >= pair[1].effectiveness);
        }
    }

    #[test]
    fn test_rank_rules_excludes_non_firing() {
        // Uniform up candles: mhi_3 and generic never fire
        let candles = vec![up(); 20];
        let analyzer = Analyzer::default();
        let ranked = analyzer.rank_rules(&candles);

        assert!(ranked.iter().all(|s| s.rule != PatternRule::Mhi3));
        assert!(ranked.iter().all(|s| s.rule != PatternRule::Generic));
    }
}
