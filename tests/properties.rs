//! Property tests for the analyzer invariants.

use obplus::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct TestBar {
    o: f64,
    c: f64,
}

impl Ohlc for TestBar {
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

/// Bars from booleans: true = up candle, false = down candle
fn bars(colors: &[bool]) -> Vec<TestBar> {
    colors
        .iter()
        .map(|&up| {
            if up {
                TestBar { o: 1.0, c: 1.1 }
            } else {
                TestBar { o: 1.1, c: 1.0 }
            }
        })
        .collect()
}

// Fully qualified: `Strategy` is ambiguous between proptest's trait and
// the obplus descriptor
fn any_rule() -> impl proptest::strategy::Strategy<Value = PatternRule> {
    prop::sample::select(PatternRule::ALL.to_vec())
}

proptest! {
    #[test]
    fn fragment_count_is_floor_of_len(colors in prop::collection::vec(any::<bool>(), 0..120)) {
        let candles = bars(&colors);
        let frags = fragments(&candles);
        prop_assert_eq!(frags.len(), candles.len() / FRAGMENT_LEN);
    }

    #[test]
    fn fragment_starts_once_per_fragment_strictly_increasing(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        let numbers: Vec<u32> = out
            .iter()
            .filter_map(|c| c.annotations.fragment_number())
            .collect();
        let expected: Vec<u32> = (1..=(candles.len() / FRAGMENT_LEN) as u32).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn trailing_remainder_never_in_a_fragment(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        let tail_start = (candles.len() / FRAGMENT_LEN) * FRAGMENT_LEN;
        for candle in &out[tail_start..] {
            prop_assert!(!candle.annotations.is_fragment_start());
            prop_assert!(!candle.annotations.is_pattern_candle());
        }
    }

    #[test]
    fn martingale_levels_bounded_and_chained(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        for (i, candle) in out.iter().enumerate() {
            match candle.annotations.martingale_level() {
                None => {}
                Some(1) => {
                    let prev = &out[i - 1].annotations;
                    prop_assert!(prev.is_primary_entry());
                    prop_assert_eq!(prev.entry_outcome(), Some(Outcome::Loss));
                }
                Some(2) => {
                    let prev = &out[i - 1].annotations;
                    prop_assert_eq!(prev.martingale_level(), Some(1));
                    prop_assert_eq!(prev.entry_outcome(), Some(Outcome::Loss));
                }
                Some(other) => prop_assert!(false, "impossible martingale level {}", other),
            }
        }
    }

    #[test]
    fn martingale_keeps_primary_direction(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        for (i, candle) in out.iter().enumerate() {
            if candle.annotations.is_martingale() {
                let prev = &out[i - 1].annotations;
                prop_assert_eq!(
                    candle.annotations.entry_direction(),
                    prev.entry_direction()
                );
            }
        }
    }

    #[test]
    fn deterministic_analysis_is_idempotent(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let analyzer = Analyzer::new();
        let strategy = obplus::Strategy::new(rule.id());

        let first = analyzer.analyze(&candles, &strategy).unwrap();
        let second = analyzer.analyze(&candles, &strategy).unwrap();
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.annotations, b.annotations);
        }
    }

    #[test]
    fn ohlc_fields_pass_through(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        prop_assert_eq!(out.len(), candles.len());
        for (orig, ann) in candles.iter().zip(&out) {
            prop_assert_eq!(orig.open(), ann.open());
            prop_assert_eq!(orig.high(), ann.high());
            prop_assert_eq!(orig.low(), ann.low());
            prop_assert_eq!(orig.close(), ann.close());
        }
    }

    #[test]
    fn entries_graded_against_realized_direction(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();

        for (i, candle) in out.iter().enumerate() {
            if let Some(entry) = candle.annotations.entry {
                let won = candles[i].realized_direction() == entry.direction;
                prop_assert_eq!(entry.outcome.is_win(), won);
            }
        }
    }

    #[test]
    fn summary_counts_add_up(
        colors in prop::collection::vec(any::<bool>(), 0..120),
        rule in any_rule(),
    ) {
        let candles = bars(&colors);
        let out = Analyzer::new()
            .analyze(&candles, &obplus::Strategy::new(rule.id()))
            .unwrap();
        let summary = summarize(&out);

        prop_assert_eq!(summary.candles, candles.len());
        prop_assert_eq!(summary.fragments, candles.len() / FRAGMENT_LEN);
        prop_assert_eq!(
            summary.wins + summary.losses,
            summary.primary_entries + summary.martingale_entries
        );
    }
}
