//! Outcome grading and the bounded martingale retry ladder.
//!
//! Deterministic grading compares the predicted direction to the realized
//! candle (close vs open) and is the default. Simulated grading draws
//! outcomes from configured win probabilities with a fixed seed; it exists
//! for demo data only and is never active unless explicitly configured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rules::Detection;
use crate::{
    Direction, Entry, EntryKind, MartingaleLevel, Ohlc, OhlcExt, Outcome, Ratio, Strategy,
};

/// Win probabilities and seed for simulated grading.
///
/// Defaults mirror the legacy demo constants: 0.60 for primary entries,
/// 0.50 for martingale retries. When the strategy descriptor carries an
/// `effectiveness` percent, it overrides the primary rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRates {
    pub entry_win_rate: Ratio,
    pub martingale_win_rate: Ratio,
    pub seed: u64,
}

impl Default for SimulatedRates {
    fn default() -> Self {
        Self {
            entry_win_rate: Ratio::new_const(0.60),
            martingale_win_rate: Ratio::new_const(0.50),
            seed: 0,
        }
    }
}

/// How entry outcomes are determined
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GradingMode {
    /// Compare the prediction to the realized candle direction
    #[default]
    Deterministic,
    /// Seeded random draws against fixed win rates (demo mode)
    Simulated(SimulatedRates),
}

impl GradingMode {
    /// Start a grading session for one `analyze` invocation. Simulated
    /// sessions seed a fresh RNG so repeated runs are identical.
    pub(crate) fn session(&self, strategy: &Strategy) -> GraderSession {
        match self {
            GradingMode::Deterministic => GraderSession::Deterministic,
            GradingMode::Simulated(rates) => {
                let entry_rate = strategy
                    .effectiveness
                    .map(|percent| (percent / 100.0).clamp(0.0, 1.0))
                    .unwrap_or_else(|| rates.entry_win_rate.get());
                GraderSession::Simulated {
                    rng: StdRng::seed_from_u64(rates.seed),
                    entry_rate,
                    martingale_rate: rates.martingale_win_rate.get(),
                }
            }
        }
    }
}

/// Per-invocation grading state
pub(crate) enum GraderSession {
    Deterministic,
    Simulated {
        rng: StdRng,
        entry_rate: f64,
        martingale_rate: f64,
    },
}

impl GraderSession {
    /// Grade a detection and simulate the retry ladder: primary entry, then
    /// up to two martingale retries at the immediately following candles,
    /// same direction, stopping on a win or at the sequence end. Returns
    /// `(candle index, entry)` pairs in placement order.
    pub(crate) fn run_sequence<T: Ohlc>(
        &mut self,
        candles: &[T],
        detection: Detection,
    ) -> Vec<(usize, Entry)> {
        let mut placed = Vec::with_capacity(3);
        let mut index = detection.entry;

        let mut outcome = self.grade(candles, index, detection.direction, None);
        placed.push((
            index,
            Entry {
                kind: EntryKind::Primary,
                direction: detection.direction,
                outcome,
            },
        ));

        for level in [MartingaleLevel::First, MartingaleLevel::Second] {
            if outcome.is_win() || index + 1 >= candles.len() {
                break;
            }
            index += 1;
            outcome = self.grade(candles, index, detection.direction, Some(level));
            placed.push((
                index,
                Entry {
                    kind: EntryKind::Martingale(level),
                    direction: detection.direction,
                    outcome,
                },
            ));
        }

        placed
    }

    fn grade<T: Ohlc>(
        &mut self,
        candles: &[T],
        index: usize,
        predicted: Direction,
        level: Option<MartingaleLevel>,
    ) -> Outcome {
        match self {
            GraderSession::Deterministic => {
                if candles[index].realized_direction() == predicted {
                    Outcome::Win
                } else {
                    Outcome::Loss
                }
            }
            GraderSession::Simulated {
                rng,
                entry_rate,
                martingale_rate,
            } => {
                let rate = if level.is_some() {
                    *martingale_rate
                } else {
                    *entry_rate
                };
                if rng.gen_bool(rate) {
                    Outcome::Win
                } else {
                    Outcome::Loss
                }
            }
        }
    }
}
