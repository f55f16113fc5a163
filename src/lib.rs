//! # OBPlus - Fragment-based candle pattern analyzer
//!
//! Analysis engine for OB+ style binary options strategies: partitions an
//! ordered OHLC candle sequence into fixed-size fragments of 5, classifies
//! each fragment by a named rule, predicts a CALL/PUT entry, grades the
//! prediction against realized candles and simulates a bounded martingale
//! retry sequence on failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use obplus::prelude::*;
//!
//! // Define your OHLC data
//! #[derive(Clone)]
//! struct Bar { o: f64, h: f64, l: f64, c: f64 }
//!
//! impl Ohlc for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//! }
//!
//! // Build an analyzer with deterministic grading
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//!
//! // Analyze a candle sequence against a strategy descriptor
//! let candles: Vec<Bar> = vec![];
//! let strategy = Strategy::new("torres_gemeas");
//! let annotated = analyzer.analyze(&candles, &strategy).unwrap();
//! ```

pub mod fragment;
pub mod grader;
pub mod rules;
pub mod stats;
pub mod synth;

pub mod prelude {
    pub use crate::{
        // Fragmenter
        fragment::{fragments, Fragment, FRAGMENT_LEN},
        // Grading
        grader::{GradingMode, SimulatedRates},
        // Rules
        rules::{Detection, PatternRule},
        // Reports
        stats::{summarize, RuleScore, Summary},
        // Synthetic data
        synth::{self, SynthCandle, SynthConfig},
        // Parallel
        analyze_parallel,
        // Engine
        AnalysisError,
        AnalysisResult,
        AnalyzeError,
        Analyzer,
        AnalyzerBuilder,
        // Types
        AnnotatedCandle,
        Annotations,
        Color,
        Direction,
        Entry,
        EntryKind,
        MartingaleLevel,
        Ohlc,
        OhlcExt,
        Outcome,
        OverlapPolicy,
        PatternMark,
        Ratio,
        Result,
        Strategy,
    };
}

use crate::fragment::FRAGMENT_LEN;
use crate::rules::PatternRule;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Errors that can occur during analysis or configuration
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid OHLC at index {index}: {reason}")]
    InvalidOhlc { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0, used for win probabilities
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalyzeError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalyzeError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait
pub trait Ohlc {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLC data
pub trait OhlcExt: Ohlc {
    /// Candle color: up ("V") when close >= open, down ("R") otherwise.
    /// A flat candle (close == open) counts as up.
    #[inline]
    fn color(&self) -> Color {
        if self.close() >= self.open() {
            Color::Up
        } else {
            Color::Down
        }
    }

    /// Realized direction of the candle, as a CALL/PUT outcome
    #[inline]
    fn realized_direction(&self) -> Direction {
        self.color().into()
    }

    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    /// Validate OHLC data consistency
    fn validate(&self) -> Result<()> {
        let (o, h, l, c) = (self.open(), self.high(), self.low(), self.close());
        if o.is_nan() || h.is_nan() || l.is_nan() || c.is_nan() {
            return Err(AnalyzeError::InvalidOhlc {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if o.is_infinite() || h.is_infinite() || l.is_infinite() || c.is_infinite() {
            return Err(AnalyzeError::InvalidOhlc {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if h < l {
            return Err(AnalyzeError::InvalidOhlc {
                index: 0,
                reason: "high < low",
            });
        }
        if o < l || o > h {
            return Err(AnalyzeError::InvalidOhlc {
                index: 0,
                reason: "open outside [low, high]",
            });
        }
        if c < l || c > h {
            return Err(AnalyzeError::InvalidOhlc {
                index: 0,
                reason: "close outside [low, high]",
            });
        }
        Ok(())
    }
}

impl<T: Ohlc> OhlcExt for T {}

// ============================================================
// VALUE ENUMS
// ============================================================

/// Candle color in the two-symbol V/R encoding the rules match on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Color {
    /// "V" (verde): close >= open
    Up,
    /// "R" (rojo): close < open
    Down,
}

impl Color {
    /// Single-letter symbol used throughout the OB+ methodology
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Color::Up => 'V',
            Color::Down => 'R',
        }
    }

    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::Up => Color::Down,
            Color::Down => Color::Up,
        }
    }

    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, Color::Up)
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, Color::Down)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Predicted direction of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Bet that the graded candle closes up
    Call,
    /// Bet that the graded candle closes down
    Put,
}

impl Direction {
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, Direction::Call)
    }

    #[inline]
    pub fn is_put(self) -> bool {
        matches!(self, Direction::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Call => "CALL",
            Direction::Put => "PUT",
        }
    }
}

impl From<Color> for Direction {
    fn from(color: Color) -> Self {
        match color {
            Color::Up => Direction::Call,
            Color::Down => Direction::Put,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graded result of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    #[inline]
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }

    #[inline]
    pub fn is_loss(self) -> bool {
        matches!(self, Outcome::Loss)
    }
}

// ============================================================
// ANNOTATIONS
// ============================================================

/// Pattern membership mark: every candle of a detected fragment carries one
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PatternMark {
    pub rule: PatternRule,
    /// 1-based position within the detected fragment (1..=5)
    pub position: u8,
}

/// Martingale retry depth. Bounded by construction: there is no third level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum MartingaleLevel {
    First,
    Second,
}

impl MartingaleLevel {
    #[inline]
    pub fn get(self) -> u8 {
        match self {
            MartingaleLevel::First => 1,
            MartingaleLevel::Second => 2,
        }
    }
}

/// Kind of entry placed on a candle
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EntryKind {
    Primary,
    Martingale(MartingaleLevel),
}

/// A graded directional bet placed on a single candle
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    pub direction: Direction,
    pub outcome: Outcome,
}

/// Optional per-candle marks produced by the analyzer.
///
/// A candle carries at most one entry: primary and martingale annotations
/// share the single `entry` slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Annotations {
    /// 1-based fragment number, set on the first candle of each fragment
    pub fragment_start: Option<u32>,
    pub pattern: Option<PatternMark>,
    pub entry: Option<Entry>,
}

impl Annotations {
    #[inline]
    pub fn is_fragment_start(&self) -> bool {
        self.fragment_start.is_some()
    }

    #[inline]
    pub fn fragment_number(&self) -> Option<u32> {
        self.fragment_start
    }

    #[inline]
    pub fn is_pattern_candle(&self) -> bool {
        self.pattern.is_some()
    }

    #[inline]
    pub fn pattern_position(&self) -> Option<u8> {
        self.pattern.map(|m| m.position)
    }

    #[inline]
    pub fn is_primary_entry(&self) -> bool {
        matches!(
            self.entry,
            Some(Entry {
                kind: EntryKind::Primary,
                ..
            })
        )
    }

    #[inline]
    pub fn is_martingale(&self) -> bool {
        matches!(
            self.entry,
            Some(Entry {
                kind: EntryKind::Martingale(_),
                ..
            })
        )
    }

    #[inline]
    pub fn martingale_level(&self) -> Option<u8> {
        match self.entry {
            Some(Entry {
                kind: EntryKind::Martingale(level),
                ..
            }) => Some(level.get()),
            _ => None,
        }
    }

    #[inline]
    pub fn entry_direction(&self) -> Option<Direction> {
        self.entry.map(|e| e.direction)
    }

    #[inline]
    pub fn entry_outcome(&self) -> Option<Outcome> {
        self.entry.map(|e| e.outcome)
    }

    /// True when the candle carries no marks at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragment_start.is_none() && self.pattern.is_none() && self.entry.is_none()
    }
}

/// A candle plus the analyzer's marks. OHLC fields pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedCandle<T> {
    pub candle: T,
    pub annotations: Annotations,
}

impl<T: Ohlc> AnnotatedCandle<T> {
    pub fn new(candle: T) -> Self {
        Self {
            candle,
            annotations: Annotations::default(),
        }
    }
}

impl<T: Ohlc> Ohlc for AnnotatedCandle<T> {
    fn open(&self) -> f64 {
        self.candle.open()
    }

    fn high(&self) -> f64 {
        self.candle.high()
    }

    fn low(&self) -> f64 {
        self.candle.low()
    }

    fn close(&self) -> f64 {
        self.candle.close()
    }

    fn timestamp(&self) -> Option<i64> {
        self.candle.timestamp()
    }
}

// ============================================================
// STRATEGY DESCRIPTOR
// ============================================================

/// Read-only strategy configuration, as fetched from a strategy store.
///
/// `pattern` is resolved to a [`PatternRule`] with a fallback to
/// [`PatternRule::Generic`] for unknown names. `effectiveness` is a percent
/// (0..=100) and biases the simulated win probability when simulated
/// grading is active.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Strategy {
    pub pattern: String,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub effectiveness: Option<f64>,
}

impl Strategy {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            direction: None,
            effectiveness: None,
        }
    }

    pub fn with_effectiveness(mut self, percent: f64) -> Self {
        self.effectiveness = Some(percent);
        self
    }

    /// Resolve the descriptor's pattern name, falling back to the generic
    /// rule for unknown names (never an error)
    pub fn rule(&self) -> PatternRule {
        PatternRule::parse(&self.pattern).unwrap_or(PatternRule::Generic)
    }
}

// ============================================================
// ANALYZER
// ============================================================

/// Policy for entry annotations landing on an already-annotated index.
///
/// Fragments evaluate left-to-right and cross-fragment rules write into the
/// next fragment's index range, so two evaluations can target the same
/// candle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Keep the earlier annotation, drop the later write
    #[default]
    Skip,
    /// Later evaluation replaces the earlier annotation
    LastWriteWins,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub grading: grader::GradingMode,
    pub overlap: OverlapPolicy,
    pub validate_data: bool,
    /// Minimum detections for a rule to appear in rankings
    pub min_occurrences: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            grading: grader::GradingMode::default(),
            overlap: OverlapPolicy::default(),
            validate_data: false,
            min_occurrences: 1,
        }
    }
}

/// Main analysis engine: fragmenter, rule evaluator and outcome grader
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Analyzer with default configuration: deterministic grading,
    /// skip-on-overlap, no data validation
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a candle sequence against a strategy.
    ///
    /// Returns a new annotated sequence; the input is never mutated. Empty
    /// or shorter-than-one-fragment input comes back unannotated. Fails
    /// only when data validation is enabled and a candle is inconsistent.
    pub fn analyze<T>(&self, candles: &[T], strategy: &Strategy) -> Result<Vec<AnnotatedCandle<T>>>
    where
        T: Ohlc + Clone,
    {
        if self.config.validate_data {
            self.validate_candles(candles)?;
        }

        let mut annotated: Vec<AnnotatedCandle<T>> =
            candles.iter().cloned().map(AnnotatedCandle::new).collect();

        let frags = fragment::fragments(candles);
        for frag in &frags {
            annotated[frag.start].annotations.fragment_start = Some(frag.number);
        }

        let rule = strategy.rule();
        let mut grading = self.config.grading.session(strategy);

        // Left-to-right over fragments; order matters under LastWriteWins
        for (i, frag) in frags.iter().enumerate() {
            let Some(detection) = rule.evaluate(frag, frags.get(i + 1)) else {
                continue;
            };

            for (offset, slot) in annotated[frag.start..frag.start + FRAGMENT_LEN]
                .iter_mut()
                .enumerate()
            {
                slot.annotations.pattern = Some(PatternMark {
                    rule,
                    position: offset as u8 + 1,
                });
            }

            for (index, entry) in grading.run_sequence(candles, detection) {
                let slot = &mut annotated[index].annotations;
                if slot.entry.is_some() && self.config.overlap == OverlapPolicy::Skip {
                    continue;
                }
                slot.entry = Some(entry);
            }
        }

        Ok(annotated)
    }

    fn validate_candles<T: Ohlc>(&self, candles: &[T]) -> Result<()> {
        for (i, candle) in candles.iter().enumerate() {
            candle.validate().map_err(|e| match e {
                AnalyzeError::InvalidOhlc { reason, .. } => {
                    AnalyzeError::InvalidOhlc { index: i, reason }
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating [`Analyzer`] instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grading mode (deterministic by default)
    pub fn grading(mut self, mode: grader::GradingMode) -> Self {
        self.config.grading = mode;
        self
    }

    /// Set the overlap policy for entry annotations
    pub fn overlap(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap = policy;
        self
    }

    /// Enable/disable OHLC consistency validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Minimum detections for a rule to appear in [`Analyzer::rank_rules`]
    pub fn min_occurrences(mut self, floor: usize) -> Self {
        self.config.min_occurrences = floor;
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        if self.config.min_occurrences == 0 {
            return Err(AnalyzeError::InvalidValue("min_occurrences must be > 0"));
        }
        Ok(Analyzer {
            config: self.config,
        })
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single instrument
#[derive(Debug)]
pub struct AnalysisResult<T> {
    pub symbol: String,
    pub candles: Vec<AnnotatedCandle<T>>,
    pub summary: stats::Summary,
}

/// Error from analyzing a single instrument
#[derive(Debug)]
pub struct AnalysisError {
    pub symbol: String,
    pub error: AnalyzeError,
}

/// Analyze multiple instruments in parallel against the same strategy
pub fn analyze_parallel<'a, T, I>(
    analyzer: &Analyzer,
    instruments: I,
    strategy: &Strategy,
) -> (Vec<AnalysisResult<T>>, Vec<AnalysisError>)
where
    T: Ohlc + Clone + Send + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, candles)| {
            analyzer
                .analyze(candles, strategy)
                .map(|annotated| {
                    let summary = stats::summarize(&annotated);
                    AnalysisResult {
                        symbol: symbol.to_string(),
                        candles: annotated,
                        summary,
                    }
                })
                .map_err(|error| AnalysisError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
