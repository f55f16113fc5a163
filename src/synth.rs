//! Seeded synthetic candle generator.
//!
//! Deterministic random-walk OHLC series for demos, tests and benches.
//! Defaults mirror the dashboard's mock EUR/USD feed: base price 1.0850,
//! 0.1% volatility, hourly candles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Ohlc;

/// Generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub candles: usize,
    pub base_price: f64,
    /// Maximum open-to-close move per candle, as an absolute price delta
    pub volatility: f64,
    pub start_timestamp: i64,
    pub interval_secs: i64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            candles: 100,
            base_price: 1.0850,
            volatility: 0.001,
            start_timestamp: 1_700_000_000,
            interval_secs: 3600,
            seed: 0,
        }
    }
}

/// One generated OHLC sample
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SynthCandle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlc for SynthCandle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

/// Generate a random-walk candle series. Each candle opens at the previous
/// close; highs and lows extend past the body by up to half the volatility.
pub fn generate(config: &SynthConfig) -> Vec<SynthCandle> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut price = config.base_price;
    let mut out = Vec::with_capacity(config.candles);

    for i in 0..config.candles {
        let open = price;
        let change = (rng.gen::<f64>() - 0.5) * config.volatility;
        let high = open + change.abs() + rng.gen::<f64>() * config.volatility * 0.5;
        let low = open - change.abs() - rng.gen::<f64>() * config.volatility * 0.5;
        let close = open + change;

        out.push(SynthCandle {
            timestamp: config.start_timestamp + i as i64 * config.interval_secs,
            open,
            high,
            low,
            close,
        });
        price = close;
    }

    out
}
