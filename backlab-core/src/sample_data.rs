//! Deterministic synthetic bar series for tests and benches.
//!
//! All generators are seeded or closed-form; the same arguments always
//! produce the same bars.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

fn bar_at(i: usize, close: f64) -> Bar {
    Bar {
        symbol: "BTCUSDT".into(),
        timestamp: base_time() + Duration::hours(i as i64),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000.0 + i as f64,
    }
}

/// `n` hourly bars all closing at `price`.
pub fn constant_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n).map(|i| bar_at(i, price)).collect()
}

/// `n` hourly bars with close drifting by `step` per bar from `start`.
pub fn trending_bars(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n).map(|i| bar_at(i, start + step * i as f64)).collect()
}

/// `n` hourly bars following a seeded random walk, floored at 10.0.
pub fn random_walk_bars(n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price: f64 = 100.0;
    (0..n)
        .map(|i| {
            price += rng.gen_range(-1.0..1.0);
            price = price.max(10.0);
            bar_at(i, price)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_hourly_and_ascending() {
        let bars = constant_bars(5, 100.0);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
    }

    #[test]
    fn generated_bars_are_sane() {
        for bar in random_walk_bars(500, 11) {
            assert!(bar.is_sane());
        }
    }

    #[test]
    fn random_walk_is_seed_deterministic() {
        let a = random_walk_bars(100, 42);
        let b = random_walk_bars(100, 42);
        let c = random_walk_bars(100, 43);
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(x, y)| x.close == y.close));
        assert!(a.iter().zip(&c).any(|(x, y)| x.close != y.close));
    }
}
