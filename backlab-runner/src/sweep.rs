//! Parameter sweep utilities for grid search over run configurations.
//!
//! Runs are embarrassingly parallel: each owns an independent ledger and
//! capital state, so the sweep fans out with rayon at run granularity.

use rayon::prelude::*;

use backlab_core::config::BacktestConfig;
use backlab_core::domain::Bar;
use backlab_core::strategy::{IndicatorCalculator, Strategy};

use crate::report::BacktestReport;
use crate::runner::{run_backtest, RunError, RunOptions};

/// Value ranges to sweep over, crossed with a base configuration.
#[derive(Debug, Clone)]
pub struct ConfigGrid {
    pub atr_multipliers: Vec<f64>,
    pub reward_risk_ratios: Vec<f64>,
    pub max_position_sizes: Vec<f64>,
}

impl ConfigGrid {
    /// A small grid around the stock defaults.
    pub fn standard() -> Self {
        Self {
            atr_multipliers: vec![1.5, 2.0, 3.0],
            reward_risk_ratios: vec![1.5, 2.0, 3.0],
            max_position_sizes: vec![0.05, 0.1, 0.2],
        }
    }

    pub fn size(&self) -> usize {
        self.atr_multipliers.len() * self.reward_risk_ratios.len() * self.max_position_sizes.len()
    }

    /// Cross every axis with `base`, overriding the swept fields.
    pub fn generate_configs(&self, base: &BacktestConfig) -> Vec<BacktestConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &atr_multiplier in &self.atr_multipliers {
            for &reward_risk_ratio in &self.reward_risk_ratios {
                for &max_position_size in &self.max_position_sizes {
                    configs.push(BacktestConfig {
                        atr_multiplier,
                        reward_risk_ratio,
                        max_position_size,
                        ..base.clone()
                    });
                }
            }
        }
        configs
    }
}

/// Grid sweep executor over one strategy and bar series.
pub struct ConfigSweep<'a> {
    strategy: &'a dyn Strategy,
    indicators: &'a dyn IndicatorCalculator,
    bars: &'a [Bar],
    options: RunOptions,
    parallel: bool,
}

impl<'a> ConfigSweep<'a> {
    pub fn new(
        strategy: &'a dyn Strategy,
        indicators: &'a dyn IndicatorCalculator,
        bars: &'a [Bar],
    ) -> Self {
        Self {
            strategy,
            indicators,
            bars,
            options: RunOptions::default(),
            parallel: true,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every configuration in the grid. The first failing run aborts
    /// the sweep; a cancelled token fails every remaining run the same way.
    pub fn sweep(
        &self,
        grid: &ConfigGrid,
        base: &BacktestConfig,
    ) -> Result<SweepResults, RunError> {
        let configs = grid.generate_configs(base);

        let reports: Vec<BacktestReport> = if self.parallel {
            configs
                .par_iter()
                .map(|config| self.run_one(config))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            configs
                .iter()
                .map(|config| self.run_one(config))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults { reports })
    }

    fn run_one(&self, config: &BacktestConfig) -> Result<BacktestReport, RunError> {
        run_backtest(self.strategy, self.indicators, self.bars, config, &self.options)
    }
}

/// Reports from a completed sweep.
#[derive(Debug)]
pub struct SweepResults {
    reports: Vec<BacktestReport>,
}

impl SweepResults {
    pub fn all(&self) -> &[BacktestReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&BacktestReport> {
        self.reports.iter().find(|r| r.fingerprint.run_id == run_id)
    }

    /// Reports sorted by Sharpe ratio, best first.
    pub fn sorted_by_sharpe(&self) -> Vec<&BacktestReport> {
        let mut sorted: Vec<_> = self.reports.iter().collect();
        sorted.sort_by(|a, b| {
            b.metrics
                .sharpe_ratio
                .partial_cmp(&a.metrics.sharpe_ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn best(&self) -> Option<&BacktestReport> {
        self.sorted_by_sharpe().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlab_core::engine::CancelToken;
    use backlab_core::error::EngineError;
    use backlab_core::indicators::StandardIndicators;
    use backlab_core::sample_data::random_walk_bars;
    use backlab_core::strategy::examples::MaCrossStrategy;

    #[test]
    fn grid_size_and_generation() {
        let grid = ConfigGrid {
            atr_multipliers: vec![1.5, 2.0],
            reward_risk_ratios: vec![2.0],
            max_position_sizes: vec![0.1, 0.2],
        };
        assert_eq!(grid.size(), 4);

        let configs = grid.generate_configs(&BacktestConfig::default());
        assert_eq!(configs.len(), 4);
        // Unswept fields come from the base.
        assert!(configs.iter().all(|c| c.commission == 0.001));
    }

    #[test]
    fn parallel_and_sequential_sweeps_agree() {
        let bars = random_walk_bars(300, 19);
        let strategy = MaCrossStrategy::default();
        let indicators = StandardIndicators::default();
        let grid = ConfigGrid {
            atr_multipliers: vec![1.5, 3.0],
            reward_risk_ratios: vec![2.0],
            max_position_sizes: vec![0.1],
        };

        let parallel = ConfigSweep::new(&strategy, &indicators, &bars)
            .sweep(&grid, &BacktestConfig::default())
            .unwrap();
        let sequential = ConfigSweep::new(&strategy, &indicators, &bars)
            .with_parallelism(false)
            .sweep(&grid, &BacktestConfig::default())
            .unwrap();

        assert_eq!(parallel.len(), 2);
        assert_eq!(sequential.len(), 2);
        for (p, s) in parallel.all().iter().zip(sequential.all()) {
            assert_eq!(p.fingerprint.run_id, s.fingerprint.run_id);
            assert_eq!(p.final_capital, s.final_capital);
        }
    }

    #[test]
    fn sweep_results_sorted_by_sharpe() {
        let bars = random_walk_bars(400, 23);
        let strategy = MaCrossStrategy::default();
        let indicators = StandardIndicators::default();

        let results = ConfigSweep::new(&strategy, &indicators, &bars)
            .sweep(&ConfigGrid::standard(), &BacktestConfig::default())
            .unwrap();

        let sorted = results.sorted_by_sharpe();
        assert_eq!(sorted.len(), 27);
        for pair in sorted.windows(2) {
            assert!(pair[0].metrics.sharpe_ratio >= pair[1].metrics.sharpe_ratio);
        }
        assert!(results.best().is_some());
    }

    #[test]
    fn cancelled_token_aborts_the_sweep() {
        let bars = random_walk_bars(300, 29);
        let strategy = MaCrossStrategy::default();
        let indicators = StandardIndicators::default();
        let token = CancelToken::new();
        token.cancel();

        let options = RunOptions {
            cancel: Some(token),
            ..Default::default()
        };
        let outcome = ConfigSweep::new(&strategy, &indicators, &bars)
            .with_options(options)
            .with_parallelism(false)
            .sweep(&ConfigGrid::standard(), &BacktestConfig::default());

        assert!(matches!(
            outcome,
            Err(RunError::Engine(EngineError::Cancelled { .. }))
        ));
    }
}
