//! Bounded metrics history with per-gauge peak tracking.

use std::collections::{BTreeMap, VecDeque};

use clarion_types::{Gauge, MetricsSample, Peak};

/// Maximum samples kept in history.
pub const METRICS_CAPACITY: usize = 600;

/// Gauge history in arrival order, bounded to the most recent samples.
///
/// Peaks are tracked over the whole run, not just the retained window.
/// The stability peak tracks the effective stability (producer value when
/// present, composite otherwise).
#[derive(Debug, Clone, Default)]
pub struct MetricsSeries {
    /// Retained samples, oldest first.
    history: VecDeque<MetricsSample>,
    /// Highest observed value per gauge.
    peaks: BTreeMap<Gauge, Peak>,
}

impl MetricsSeries {
    /// Create an empty series.
    pub const fn new() -> Self {
        Self {
            history: VecDeque::new(),
            peaks: BTreeMap::new(),
        }
    }

    /// Record one interval.
    ///
    /// Appends in arrival order, dropping the oldest sample past
    /// [`METRICS_CAPACITY`]. A gauge peak is replaced whenever the new
    /// value is at least the stored one, so ties adopt the newer tick.
    pub fn record(&mut self, sample: MetricsSample) {
        for gauge in Gauge::ALL {
            let value = sample.metrics.gauge(gauge);
            let replace = self
                .peaks
                .get(&gauge)
                .is_none_or(|peak| value >= peak.value);
            if replace {
                self.peaks.insert(
                    gauge,
                    Peak {
                        value,
                        tick: sample.tick,
                    },
                );
            }
        }

        self.history.push_back(sample);
        if self.history.len() > METRICS_CAPACITY {
            self.history.pop_front();
        }
    }

    /// Retained samples, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &MetricsSample> {
        self.history.iter()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&MetricsSample> {
        self.history.back()
    }

    /// Highest observed value for one gauge.
    pub fn peak(&self, gauge: Gauge) -> Option<Peak> {
        self.peaks.get(&gauge).copied()
    }

    /// All peaks observed so far.
    pub const fn peaks(&self) -> &BTreeMap<Gauge, Peak> {
        &self.peaks
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether any samples are retained.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drop all samples and peaks.
    pub fn reset(&mut self) {
        self.history.clear();
        self.peaks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_types::HealthMetrics;

    fn sample(tick: u64, rumor_spread: f64) -> MetricsSample {
        MetricsSample {
            tick,
            metrics: HealthMetrics {
                rumor_spread,
                ..HealthMetrics::default()
            },
        }
    }

    #[test]
    fn history_is_bounded_and_keeps_newest() {
        let mut series = MetricsSeries::new();
        for i in 0..650_u64 {
            series.record(sample(i, 10.0));
        }

        assert_eq!(series.len(), METRICS_CAPACITY);
        let first = series.history().next().map(|s| s.tick);
        assert_eq!(first, Some(50));
        assert_eq!(series.latest().map(|s| s.tick), Some(649));
    }

    #[test]
    fn peak_replaces_on_higher_value() {
        let mut series = MetricsSeries::new();
        series.record(sample(1, 30.0));
        series.record(sample(2, 55.0));
        series.record(sample(3, 40.0));

        let peak = series.peak(Gauge::RumorSpread);
        assert_eq!(peak.map(|p| p.tick), Some(2));
        assert!(peak.is_some_and(|p| (p.value - 55.0).abs() < 1e-10));
    }

    #[test]
    fn peak_tie_adopts_newer_tick() {
        let mut series = MetricsSeries::new();
        series.record(sample(1, 55.0));
        series.record(sample(8, 55.0));

        assert_eq!(series.peak(Gauge::RumorSpread).map(|p| p.tick), Some(8));
    }

    #[test]
    fn peak_outlives_evicted_samples() {
        let mut series = MetricsSeries::new();
        series.record(sample(0, 99.0));
        for i in 1..=600_u64 {
            series.record(sample(i, 10.0));
        }

        // The spike sample itself is gone from history.
        assert_eq!(series.history().next().map(|s| s.tick), Some(1));
        // But its peak survives.
        assert_eq!(series.peak(Gauge::RumorSpread).map(|p| p.tick), Some(0));
    }

    #[test]
    fn stability_peak_uses_provided_score_when_present() {
        let mut series = MetricsSeries::new();
        series.record(MetricsSample {
            tick: 1,
            metrics: HealthMetrics {
                stability_score: Some(72.0),
                ..HealthMetrics::default()
            },
        });

        let peak = series.peak(Gauge::StabilityScore);
        assert!(peak.is_some_and(|p| (p.value - 72.0).abs() < 1e-10));
        assert_eq!(peak.map(|p| p.tick), Some(1));
    }

    #[test]
    fn reset_clears_history_and_peaks() {
        let mut series = MetricsSeries::new();
        series.record(sample(1, 30.0));
        series.reset();
        assert!(series.is_empty());
        assert!(series.peak(Gauge::RumorSpread).is_none());
    }
}
