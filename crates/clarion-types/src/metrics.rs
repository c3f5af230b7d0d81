//! Health gauges, metric samples, and the composite stability score.

use serde::{Deserialize, Serialize};

use crate::enums::Gauge;

/// Composite-score weight table, evaluated in declaration order.
///
/// `(gauge, weight, inverted)`: inverted gauges contribute `100 - value`
/// because lower is healthier for them. Weights sum to 1.
const SCORE_WEIGHTS: &[(Gauge, f64, bool)] = &[
    (Gauge::OfficialReach, 0.20, false),
    (Gauge::VulnerableReach, 0.20, false),
    (Gauge::Confusion, 0.15, true),
    (Gauge::RumorSpread, 0.10, true),
    (Gauge::PanicIndex, 0.10, true),
    (Gauge::TrustIndex, 0.10, false),
    (Gauge::MisinfoBelief, 0.05, true),
    (Gauge::ResourceMisallocation, 0.10, true),
];

// ---------------------------------------------------------------------------
// Health Metrics
// ---------------------------------------------------------------------------

/// Aggregate town-health gauges reported by the producer each interval.
///
/// All gauges are percentages in `[0, 100]`. Missing wire fields default to
/// zero so a sparse payload still deserializes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthMetrics {
    /// Share of residents reached by official messaging.
    pub official_reach: f64,
    /// Share of vulnerable residents reached.
    pub vulnerable_reach: f64,
    /// Share of residents holding contradictory beliefs.
    pub confusion: f64,
    /// Penetration of active rumors across the population.
    pub rumor_spread: f64,
    /// Population-wide panic level.
    pub panic_index: f64,
    /// Trust in official channels.
    pub trust_index: f64,
    /// Share of residents believing misinformation.
    pub misinfo_belief: f64,
    /// Misdirected relief effort (queues at the wrong sites).
    pub resource_misallocation: f64,
    /// Producer-computed overall stability, when it chose to report one.
    pub stability_score: Option<f64>,
}

impl HealthMetrics {
    /// Read a single gauge by name.
    ///
    /// [`Gauge::StabilityScore`] reads the effective stability: the
    /// producer-reported value when present, the composite otherwise.
    pub fn gauge(&self, gauge: Gauge) -> f64 {
        match gauge {
            Gauge::OfficialReach => self.official_reach,
            Gauge::VulnerableReach => self.vulnerable_reach,
            Gauge::Confusion => self.confusion,
            Gauge::RumorSpread => self.rumor_spread,
            Gauge::PanicIndex => self.panic_index,
            Gauge::TrustIndex => self.trust_index,
            Gauge::MisinfoBelief => self.misinfo_belief,
            Gauge::ResourceMisallocation => self.resource_misallocation,
            Gauge::StabilityScore => self.effective_stability(),
        }
    }

    /// Producer-reported stability when present, composite score otherwise.
    pub fn effective_stability(&self) -> f64 {
        self.stability_score
            .unwrap_or_else(|| f64::from(self.composite_score()))
    }

    /// Composite stability score over the eight sub-gauges.
    ///
    /// Each sub-score is clamped to `[0, 100]` before weighting; the
    /// weighted sum is rounded and clamped to `[0, 100]`. The weight table
    /// is evaluated in a fixed order, so equal inputs always produce equal
    /// scores.
    pub fn composite_score(&self) -> u8 {
        let mut total = 0.0_f64;
        for &(gauge, weight, inverted) in SCORE_WEIGHTS {
            let sub = self.gauge(gauge).clamp(0.0, 100.0);
            let scored = if inverted { 100.0 - sub } else { sub };
            total = weight.mul_add(scored, total);
        }
        let rounded = total.round().clamp(0.0, 100.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = rounded as u8;
        score
    }
}

// ---------------------------------------------------------------------------
// Samples and Peaks
// ---------------------------------------------------------------------------

/// One metrics interval as streamed by the producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSample {
    /// Tick the sample describes.
    pub tick: u64,
    /// Gauge values for the interval, flattened on the wire.
    #[serde(flatten)]
    pub metrics: HealthMetrics,
}

/// Highest observed value of a gauge and the tick it was seen at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peak {
    /// Highest value observed so far.
    pub value: f64,
    /// Tick of the most recent observation at that value.
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_metrics() -> HealthMetrics {
        HealthMetrics {
            official_reach: 80.0,
            vulnerable_reach: 70.0,
            confusion: 30.0,
            rumor_spread: 20.0,
            panic_index: 25.0,
            trust_index: 60.0,
            misinfo_belief: 15.0,
            resource_misallocation: 30.0,
            stability_score: None,
        }
    }

    #[test]
    fn perfect_inputs_score_exactly_one_hundred() {
        let metrics = HealthMetrics {
            official_reach: 100.0,
            vulnerable_reach: 100.0,
            confusion: 0.0,
            rumor_spread: 0.0,
            panic_index: 0.0,
            trust_index: 100.0,
            misinfo_belief: 0.0,
            resource_misallocation: 0.0,
            stability_score: None,
        };
        assert_eq!(metrics.composite_score(), 100);
    }

    #[test]
    fn worked_example_matches_weight_table() {
        // 16 + 14 + 10.5 + 8 + 7.5 + 6 + 4.25 + 7 = 73.25 -> 73
        assert_eq!(strong_metrics().composite_score(), 73);
    }

    #[test]
    fn composite_is_deterministic() {
        let metrics = strong_metrics();
        assert_eq!(metrics.composite_score(), metrics.composite_score());
    }

    #[test]
    fn out_of_range_inputs_are_clamped_before_weighting() {
        let metrics = HealthMetrics {
            official_reach: 250.0,
            vulnerable_reach: -50.0,
            ..HealthMetrics::default()
        };
        // 100*0.20 + 0 + 100*0.15 + 100*0.10 + 100*0.10 + 0 + 100*0.05 + 100*0.10
        assert_eq!(metrics.composite_score(), 70);
    }

    #[test]
    fn effective_stability_prefers_producer_value() {
        let mut metrics = strong_metrics();
        metrics.stability_score = Some(42.0);
        assert!((metrics.effective_stability() - 42.0).abs() < 1e-10);
        metrics.stability_score = None;
        assert!((metrics.effective_stability() - 73.0).abs() < 1e-10);
    }

    #[test]
    fn sample_flattens_gauges_on_the_wire() {
        let parsed: Result<MetricsSample, _> =
            serde_json::from_str(r#"{"tick": 1, "stabilityScore": 72}"#);
        let sample = parsed.ok();
        assert_eq!(sample.as_ref().map(|s| s.tick), Some(1));
        assert_eq!(
            sample.and_then(|s| s.metrics.stability_score),
            Some(72.0)
        );
    }
}
