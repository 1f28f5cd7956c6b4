//! Values produced by a scrape, before they reach an exposition format.

use super::registry::MetricIdentity;

/// One value emitted by a scrape.
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// A gauge sample; `labels` line up with `metric.label_names`.
    Gauge {
        metric: MetricIdentity,
        value: f64,
        labels: Vec<String>,
    },
    /// The metric could not be collected this scrape.
    Invalid {
        metric: MetricIdentity,
        cause: String,
    },
}

impl Observation {
    pub fn metric(&self) -> &MetricIdentity {
        match self {
            Observation::Gauge { metric, .. } | Observation::Invalid { metric, .. } => metric,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Observation::Invalid { .. })
    }
}

/// Destination for observations, fed one at a time during a scrape.
pub trait ObservationSink {
    fn observe(&mut self, observation: Observation);

    fn gauge(&mut self, metric: &MetricIdentity, value: f64, labels: &[&str]) {
        self.observe(Observation::Gauge {
            metric: *metric,
            value,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
    }

    fn invalid(&mut self, metric: &MetricIdentity, cause: &dyn std::fmt::Display) {
        self.observe(Observation::Invalid {
            metric: *metric,
            cause: cause.to_string(),
        });
    }
}

impl ObservationSink for Vec<Observation> {
    fn observe(&mut self, observation: Observation) {
        self.push(observation);
    }
}
