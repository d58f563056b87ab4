//! The metrics engine ties confusion-matrix construction, per-class scoring
//! and aggregation together under one [`MetricsConfig`].
//!
//! The engine holds only its configuration, so a single instance can be
//! shared freely between threads.

use crate::config::MetricsConfig;
use crate::error::Result;
use crate::metrics::classification::{
    aggregate, check_beta, AggregateMetrics, Average, Metric, MetricValue, PerClassMetrics,
    UndefinedMetric,
};
use crate::metrics::confusion::ConfusionMatrix;
use crate::metrics::labels::{ClassSet, Label};
use crate::metrics::report::ClassificationReport;

/// Everything derived from one (observed, predicted) pair
#[derive(Debug, Clone)]
pub struct Evaluation<L: Label> {
    pub matrix: ConfusionMatrix<L>,
    pub per_class: Vec<PerClassMetrics<L>>,
    pub aggregate: AggregateMetrics,
    pub warnings: Vec<UndefinedMetric>,
    config: MetricsConfig,
}

impl<L: Label> Evaluation<L> {
    /// A score in the requested averaging mode
    ///
    /// Fails with `InvalidValue` for an F-beta metric with a beta that is
    /// not a finite positive number.
    pub fn score(&self, metric: Metric, average: Average) -> Result<MetricValue<L>> {
        aggregate(
            &self.per_class,
            &self.matrix,
            average,
            metric,
            self.config.zero_division,
        )
    }

    pub fn class(&self, label: &L) -> Option<&PerClassMetrics<L>> {
        self.per_class.iter().find(|m| &m.label == label)
    }

    pub fn report(&self) -> ClassificationReport<L> {
        ClassificationReport::new(&self.per_class, &self.aggregate, self.matrix.total())
    }
}

/// Computes classification metrics from label sequences
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        MetricsEngine { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn confusion_matrix<L: Label>(
        &self,
        observed: &[L],
        predicted: &[L],
    ) -> Result<ConfusionMatrix<L>> {
        ConfusionMatrix::from_labels(observed, predicted)
    }

    pub fn accuracy<L: Label>(&self, observed: &[L], predicted: &[L]) -> Result<f64> {
        Ok(self.confusion_matrix(observed, predicted)?.accuracy())
    }

    /// Scores `label` as the positive class against all others
    pub fn per_class_metrics<L: Label>(
        &self,
        cm: &ConfusionMatrix<L>,
        label: &L,
    ) -> Result<PerClassMetrics<L>> {
        let counts = cm.counts_for(label)?;
        let metrics =
            PerClassMetrics::from_counts(label.clone(), counts, self.config.zero_division);
        self.emit(&metrics.undefined());
        Ok(metrics)
    }

    /// Per-class records for every class, in class-set order
    pub fn all_per_class<L: Label>(&self, cm: &ConfusionMatrix<L>) -> Vec<PerClassMetrics<L>> {
        cm.classes()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                PerClassMetrics::from_counts(
                    label.clone(),
                    cm.counts_at(i),
                    self.config.zero_division,
                )
            })
            .collect()
    }

    pub fn aggregate<L: Label>(
        &self,
        per_class: &[PerClassMetrics<L>],
        cm: &ConfusionMatrix<L>,
    ) -> AggregateMetrics {
        AggregateMetrics::compute(per_class, cm, self.config.zero_division)
    }

    pub fn evaluate<L: Label>(&self, observed: &[L], predicted: &[L]) -> Result<Evaluation<L>> {
        let matrix = self.confusion_matrix(observed, predicted)?;
        Ok(self.evaluate_matrix(matrix))
    }

    /// Evaluates over a fixed class list; classes absent from both
    /// sequences get zero support
    pub fn evaluate_with_labels<L: Label>(
        &self,
        observed: &[L],
        predicted: &[L],
        labels: &[L],
    ) -> Result<Evaluation<L>> {
        let classes = ClassSet::from_labels(labels)?;
        let matrix = ConfusionMatrix::with_classes(observed, predicted, classes)?;
        Ok(self.evaluate_matrix(matrix))
    }

    pub fn evaluate_matrix<L: Label>(&self, matrix: ConfusionMatrix<L>) -> Evaluation<L> {
        let per_class = self.all_per_class(&matrix);
        let aggregate = self.aggregate(&per_class, &matrix);
        let warnings: Vec<UndefinedMetric> =
            per_class.iter().flat_map(|m| m.undefined()).collect();
        self.emit(&warnings);

        Evaluation {
            matrix,
            per_class,
            aggregate,
            warnings,
            config: self.config.clone(),
        }
    }

    pub fn score<L: Label>(
        &self,
        observed: &[L],
        predicted: &[L],
        metric: Metric,
        average: Average,
    ) -> Result<MetricValue<L>> {
        // reject a bad beta before building anything
        if let Metric::FBeta(beta) = metric {
            check_beta(beta)?;
        }
        self.evaluate(observed, predicted)?.score(metric, average)
    }

    /// Binary-style score with an explicit positive class
    pub fn binary<L: Label>(
        &self,
        observed: &[L],
        predicted: &[L],
        positive: &L,
        metric: Metric,
    ) -> Result<f64> {
        if let Metric::FBeta(beta) = metric {
            check_beta(beta)?;
        }
        let cm = self.confusion_matrix(observed, predicted)?;
        Ok(self.per_class_metrics(&cm, positive)?.score(metric))
    }

    pub fn summary<L: Label>(
        &self,
        observed: &[L],
        predicted: &[L],
    ) -> Result<ClassificationReport<L>> {
        Ok(self.evaluate(observed, predicted)?.report())
    }

    fn emit(&self, warnings: &[UndefinedMetric]) {
        if !self.config.log_warnings {
            return;
        }
        for warning in warnings {
            log::warn!("{}", warning);
        }
    }
}
