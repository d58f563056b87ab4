//! Classification report: per-class precision, recall, F1 and support,
//! followed by accuracy and averaged rows.

use serde::Serialize;

use crate::error::Result;
use crate::metrics::classification::{AggregateMetrics, PerClassMetrics};
use crate::metrics::engine::MetricsEngine;
use crate::metrics::labels::{label_name, Label};

/// Identifies a row of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKey<L: Label> {
    Class(L),
    Accuracy,
    MacroAvg,
    WeightedAvg,
    MicroAvg,
}

impl<L: Label> RowKey<L> {
    pub fn name(&self) -> String {
        match self {
            RowKey::Class(label) => label_name(label),
            RowKey::Accuracy => "accuracy".to_string(),
            RowKey::MacroAvg => "macro avg".to_string(),
            RowKey::WeightedAvg => "weighted avg".to_string(),
            RowKey::MicroAvg => "micro avg".to_string(),
        }
    }
}

/// One row of the report
///
/// The accuracy row has no precision or recall; its `f1` column carries the
/// accuracy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<L: Label> {
    pub key: RowKey<L>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: f64,
    pub support: usize,
}

/// Per-class and aggregate metrics laid out as a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport<L: Label> {
    rows: Vec<ReportRow<L>>,
    total: usize,
}

impl<L: Label> ClassificationReport<L> {
    pub fn new(
        per_class: &[PerClassMetrics<L>],
        aggregate: &AggregateMetrics,
        total: usize,
    ) -> Self {
        let mut rows: Vec<ReportRow<L>> = per_class
            .iter()
            .map(|m| ReportRow {
                key: RowKey::Class(m.label.clone()),
                precision: Some(m.precision),
                recall: Some(m.recall),
                f1: m.f1,
                support: m.support(),
            })
            .collect();

        rows.push(ReportRow {
            key: RowKey::Accuracy,
            precision: None,
            recall: None,
            f1: aggregate.accuracy,
            support: total,
        });
        rows.push(ReportRow {
            key: RowKey::MacroAvg,
            precision: Some(aggregate.macro_precision),
            recall: Some(aggregate.macro_recall),
            f1: aggregate.macro_f1,
            support: total,
        });
        rows.push(ReportRow {
            key: RowKey::WeightedAvg,
            precision: Some(aggregate.weighted_precision),
            recall: Some(aggregate.weighted_recall),
            f1: aggregate.weighted_f1,
            support: total,
        });
        rows.push(ReportRow {
            key: RowKey::MicroAvg,
            precision: Some(aggregate.micro_precision),
            recall: Some(aggregate.micro_recall),
            f1: aggregate.micro_f1,
            support: total,
        });

        ClassificationReport { rows, total }
    }

    pub fn rows(&self) -> &[ReportRow<L>] {
        &self.rows
    }

    /// Number of examples evaluated
    pub fn total(&self) -> usize {
        self.total
    }

    /// Row by display name, e.g. `"1"`, `"spam"` or `"macro avg"`
    ///
    /// Aggregate rows win over a class whose label renders to the same name;
    /// [`ClassificationReport::class_row`] looks classes up unambiguously.
    pub fn row(&self, name: &str) -> Option<&ReportRow<L>> {
        self.rows
            .iter()
            .filter(|r| !matches!(r.key, RowKey::Class(_)))
            .find(|r| r.key.name() == name)
            .or_else(|| self.class_rows().find(|r| r.key.name() == name))
    }

    pub fn class_row(&self, label: &L) -> Option<&ReportRow<L>> {
        self.rows
            .iter()
            .find(|r| matches!(&r.key, RowKey::Class(l) if l == label))
    }

    pub fn accuracy(&self) -> f64 {
        self.rows
            .iter()
            .find(|r| r.key == RowKey::Accuracy)
            .map(|r| r.f1)
            .unwrap_or(f64::NAN)
    }

    /// Class rows only
    pub fn class_rows(&self) -> impl Iterator<Item = &ReportRow<L>> {
        self.rows.iter().filter(|r| matches!(r.key, RowKey::Class(_)))
    }
}

impl<L: Label + Serialize> ClassificationReport<L> {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the classification report for two label sequences
pub fn classification_report<L: Label>(
    observed: &[L],
    predicted: &[L],
) -> Result<ClassificationReport<L>> {
    MetricsEngine::default().summary(observed, predicted)
}
