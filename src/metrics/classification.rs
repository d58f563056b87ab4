//! Metrics for evaluating classification models
//!
//! Per-class precision, recall and F-scores are derived from one-vs-rest
//! counts of a [`ConfusionMatrix`]; averaged scores are built from those
//! records with one of the [`Average`] modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::confusion::{ClassCounts, ConfusionMatrix};
use crate::metrics::engine::MetricsEngine;
use crate::metrics::labels::{label_name, Label};

/// How per-class scores are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// No averaging, one score per class
    None,
    /// Unweighted mean over classes
    Macro,
    /// Score over counts pooled across classes
    Micro,
    /// Mean over classes weighted by support
    Weighted,
}

impl FromStr for Average {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Average::None),
            "macro" => Ok(Average::Macro),
            "micro" => Ok(Average::Micro),
            "weighted" => Ok(Average::Weighted),
            _ => Err(Error::UnknownAverageMode(s.to_string())),
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Average::None => "none",
            Average::Macro => "macro",
            Average::Micro => "micro",
            Average::Weighted => "weighted",
        };
        write!(f, "{}", name)
    }
}

/// Value substituted when precision or recall has a zero denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDivision {
    #[default]
    Zero,
    One,
    Nan,
}

impl ZeroDivision {
    pub fn value(&self) -> f64 {
        match self {
            ZeroDivision::Zero => 0.0,
            ZeroDivision::One => 1.0,
            ZeroDivision::Nan => f64::NAN,
        }
    }
}

/// Which score to compute or average
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Precision,
    Recall,
    F1,
    /// F-beta; recall weighs `beta` times as much as precision
    FBeta(f64),
}

/// A metric whose denominator was zero for one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedKind {
    /// The class was never predicted
    Precision,
    /// The class was never observed
    Recall,
}

/// Record of a metric that fell back to the [`ZeroDivision`] value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndefinedMetric {
    pub label: String,
    pub metric: UndefinedKind,
}

impl fmt::Display for UndefinedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metric {
            UndefinedKind::Precision => write!(
                f,
                "precision is ill-defined for label {}: no predicted samples",
                self.label
            ),
            UndefinedKind::Recall => write!(
                f,
                "recall is ill-defined for label {}: no true samples",
                self.label
            ),
        }
    }
}

fn ratio(num: usize, denom: usize, zero_division: ZeroDivision) -> f64 {
    if denom == 0 {
        zero_division.value()
    } else {
        num as f64 / denom as f64
    }
}

/// F-beta from precision and recall
///
/// NaN inputs give NaN; a zero denominator gives 0.
pub fn fbeta_from(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    let denom = b2 * precision + recall;
    if denom.is_nan() {
        f64::NAN
    } else if denom <= 0.0 {
        0.0
    } else {
        (1.0 + b2) * precision * recall / denom
    }
}

pub(crate) fn check_beta(beta: f64) -> Result<()> {
    if !beta.is_finite() || beta <= 0.0 {
        return Err(Error::InvalidValue(format!(
            "beta must be a finite positive number, got {}",
            beta
        )));
    }
    Ok(())
}

/// Scores of a single class treated as positive against all others
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerClassMetrics<L: Label> {
    pub label: L,
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tn: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl<L: Label> PerClassMetrics<L> {
    pub fn from_counts(label: L, counts: ClassCounts, zero_division: ZeroDivision) -> Self {
        let precision = ratio(counts.tp, counts.predicted(), zero_division);
        let recall = ratio(counts.tp, counts.support(), zero_division);

        PerClassMetrics {
            label,
            tp: counts.tp,
            fp: counts.fp,
            fn_: counts.fn_,
            tn: counts.tn,
            precision,
            recall,
            f1: fbeta_from(precision, recall, 1.0),
        }
    }

    pub fn counts(&self) -> ClassCounts {
        ClassCounts {
            tp: self.tp,
            fp: self.fp,
            fn_: self.fn_,
            tn: self.tn,
        }
    }

    /// Number of observed examples of this class
    pub fn support(&self) -> usize {
        self.tp + self.fn_
    }

    pub fn fbeta(&self, beta: f64) -> f64 {
        fbeta_from(self.precision, self.recall, beta)
    }

    pub fn score(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1 => self.f1,
            Metric::FBeta(beta) => self.fbeta(beta),
        }
    }

    /// Metrics of this class that fell back to the zero-division value
    pub fn undefined(&self) -> Vec<UndefinedMetric> {
        let mut out = Vec::new();
        if self.tp + self.fp == 0 {
            out.push(UndefinedMetric {
                label: label_name(&self.label),
                metric: UndefinedKind::Precision,
            });
        }
        if self.support() == 0 {
            out.push(UndefinedMetric {
                label: label_name(&self.label),
                metric: UndefinedKind::Recall,
            });
        }
        out
    }
}

/// Either one averaged score or a score per class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue<L: Label> {
    Single(f64),
    PerClass(Vec<(L, f64)>),
}

impl<L: Label> MetricValue<L> {
    pub fn single(&self) -> Option<f64> {
        match self {
            MetricValue::Single(v) => Some(*v),
            MetricValue::PerClass(_) => None,
        }
    }

    pub fn per_class(&self) -> Option<&[(L, f64)]> {
        match self {
            MetricValue::Single(_) => None,
            MetricValue::PerClass(values) => Some(values),
        }
    }

    /// Score of one class in a per-class result
    pub fn get(&self, label: &L) -> Option<f64> {
        self.per_class()?
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }
}

/// Micro-averaged precision, recall and F-beta from pooled counts
///
/// Every misclassification is a false positive for the predicted class and a
/// false negative for the observed one, so pooled FP and FN both equal the
/// off-diagonal sum.
fn micro_scores<L: Label>(
    cm: &ConfusionMatrix<L>,
    beta: f64,
    zero_division: ZeroDivision,
) -> (f64, f64, f64) {
    let tp = cm.correct();
    let fp = cm.misclassified();
    let fn_ = cm.misclassified();

    let precision = ratio(tp, tp + fp, zero_division);
    let recall = ratio(tp, tp + fn_, zero_division);
    (precision, recall, fbeta_from(precision, recall, beta))
}

/// Combines per-class records into the requested form
///
/// Fails with `InvalidValue` for an F-beta metric whose beta is not a finite
/// positive number.
pub fn aggregate<L: Label>(
    per_class: &[PerClassMetrics<L>],
    cm: &ConfusionMatrix<L>,
    average: Average,
    metric: Metric,
    zero_division: ZeroDivision,
) -> Result<MetricValue<L>> {
    if let Metric::FBeta(beta) = metric {
        check_beta(beta)?;
    }

    let value = match average {
        Average::None => MetricValue::PerClass(
            per_class
                .iter()
                .map(|m| (m.label.clone(), m.score(metric)))
                .collect(),
        ),
        Average::Macro => {
            let sum: f64 = per_class.iter().map(|m| m.score(metric)).sum();
            MetricValue::Single(sum / per_class.len() as f64)
        }
        Average::Weighted => {
            let total = cm.total() as f64;
            // zero-support classes carry no weight, even when their score is NaN
            let sum: f64 = per_class
                .iter()
                .filter(|m| m.support() > 0)
                .map(|m| m.support() as f64 / total * m.score(metric))
                .sum();
            MetricValue::Single(sum)
        }
        Average::Micro => {
            let beta = match metric {
                Metric::FBeta(beta) => beta,
                _ => 1.0,
            };
            let (p, r, f) = micro_scores(cm, beta, zero_division);
            MetricValue::Single(match metric {
                Metric::Precision => p,
                Metric::Recall => r,
                Metric::F1 | Metric::FBeta(_) => f,
            })
        }
    };

    Ok(value)
}

/// Accuracy plus macro, micro and weighted precision, recall and F1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub micro_precision: f64,
    pub micro_recall: f64,
    pub micro_f1: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
}

impl AggregateMetrics {
    pub fn compute<L: Label>(
        per_class: &[PerClassMetrics<L>],
        cm: &ConfusionMatrix<L>,
        zero_division: ZeroDivision,
    ) -> Self {
        let single = |average: Average, metric: Metric| {
            aggregate(per_class, cm, average, metric, zero_division)
                .ok()
                .and_then(|v| v.single())
                .unwrap_or(f64::NAN)
        };

        AggregateMetrics {
            accuracy: cm.accuracy(),
            macro_precision: single(Average::Macro, Metric::Precision),
            macro_recall: single(Average::Macro, Metric::Recall),
            macro_f1: single(Average::Macro, Metric::F1),
            micro_precision: single(Average::Micro, Metric::Precision),
            micro_recall: single(Average::Micro, Metric::Recall),
            micro_f1: single(Average::Micro, Metric::F1),
            weighted_precision: single(Average::Weighted, Metric::Precision),
            weighted_recall: single(Average::Weighted, Metric::Recall),
            weighted_f1: single(Average::Weighted, Metric::F1),
        }
    }
}

/// Fraction of examples whose prediction matches the observation
///
/// # Arguments
/// * `observed` - true labels
/// * `predicted` - predicted labels
///
/// # Returns
/// * `Result<f64>` - accuracy in [0, 1]
pub fn accuracy_score<L: Label>(observed: &[L], predicted: &[L]) -> Result<f64> {
    MetricsEngine::default().accuracy(observed, predicted)
}

/// Precision: TP / (TP + FP)
///
/// # Arguments
/// * `observed` - true labels
/// * `predicted` - predicted labels
/// * `average` - averaging mode; `Average::None` returns one score per class
pub fn precision_score<L: Label>(
    observed: &[L],
    predicted: &[L],
    average: Average,
) -> Result<MetricValue<L>> {
    MetricsEngine::default().score(observed, predicted, Metric::Precision, average)
}

/// Recall: TP / (TP + FN)
pub fn recall_score<L: Label>(
    observed: &[L],
    predicted: &[L],
    average: Average,
) -> Result<MetricValue<L>> {
    MetricsEngine::default().score(observed, predicted, Metric::Recall, average)
}

/// F1 score: harmonic mean of precision and recall
pub fn f1_score<L: Label>(
    observed: &[L],
    predicted: &[L],
    average: Average,
) -> Result<MetricValue<L>> {
    MetricsEngine::default().score(observed, predicted, Metric::F1, average)
}

/// F-beta score: `(1 + beta^2) * P * R / (beta^2 * P + R)`
pub fn fbeta_score<L: Label>(
    observed: &[L],
    predicted: &[L],
    beta: f64,
    average: Average,
) -> Result<MetricValue<L>> {
    MetricsEngine::default().score(observed, predicted, Metric::FBeta(beta), average)
}

/// Precision of `positive` against all other labels
pub fn binary_precision<L: Label>(observed: &[L], predicted: &[L], positive: &L) -> Result<f64> {
    MetricsEngine::default().binary(observed, predicted, positive, Metric::Precision)
}

/// Recall of `positive` against all other labels
pub fn binary_recall<L: Label>(observed: &[L], predicted: &[L], positive: &L) -> Result<f64> {
    MetricsEngine::default().binary(observed, predicted, positive, Metric::Recall)
}

/// F1 of `positive` against all other labels
pub fn binary_f1<L: Label>(observed: &[L], predicted: &[L], positive: &L) -> Result<f64> {
    MetricsEngine::default().binary(observed, predicted, positive, Metric::F1)
}
