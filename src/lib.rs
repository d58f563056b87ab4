pub mod config;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use config::{MetricsConfig, MetricsConfigBuilder};
pub use error::{Error, Result};
pub use metrics::classification::{
    accuracy_score, binary_f1, binary_precision, binary_recall, f1_score, fbeta_score,
    precision_score, recall_score, AggregateMetrics, Average, Metric, MetricValue,
    PerClassMetrics, UndefinedKind, UndefinedMetric, ZeroDivision,
};
pub use metrics::confusion::{confusion_matrix, ClassCounts, ConfusionMatrix, Normalize};
pub use metrics::engine::{Evaluation, MetricsEngine};
pub use metrics::labels::{ClassSet, Label};
pub use metrics::report::{classification_report, ClassificationReport, ReportRow, RowKey};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
