//! Confusion matrix construction
//!
//! Rows are indexed by the observed (true) class and columns by the predicted
//! class, both in [`ClassSet`] order.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{check_lengths, Result};
use crate::metrics::labels::{ClassSet, Label};

/// One-vs-rest counts for a single class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    /// Observed and predicted as the class
    pub tp: usize,
    /// Predicted as the class, observed as another
    pub fp: usize,
    /// Observed as the class, predicted as another
    pub fn_: usize,
    /// Neither observed nor predicted as the class
    pub tn: usize,
}

impl ClassCounts {
    /// Number of observed examples of the class
    pub fn support(&self) -> usize {
        self.tp + self.fn_
    }

    /// Number of examples predicted as the class
    pub fn predicted(&self) -> usize {
        self.tp + self.fp
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.fn_ + self.tn
    }
}

/// How [`ConfusionMatrix::normalized`] scales the cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Each row sums to 1 (fractions of observed class)
    True,
    /// Each column sums to 1 (fractions of predicted class)
    Pred,
    /// All cells sum to 1
    All,
}

/// Counts of (observed, predicted) label pairs
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrix<L: Label> {
    classes: ClassSet<L>,
    matrix: Vec<Vec<usize>>,
    total: usize,
}

impl<L: Label> ConfusionMatrix<L> {
    /// Builds the matrix over the classes found in either sequence
    pub fn from_labels(observed: &[L], predicted: &[L]) -> Result<Self> {
        check_lengths(observed.len(), predicted.len())?;
        let classes = ClassSet::from_sequences(observed, predicted);
        Self::count(observed, predicted, classes)
    }

    /// Builds the matrix over a caller-supplied class list
    ///
    /// Fails with `UnknownLabel` if either sequence holds a label outside
    /// `classes`.
    pub fn with_classes(observed: &[L], predicted: &[L], classes: ClassSet<L>) -> Result<Self> {
        check_lengths(observed.len(), predicted.len())?;
        Self::count(observed, predicted, classes)
    }

    fn count(observed: &[L], predicted: &[L], classes: ClassSet<L>) -> Result<Self> {
        let k = classes.len();
        let mut matrix = vec![vec![0usize; k]; k];

        for (t, p) in observed.iter().zip(predicted.iter()) {
            let row = classes.require(t)?;
            let col = classes.require(p)?;
            matrix[row][col] += 1;
        }

        log::debug!(
            "built confusion matrix: {} examples, {} classes",
            observed.len(),
            k
        );

        Ok(ConfusionMatrix {
            classes,
            matrix,
            total: observed.len(),
        })
    }

    /// Number of examples N
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn classes(&self) -> &ClassSet<L> {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Raw cells, `matrix()[true][pred]`
    pub fn matrix(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Count for an (observed, predicted) pair; 0 for unknown labels
    pub fn count_of(&self, observed: &L, predicted: &L) -> usize {
        match (self.classes.index_of(observed), self.classes.index_of(predicted)) {
            (Some(row), Some(col)) => self.matrix[row][col],
            _ => 0,
        }
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> usize {
        (0..self.n_classes()).map(|i| self.matrix[i][i]).sum()
    }

    /// Sum of the off-diagonal cells
    pub fn misclassified(&self) -> usize {
        self.total - self.correct()
    }

    /// Fraction of examples on the diagonal
    pub fn accuracy(&self) -> f64 {
        self.correct() as f64 / self.total as f64
    }

    /// One-vs-rest counts for the class at `index`
    pub fn counts_at(&self, index: usize) -> ClassCounts {
        let tp = self.matrix[index][index];
        let fp: usize = (0..self.n_classes())
            .filter(|&t| t != index)
            .map(|t| self.matrix[t][index])
            .sum();
        let fn_: usize = (0..self.n_classes())
            .filter(|&p| p != index)
            .map(|p| self.matrix[index][p])
            .sum();

        ClassCounts {
            tp,
            fp,
            fn_,
            tn: self.total - tp - fp - fn_,
        }
    }

    /// One-vs-rest counts for `label`
    pub fn counts_for(&self, label: &L) -> Result<ClassCounts> {
        let index = self.classes.require(label)?;
        Ok(self.counts_at(index))
    }

    /// Cell fractions scaled per row, per column or over the whole matrix
    ///
    /// Rows or columns with no examples stay at 0.
    pub fn normalized(&self, mode: Normalize) -> Vec<Vec<f64>> {
        let k = self.n_classes();
        let row_sums: Vec<usize> = self.matrix.iter().map(|row| row.iter().sum()).collect();
        let col_sums: Vec<usize> = (0..k)
            .map(|c| self.matrix.iter().map(|row| row[c]).sum())
            .collect();

        let scale = |value: usize, denom: usize| {
            if denom == 0 {
                0.0
            } else {
                value as f64 / denom as f64
            }
        };

        self.matrix
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &v)| match mode {
                        Normalize::True => scale(v, row_sums[r]),
                        Normalize::Pred => scale(v, col_sums[c]),
                        Normalize::All => scale(v, self.total),
                    })
                    .collect()
            })
            .collect()
    }
}

impl<L: Label + Send + Sync> ConfusionMatrix<L> {
    /// Same result as [`ConfusionMatrix::from_labels`], counted in parallel
    pub fn from_labels_par(observed: &[L], predicted: &[L]) -> Result<Self> {
        check_lengths(observed.len(), predicted.len())?;
        let classes = ClassSet::from_sequences(observed, predicted);
        let k = classes.len();

        // every label is in `classes`, so the lookups cannot miss
        let flat = observed
            .par_iter()
            .zip(predicted.par_iter())
            .fold(
                || vec![0usize; k * k],
                |mut acc, (t, p)| {
                    if let (Some(row), Some(col)) = (classes.index_of(t), classes.index_of(p)) {
                        acc[row * k + col] += 1;
                    }
                    acc
                },
            )
            .reduce(
                || vec![0usize; k * k],
                |mut a, b| {
                    a.iter_mut().zip(b.iter()).for_each(|(x, y)| *x += y);
                    a
                },
            );

        let matrix = flat.chunks(k.max(1)).take(k).map(|row| row.to_vec()).collect();

        log::debug!(
            "built confusion matrix in parallel: {} examples, {} classes",
            observed.len(),
            k
        );

        Ok(ConfusionMatrix {
            classes,
            matrix,
            total: observed.len(),
        })
    }
}

/// Builds the confusion matrix for two label sequences
pub fn confusion_matrix<L: Label>(observed: &[L], predicted: &[L]) -> Result<ConfusionMatrix<L>> {
    ConfusionMatrix::from_labels(observed, predicted)
}
