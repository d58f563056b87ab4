//! Class labels and the ordered set of classes seen in an evaluation

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::error::{Error, Result};

/// A categorical class label
///
/// Implemented for every type that can be compared, hashed and cloned, so
/// integers, `bool`, `char`, `String` and `&str` all work out of the box.
pub trait Label: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Label for T {}

/// Renders a label for warnings, errors and report rows
///
/// One enclosing pair of `"` or `'` is dropped, so `"spam"` and `'a'` render
/// as `spam` and `a`.
pub(crate) fn label_name<L: Label>(label: &L) -> String {
    let text = format!("{:?}", label);
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    text
}

/// The distinct classes of an evaluation, in a stable order
#[derive(Debug, Clone, Serialize)]
pub struct ClassSet<L: Label> {
    labels: Vec<L>,
    #[serde(skip)]
    index: HashMap<L, usize>,
}

impl<L: Label> ClassSet<L> {
    /// Collects classes in encounter order
    ///
    /// Positions are scanned front to back and at each position the observed
    /// label is visited before the predicted one.
    pub fn from_sequences(observed: &[L], predicted: &[L]) -> Self {
        let mut set = ClassSet {
            labels: Vec::new(),
            index: HashMap::new(),
        };

        for (t, p) in observed.iter().zip(predicted.iter()) {
            set.insert(t);
            set.insert(p);
        }
        // zip stops at the shorter side
        for extra in observed.iter().skip(predicted.len()) {
            set.insert(extra);
        }
        for extra in predicted.iter().skip(observed.len()) {
            set.insert(extra);
        }

        set
    }

    /// Uses an explicit, caller-ordered list of classes
    pub fn from_labels(labels: &[L]) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyData("label list is empty".to_string()));
        }

        let mut set = ClassSet {
            labels: Vec::with_capacity(labels.len()),
            index: HashMap::with_capacity(labels.len()),
        };

        for label in labels {
            if !set.insert(label) {
                return Err(Error::InvalidInput(format!(
                    "duplicate label in class list: {}",
                    label_name(label)
                )));
            }
        }

        Ok(set)
    }

    fn insert(&mut self, label: &L) -> bool {
        if self.index.contains_key(label) {
            return false;
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label.clone());
        true
    }

    /// Position of a class, if present
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Position of a class, failing with `UnknownLabel` when absent
    pub fn require(&self, label: &L) -> Result<usize> {
        self.index_of(label).ok_or_else(|| Error::UnknownLabel(label_name(label)))
    }

    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.labels.iter()
    }
}
