//! Classification evaluation metrics
//!
//! Accuracy, precision, recall and F-scores computed from observed and
//! predicted label sequences, with macro, micro and weighted averaging.

pub mod classification;
pub mod confusion;
pub mod engine;
pub mod labels;
pub mod report;
