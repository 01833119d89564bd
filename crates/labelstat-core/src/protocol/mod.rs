//! Wire shapes consumed by the filter.
//!
//! Only one document shape is understood: a classifier response of the form
//! `{"predictions": [[{"label": ..., "score": ...}, ...]]}`. Extraction is
//! panic-free and step-wise: every schema mismatch maps to exactly one
//! `ParseError` variant instead of being swallowed by a truthiness check.

pub mod predictions;

pub use predictions::{extract_prediction_set, select_winner, Prediction, Winner};
