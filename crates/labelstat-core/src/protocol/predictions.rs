//! Classifier response parsing and winner selection.
//!
//! Sample body:
//! ```json
//! {"predictions": [[
//!     {"label": "joy", "score": 0.9889},
//!     {"label": "love", "score": 0.0041}
//! ]]}
//! ```
//! Only `predictions[0]` is consumed; any further sets are ignored.

use serde_json::{Map, Value};

use crate::error::{ParseError, Result};

/// One classifier output class with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Result of scanning a prediction set.
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    /// Empty when no score exceeded the zero floor.
    pub label: String,
    pub score: f64,
}

impl Winner {
    /// True when at least one prediction scored above the zero floor.
    pub fn is_established(&self) -> bool {
        self.score > 0.0
    }
}

/// Parse `body` and return the prediction set at `predictions[0]`.
pub fn extract_prediction_set(body: &[u8]) -> Result<Vec<Prediction>> {
    let doc: Value =
        serde_json::from_slice(body).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let first = doc
        .get("predictions")
        .ok_or(ParseError::MissingPredictions)?
        .as_array()
        .ok_or(ParseError::PredictionsNotArray)?
        .first()
        .ok_or(ParseError::MissingFirstSet)?
        .as_array()
        .ok_or(ParseError::FirstSetNotArray)?;

    let mut out = Vec::with_capacity(first.len());
    for (index, item) in first.iter().enumerate() {
        let obj = item.as_object().ok_or(ParseError::InvalidPrediction {
            index,
            reason: "not an object",
        })?;
        out.push(prediction_from(obj, index)?);
    }
    Ok(out)
}

fn prediction_from(obj: &Map<String, Value>, index: usize) -> Result<Prediction> {
    let invalid = |reason| ParseError::InvalidPrediction { index, reason };

    let label = match obj.get("label") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid("label is not a string").into()),
        None => return Err(invalid("missing label").into()),
    };
    let score = match obj.get("score") {
        Some(v) => v.as_f64().ok_or_else(|| invalid("score is not a number"))?,
        None => return Err(invalid("missing score").into()),
    };
    Ok(Prediction { label, score })
}

/// Single pass over `set` keeping the running maximum.
///
/// Starts from `("", 0.0)` and only replaces on a strictly greater score, so
/// the first of several equal maxima wins and an all-nonpositive set yields
/// the empty label.
pub fn select_winner(set: &[Prediction]) -> Winner {
    let mut best = Winner {
        label: String::new(),
        score: 0.0,
    };
    for p in set {
        if p.score > best.score {
            best.score = p.score;
            best.label.clone_from(&p.label);
        }
    }
    best
}
