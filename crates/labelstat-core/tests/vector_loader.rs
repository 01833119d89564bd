//! JSON test vector loader shared by body tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    /// Body split the way the host would deliver it.
    pub chunks: Vec<String>,
    #[serde(default)]
    pub expect: Option<ExpectWinner>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectWinner {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

impl TestVector {
    pub fn body(&self) -> Vec<u8> {
        self.chunks.concat().into_bytes()
    }
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

pub const ALL: [&str; 9] = [
    "joy_wins.json",
    "tie_first_wins.json",
    "empty_set.json",
    "all_nonpositive.json",
    "second_set_ignored.json",
    "missing_predictions.json",
    "empty_predictions.json",
    "malformed_json.json",
    "score_not_number.json",
];
