//! Response shape for the Distance Matrix `json` endpoint.
//!
//! Only the fields the enrichment pass reads are modeled. With a single
//! origin the response carries one row whose elements line up one-to-one
//! with the requested destinations; an element can come back without a
//! `duration` (e.g. status `NOT_FOUND` for an address the geocoder could
//! not resolve), which is why `duration` is optional.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    #[serde(default)]
    pub duration: Option<MatrixDuration>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixDuration {
    /// Travel time in whole seconds.
    pub value: u64,
}
