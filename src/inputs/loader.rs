//! Load calculation requests from JSON

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::CalculationRequest;
use crate::error::CalcResult;

/// Parse a request from a JSON string
pub fn parse_request(json: &str) -> CalcResult<CalculationRequest> {
    Ok(serde_json::from_str(json)?)
}

/// Load a request from any reader (e.g., request body, stdin)
pub fn load_request_from_reader<R: Read>(reader: R) -> CalcResult<CalculationRequest> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Load a request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> CalcResult<CalculationRequest> {
    let file = File::open(path)?;
    load_request_from_reader(file)
}
