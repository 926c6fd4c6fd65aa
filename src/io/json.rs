//! JSON persistence
//!
//! Streams through `BufWriter`/`BufReader`; works for any serde type
//! (expressions, shader templates, trace configurations).

use crate::io::IoError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write `value` as pretty-printed JSON
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<(), IoError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).map_err(|e| IoError::Serialization(e.to_string()))
}

/// Read a value from a JSON file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, IoError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| IoError::Serialization(e.to_string()))
}

/// Serialize to a JSON string
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    serde_json::to_string_pretty(value).map_err(|e| IoError::Serialization(e.to_string()))
}

/// Parse from a JSON string
pub fn from_json_string<T: DeserializeOwned>(json: &str) -> Result<T, IoError> {
    serde_json::from_str(json).map_err(|e| IoError::Serialization(e.to_string()))
}
