//! JSON configuration loading for the library and its tools.

pub mod outline;

pub use outline::{OutlineOutputConfig, OutlineToolConfig};

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read and parse a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
