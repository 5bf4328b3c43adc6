//! Error types for engine construction and configuration
//!
//! The frame loop itself never fails; these only surface when the engine is
//! being built or configured.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that can occur while setting up the fireworks engine
#[derive(Debug, Error)]
pub enum FireworksError {
    /// The YAML configuration could not be parsed
    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The configuration parsed but holds unusable values
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// No canvas element with the given id exists in the document
    #[error("canvas element '{0}' not found")]
    MissingCanvas(String),

    /// The canvas refused to hand out a 2D context
    #[error("2d rendering context unavailable")]
    ContextUnavailable,

    /// A browser API call threw
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for FireworksError {
    fn from(value: JsValue) -> Self {
        FireworksError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<FireworksError> for JsValue {
    fn from(err: FireworksError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FireworksError>;
