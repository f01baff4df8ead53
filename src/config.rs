//! Equalizer configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! (channel-wise RGB, CLAHE 2.0 / 8x8, JPEG quality 95).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EqualizeError, Result};
use crate::filters::clahe::ClaheParams;
use crate::filters::method::Method;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    pub method: Method,
    pub clahe: ClaheParams,
    pub jpeg_quality: u8,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            clahe: ClaheParams::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl EqualizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), method = %config.method, "loaded equalizer config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.clahe.validate()?;
        validate_jpeg_quality(self.jpeg_quality)
    }
}

pub fn validate_jpeg_quality(quality: u8) -> Result<()> {
    if !(1..=100).contains(&quality) {
        return Err(EqualizeError::InvalidParameter(format!(
            "JPEG quality must be within 1..=100, got {}",
            quality
        )));
    }
    Ok(())
}
