use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{AppError, ErrorKind};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub const SYSTEM_INSTRUCTION: &str = "
You are an expert Social Media Manager for 'ACC Furniture', a high-quality furniture factory based in China.
Your goal is to write professional, engaging, and trustworthy Facebook posts targeting international B2B clients (wholesalers, retailers, interior designers, and distributors).

Key Information to Include:
- Factory location: China
- Business Type: Factory Direct / Manufacturer
- Contact Phone: +86 13515886669
- Email: accfurniture@163.com

Style Guidelines:
- Tone: Professional, confident, industrial yet stylish.
- Focus: Manufacturing quality, capacity, design details, and export readiness.
- Structure: Catchy headline, body text explaining the furniture shown, and a clear Call to Action (CTA) with contact info.
- Hashtags: Use relevant tags like #FurnitureFactory #ChinaExport #InteriorDesign #B2B #CustomFurniture #ACCFurniture.
";

/// Task prompt sent alongside the images.
#[must_use]
pub fn task_prompt(image_count: usize) -> String {
    format!(
        "Analyze these {image_count} images of our furniture products.\n\
         Write a compelling Facebook post to attract foreign buyers.\n\
         \n\
         Specific instructions:\n\
         1. Describe the style and material quality seen in the images.\n\
         2. Emphasize that we are a direct factory offering competitive prices.\n\
         3. End clearly with the provided contact details.\n"
    )
}

/// Identity shown in the post preview header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub page_name: String,
    pub avatar_initials: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            page_name: "ACC Furniture".into(),
            avatar_initials: "AC".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub temperature: f32,
    pub system_instruction: String,
    pub api_base: String,
    pub profile: BusinessProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            system_instruction: SYSTEM_INSTRUCTION.into(),
            api_base: DEFAULT_API_BASE.into(),
            profile: BusinessProfile::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("model identifier cannot be empty")]
    EmptyModel,
    #[error("temperature {0} is out of range [0.0, 2.0]")]
    TemperatureOutOfRange(f32),
    #[error("system instruction cannot be empty")]
    EmptyInstruction,
    #[error("invalid API base '{url}': {reason}")]
    InvalidApiBase { url: String, reason: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

impl GeneratorConfig {
    /// Parses a partial JSON override; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !self.temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        if self.system_instruction.trim().is_empty() {
            return Err(ConfigError::EmptyInstruction);
        }

        let parsed = Url::parse(&self.api_base).map_err(|e| ConfigError::InvalidApiBase {
            url: self.api_base.clone(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "https" {
            return Err(ConfigError::InvalidApiBase {
                url: self.api_base.clone(),
                reason: format!("scheme '{}' is not https", parsed.scheme()),
            });
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidApiBase {
                url: self.api_base.clone(),
                reason: "missing host".into(),
            });
        }
        Ok(())
    }
}
