use std::fmt;

use serde::Serialize;

/// The generative models a comparison may run against. Requests naming
/// anything else are coerced to [`Model::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Model {
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::Gemini25Pro,
        Model::Gemini25Flash,
        Model::Gemini25FlashLite,
        Model::Gemini20Flash,
        Model::Gemini20FlashLite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashLite => "gemini-2.0-flash-lite",
        }
    }

    /// Exact, case-sensitive lookup; unknown or missing ids fall back to the default.
    pub fn from_requested(requested: Option<&str>) -> Self {
        requested
            .and_then(|id| Self::ALL.into_iter().find(|m| m.as_str() == id))
            .unwrap_or_default()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
