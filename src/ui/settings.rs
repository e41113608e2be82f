use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DialogueSettings {
    /// Base URL of the Gemini REST API, without a trailing slash.
    pub endpoint: String,
    pub model: String,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-2.5-flash".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ImageSettings {
    pub endpoint: String,
    pub model: String,
    pub width: u32,
    pub height: u32,

    /// Fetch the generated URL once before accepting it.
    pub verify: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://pollinations.ai/p".into(),
            model: "flux".into(),
            width: 512,
            height: 512,
            verify: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub dialogue: DialogueSettings,
    pub image: ImageSettings,

    /// Unset means wait as long as the collaborator takes.
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
