use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const APP_SETTINGS_KEY: &str = "app-settings";
pub const APP_DICTIONARY_KEY: &str = "app-dictionary";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    /// Provider name to API key.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exported_at: Option<String>,
    /// Flat key from version 1 documents; folded into `api_keys` on load.
    #[serde(default, rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub legacy_api_key: Option<String>,
    #[serde(default, rename = "aiProvider", skip_serializing_if = "Option::is_none")]
    pub legacy_ai_provider: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            id: APP_SETTINGS_KEY.to_string(),
            theme: None,
            editor_font_size: None,
            ai_model: None,
            api_keys: BTreeMap::new(),
            last_exported_at: None,
            legacy_api_key: None,
            legacy_ai_provider: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDictionary {
    pub id: String,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
