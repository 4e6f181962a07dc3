use crate::domain::AppSettings;

const DEFAULT_AI_PROVIDER: &str = "openai";

/// Folds the flat `apiKey`/`aiProvider` pair of version 1 settings into the
/// provider-keyed `apiKeys` map and drops the flat fields. A key already
/// present in the map wins over the flat one.
pub fn normalize_settings(mut settings: AppSettings) -> AppSettings {
    let provider = settings
        .legacy_ai_provider
        .take()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_AI_PROVIDER.to_string());

    if let Some(key) = settings.legacy_api_key.take() {
        let key = key.trim();
        if !key.is_empty() {
            tracing::debug!(provider = %provider, "migrating flat api key into provider map");
            settings
                .api_keys
                .entry(provider)
                .or_insert_with(|| key.to_string());
        }
    }
    settings
}
