use crchat_types::{EndpointConfig, CONFIG_STORAGE_KEY, FALLBACK_SYSTEM_PROMPT};

use crate::{ConfigField, KeyValueStore, SessionError};

/// Read the stored config. Nothing stored yet yields the defaults.
pub fn load_config(store: &dyn KeyValueStore) -> Result<EndpointConfig, SessionError> {
    let raw = store
        .get(CONFIG_STORAGE_KEY)
        .map_err(|e| SessionError::ConfigLoad(e.to_string()))?;

    match raw {
        None => Ok(EndpointConfig::default()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| SessionError::ConfigLoad(e.to_string())),
    }
}

/// Overwrite the stored config wholesale
pub fn save_config(store: &dyn KeyValueStore, config: &EndpointConfig) -> Result<(), SessionError> {
    let json = serde_json::to_string(config)?;
    store.set(CONFIG_STORAGE_KEY, &json)?;
    Ok(())
}

/// Unvalidated values from a settings form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDraft {
    pub base_url: String,
    pub model_name: String,
    pub system_prompt: String,
}

impl From<&EndpointConfig> for ConfigDraft {
    fn from(config: &EndpointConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model_name: config.model_name.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }
}

impl ConfigDraft {
    /// Trim every field and check the required ones.
    ///
    /// An empty system prompt is replaced by the fallback prompt.
    pub fn validate(&self) -> Result<EndpointConfig, SessionError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(SessionError::ConfigValidation { field: ConfigField::BaseUrl });
        }
        let model_name = self.model_name.trim();
        if model_name.is_empty() {
            return Err(SessionError::ConfigValidation { field: ConfigField::ModelName });
        }
        let system_prompt = match self.system_prompt.trim() {
            "" => FALLBACK_SYSTEM_PROMPT,
            prompt => prompt,
        };

        Ok(EndpointConfig {
            base_url: base_url.to_string(),
            model_name: model_name.to_string(),
            system_prompt: system_prompt.to_string(),
        })
    }
}
