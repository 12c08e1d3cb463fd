use crate::suggestions::{DEFAULT_BASE_URL, DEFAULT_MODEL, SuggestionConfig};
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub suggestions: SuggestionConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = get("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = get("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        Self {
            port,
            data_path,
            suggestions: SuggestionConfig {
                api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.suggestions.api_key, None);
        assert_eq!(config.suggestions.model, DEFAULT_MODEL);
    }

    #[test]
    fn reads_overrides_and_key_fallback() {
        let config = config_from(&[
            ("PORT", "9191"),
            ("APP_DATA_PATH", "/tmp/tracker.json"),
            ("API_KEY", "legacy"),
        ]);
        assert_eq!(config.port, 9191);
        assert_eq!(config.data_path, PathBuf::from("/tmp/tracker.json"));
        assert_eq!(config.suggestions.api_key.as_deref(), Some("legacy"));

        let config = config_from(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "legacy")]);
        assert_eq!(config.suggestions.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn bad_port_and_blank_key_fall_back() {
        let config = config_from(&[("PORT", "http"), ("GEMINI_API_KEY", "  ")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.suggestions.api_key, None);
    }
}
