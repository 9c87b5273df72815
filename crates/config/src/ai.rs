// AI provider selection and API key lookup
//
// Keys come from environment variables only and are NEVER stored in
// settings.json.

use std::env;

use serde::{Deserialize, Serialize};

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIProvider {
    /// AI features disabled (default)
    #[default]
    None,
    /// Local model via Ollama
    Local,
    /// OpenAI API
    #[serde(rename = "openai")]
    OpenAI,
    /// Anthropic API
    Anthropic,
}

impl AIProvider {
    /// Returns true if AI features are enabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AIProvider::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AIProvider::None => "none",
            AIProvider::Local => "local",
            AIProvider::OpenAI => "openai",
            AIProvider::Anthropic => "anthropic",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::Local => "llama3:8b",
            AIProvider::OpenAI => "gpt-4o",
            AIProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

/// Environment variable name for a provider's API key
pub fn env_var_name(provider: AIProvider) -> String {
    format!("GRIDBASE_{}_KEY", provider.as_str().to_uppercase())
}

/// Look up the API key for a provider. None/Local need no key.
pub fn api_key(provider: AIProvider) -> Option<String> {
    match provider {
        AIProvider::None | AIProvider::Local => None,
        _ => env::var(env_var_name(provider)).ok().filter(|k| !k.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names() {
        assert_eq!(env_var_name(AIProvider::OpenAI), "GRIDBASE_OPENAI_KEY");
        assert_eq!(env_var_name(AIProvider::Anthropic), "GRIDBASE_ANTHROPIC_KEY");
    }

    #[test]
    fn test_keyless_providers() {
        assert_eq!(api_key(AIProvider::None), None);
        assert_eq!(api_key(AIProvider::Local), None);
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(serde_json::to_string(&AIProvider::OpenAI).unwrap(), "\"openai\"");
        let p: AIProvider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(p, AIProvider::Anthropic);
    }
}
