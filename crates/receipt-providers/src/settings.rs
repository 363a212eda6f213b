//! Provider credentials read from the environment.

/// Azure Document Intelligence endpoint, e.g. `https://<name>.cognitiveservices.azure.com`.
pub const AZURE_ENDPOINT_VAR: &str = "AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT";
/// Azure Document Intelligence API key.
pub const AZURE_KEY_VAR: &str = "AZURE_DOCUMENT_INTELLIGENCE_KEY";
/// Mindee API key.
pub const MINDEE_KEY_VAR: &str = "MINDEE_API_KEY";
/// Mindee model id used for receipt extraction.
pub const MINDEE_MODEL_VAR: &str = "MINDEE_MODEL_ID";

/// Credentials for both external services. Missing variables load as empty
/// strings; the `*_configured` accessors say whether a service is usable.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub azure_endpoint: String,
    pub azure_key: String,
    pub mindee_api_key: String,
    pub mindee_model_id: String,
}

impl ProviderSettings {
    pub fn from_env() -> Self {
        Self {
            azure_endpoint: env_or_empty(AZURE_ENDPOINT_VAR),
            azure_key: env_or_empty(AZURE_KEY_VAR),
            mindee_api_key: env_or_empty(MINDEE_KEY_VAR),
            mindee_model_id: env_or_empty(MINDEE_MODEL_VAR),
        }
    }

    /// Both Azure values present and non-empty.
    pub fn azure_configured(&self) -> bool {
        !self.azure_endpoint.trim().is_empty() && !self.azure_key.trim().is_empty()
    }

    /// Both Mindee values present and non-empty.
    pub fn mindee_configured(&self) -> bool {
        !self.mindee_api_key.trim().is_empty() && !self.mindee_model_id.trim().is_empty()
    }
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
