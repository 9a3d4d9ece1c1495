use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub model_api: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthResponse {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }

    #[must_use]
    pub fn database_connected(&self) -> bool {
        self.database == "connected"
    }

    #[must_use]
    pub fn model_available(&self) -> bool {
        self.model_api == "available"
    }
}
